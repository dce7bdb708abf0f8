//! Augmentation pass
//!
//! Buckets of 2-3 students are topped up by recruiting students from larger
//! buckets whose secondary interest matches. The target size is drawn at
//! random (4, 5 or 6) so the pass does not always produce minimum-sized
//! groups. Recruiting is all-or-nothing: the search runs on a scratch copy of
//! the whole mapping and is swapped in only if the target is met exactly.

use crate::bucket::Buckets;
use crate::partition::MIN_GROUP_SIZE;
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Bucket sizes the pass tries to grow
pub const AUGMENTABLE_SIZES: RangeInclusive<usize> = 2..=3;

/// Draw the size an undersized bucket should grow to.
///
/// 4 with probability 1/2, 5 with probability 1/4, 6 with probability 1/4.
pub fn draw_target_size<R: Rng>(rng: &mut R) -> usize {
    let mut size = MIN_GROUP_SIZE;
    if rng.random_bool(0.5) {
        size += 1;
        if rng.random_bool(0.5) {
            size += 1;
        }
    }
    size
}

/// Grow every 2-3 student bucket to a randomly drawn target size.
///
/// Keys are visited in mapping order and each sees the result of earlier
/// commits, so an early success can use up donors a later bucket needed.
/// Returns the number of buckets that were grown.
pub fn augment_undersized<'a, R: Rng>(buckets: &mut Buckets<'a>, rng: &mut R) -> usize {
    let mut committed = 0;

    for index in 0..buckets.len() {
        let Some((&target, bucket)) = buckets.get_index(index) else {
            break;
        };
        let size = bucket.len();
        if !AUGMENTABLE_SIZES.contains(&size) {
            continue;
        }

        let needed = draw_target_size(rng) - size;
        match recruit(buckets, target, needed) {
            Some(scratch) => {
                trace!(interest = target, from = size, to = size + needed, "bucket grown");
                *buckets = scratch;
                committed += 1;
            }
            None => {
                trace!(interest = target, size, needed, "not enough donors");
            }
        }
    }

    debug!(committed, "augmentation pass complete");
    committed
}

/// Try to move exactly `needed` students into `target` on a scratch copy.
///
/// Donors are scanned in mapping order and their members in bucket order.
/// A donor is only touched while it holds more than [`MIN_GROUP_SIZE`]
/// students, so no donor is ever left unable to form a group. Returns the
/// updated copy on success and `None` if the donors ran dry.
pub fn recruit<'a>(buckets: &Buckets<'a>, target: &'a str, needed: usize) -> Option<Buckets<'a>> {
    let mut scratch = buckets.clone();
    let mut recruits = Vec::with_capacity(needed);
    let mut remaining = needed;

    'donors: for (&donor, members) in scratch.iter_mut() {
        if remaining == 0 {
            break;
        }
        if donor == target || members.len() <= MIN_GROUP_SIZE {
            continue;
        }

        let mut i = 0;
        while i < members.len() {
            if members[i].secondary != target {
                i += 1;
                continue;
            }
            recruits.push(members.remove(i));
            remaining -= 1;
            if remaining == 0 {
                break 'donors;
            }
            if members.len() <= MIN_GROUP_SIZE {
                break;
            }
        }
    }

    if remaining > 0 {
        return None;
    }
    scratch.get_mut(target)?.extend(recruits);
    Some(scratch)
}
