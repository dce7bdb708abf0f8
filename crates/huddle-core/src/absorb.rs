//! Absorption pass
//!
//! Buckets too small to ever form a group are dissolved into their members'
//! secondary interests, but only when every member can move. A bucket where
//! even one student has nowhere to go is left exactly as it was.

use crate::bucket::Buckets;
use crate::partition::MIN_GROUP_SIZE;
use tracing::{debug, trace};

/// A secondary bucket must already hold this many students to accept
/// absorbed members. A bucket that does not exist yet is always accepted.
pub const ABSORBING_BUCKET_MIN: usize = 3;

/// Dissolve undersized buckets into their members' secondary interests.
///
/// Keys are snapshotted before the pass starts and each is evaluated once,
/// against the mapping as it stands when the key is reached. Buckets created
/// during the pass are not revisited. Returns the number of buckets dissolved.
pub fn absorb_undersized(buckets: &mut Buckets<'_>) -> usize {
    let keys: Vec<&str> = buckets.keys().copied().collect();
    let mut dissolved = 0;

    for key in keys {
        if !can_dissolve(buckets, key) {
            continue;
        }

        let Some(members) = buckets.shift_remove(key) else {
            continue;
        };
        trace!(interest = key, moved = members.len(), "dissolving bucket");
        for student in members {
            buckets
                .entry(student.secondary.as_str())
                .or_default()
                .push(student);
        }
        dissolved += 1;
    }

    debug!(dissolved, buckets = buckets.len(), "absorption pass complete");
    dissolved
}

/// Whether the bucket under `key` is undersized and every member can move.
///
/// A member can move when its secondary interest differs from the interest
/// it currently sits under, and that secondary bucket is either absent or
/// already holds at least [`ABSORBING_BUCKET_MIN`] students.
fn can_dissolve(buckets: &Buckets<'_>, key: &str) -> bool {
    let Some(bucket) = buckets.get(key) else {
        return false;
    };
    if bucket.is_empty() || bucket.len() >= MIN_GROUP_SIZE {
        return false;
    }

    bucket.iter().all(|student| {
        student.secondary != key
            && buckets
                .get(student.secondary.as_str())
                .map_or(true, |target| target.len() >= ABSORBING_BUCKET_MIN)
    })
}
