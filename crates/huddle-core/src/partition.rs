//! Size-partition table and group partitioner
//!
//! Each bucket is treated as a stack: groups are popped off its tail using a
//! fixed size table until the bucket is empty or too small to form a group.
//! The table is tuned so that a bucket never strands a remainder of 1-3
//! students mid-way; only the final leftover may be that small.
//!
//! | remaining     | take |
//! |---------------|------|
//! | 1-3           | stop |
//! | 4-8           | all  |
//! | 9-10          | 5    |
//! | 11-12, 17-18  | 6    |
//! | 13-16, 19-23  | 7    |
//! | 24+           | 6    |

use crate::bucket::Buckets;
use crate::student::{Group, Student};
use serde::Serialize;
use tracing::debug;

/// Smallest group the partitioner will form
pub const MIN_GROUP_SIZE: usize = 4;

/// Largest group the partitioner will form
pub const MAX_GROUP_SIZE: usize = 8;

/// How many students to pop off a bucket holding `remaining` students.
///
/// Returns `None` when the bucket is too small to form another group.
pub fn split_size(remaining: usize) -> Option<usize> {
    match remaining {
        0..=3 => None,
        4..=8 => Some(remaining),
        9 | 10 => Some(5),
        11 | 12 | 17 | 18 => Some(6),
        13..=16 | 19..=23 => Some(7),
        _ => Some(6),
    }
}

/// The sequence of group sizes the table produces for one bucket size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub bucket_size: usize,
    /// Group sizes in the order they are popped
    pub splits: Vec<usize>,
    /// Students left ungrouped once the table stops
    pub remainder: usize,
}

/// Run the size table over a bucket of `bucket_size` students without
/// touching any actual students.
pub fn schedule(bucket_size: usize) -> Schedule {
    let mut remaining = bucket_size;
    let mut splits = Vec::new();
    while let Some(take) = split_size(remaining) {
        splits.push(take);
        remaining -= take;
    }
    Schedule {
        bucket_size,
        splits,
        remainder: remaining,
    }
}

/// Pop groups off the tail of `bucket` until the size table says stop.
///
/// Members are taken one at a time from the end, so the most recently added
/// students are placed first and each group lists them in pop order. Whatever
/// is left in `bucket` afterwards is the ungrouped remainder.
pub fn pop_groups<'a>(
    interest: &'a str,
    bucket: &mut Vec<&'a Student>,
    groups: &mut Vec<Group<'a>>,
) {
    while let Some(take) = split_size(bucket.len()) {
        let mut members = Vec::with_capacity(take);
        for _ in 0..take {
            if let Some(student) = bucket.pop() {
                members.push(student);
            }
        }
        groups.push(Group::new(interest, members));
    }
}

/// Split every bucket into groups, in bucket order.
///
/// Returns the groups and the students no group could take.
pub fn partition_buckets(buckets: Buckets<'_>) -> (Vec<Group<'_>>, Vec<&Student>) {
    let mut groups = Vec::new();
    let mut ungrouped = Vec::new();

    for (interest, mut bucket) in buckets {
        pop_groups(interest, &mut bucket, &mut groups);
        ungrouped.extend(bucket);
    }

    debug!(
        groups = groups.len(),
        ungrouped = ungrouped.len(),
        "partition complete"
    );
    (groups, ungrouped)
}
