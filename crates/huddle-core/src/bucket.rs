//! Interest buckets
//!
//! A bucket is the ordered list of students currently assigned to one
//! interest during a single trial. Buckets keep the order in which their
//! interest was first seen while scanning the input; the passes that follow
//! depend on that order, so the mapping is an [`IndexMap`] rather than a hash
//! map.

use crate::student::Student;
use indexmap::IndexMap;

/// Students assigned to one interest. The tail is the "top" of the stack the
/// partitioner pops from.
pub type Bucket<'a> = Vec<&'a Student>;

/// Interest key -> bucket, in first-seen order
pub type Buckets<'a> = IndexMap<&'a str, Bucket<'a>>;

/// Group students by primary interest.
///
/// Interests appear in the order they are first encountered and each bucket
/// keeps its students in input order. An empty input yields an empty mapping.
pub fn bucket_by_interest<'a, I>(students: I) -> Buckets<'a>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut buckets = Buckets::new();
    for student in students {
        buckets
            .entry(student.primary.as_str())
            .or_default()
            .push(student);
    }
    buckets
}

/// Total number of students across all buckets
pub fn population(buckets: &Buckets<'_>) -> usize {
    buckets.values().map(Vec::len).sum()
}
