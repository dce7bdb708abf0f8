//! Students, groups and plans
//!
//! A [`Student`] is owned by the caller and never mutated here. Everything the
//! pipeline builds ([`Group`], [`Plan`]) borrows students from the input slice,
//! so reorganizing a population only moves references around.

use serde::{Deserialize, Serialize};

/// A student with a first- and second-choice interest.
///
/// `id` is opaque and not required to be unique. `secondary` may equal
/// `primary`, in which case the student has no fallback interest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub primary: String,
    pub secondary: String,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Whether the secondary interest names a different topic than the primary
    pub fn has_fallback(&self) -> bool {
        self.secondary != self.primary
    }
}

/// A discussion group: one interest and the students placed under it.
///
/// Groups are only built by the partitioner, which guarantees
/// `MIN_GROUP_SIZE <= len <= MAX_GROUP_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<'a> {
    interest: &'a str,
    members: Vec<&'a Student>,
}

impl<'a> Group<'a> {
    pub(crate) fn new(interest: &'a str, members: Vec<&'a Student>) -> Self {
        Self { interest, members }
    }

    pub fn interest(&self) -> &'a str {
        self.interest
    }

    /// Members in placement order (the order they were taken off the bucket)
    pub fn members(&self) -> &[&'a Student] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The outcome of one trial: the groups it formed and who was left over.
///
/// Every input student appears exactly once, either in one group or in the
/// ungrouped remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<'a> {
    groups: Vec<Group<'a>>,
    ungrouped: Vec<&'a Student>,
    /// Index of the trial that produced this plan
    trial: usize,
    /// Base seed of the run; `base_seed + trial` seeds the trial's RNG
    seed: u64,
}

impl<'a> Plan<'a> {
    pub(crate) fn new(
        groups: Vec<Group<'a>>,
        ungrouped: Vec<&'a Student>,
        trial: usize,
        seed: u64,
    ) -> Self {
        Self {
            groups,
            ungrouped,
            trial,
            seed,
        }
    }

    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group<'a>> {
        self.groups
    }

    /// Students that did not land in any group
    pub fn ungrouped(&self) -> &[&'a Student] {
        &self.ungrouped
    }

    pub fn ungrouped_count(&self) -> usize {
        self.ungrouped.len()
    }

    pub fn grouped_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn total_students(&self) -> usize {
        self.grouped_count() + self.ungrouped_count()
    }

    pub fn trial(&self) -> usize {
        self.trial
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
