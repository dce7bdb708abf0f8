//! Summary statistics for a plan

use crate::student::Plan;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub total_students: usize,
    pub grouped: usize,
    pub ungrouped: usize,
    pub groups: usize,
    /// Group size -> number of groups of that size
    pub size_histogram: BTreeMap<usize, usize>,
    /// Distinct interests that received at least one group
    pub interests_covered: usize,
    /// Trial index that produced the plan
    pub trial: usize,
    /// Base seed of the run that produced the plan
    pub seed: u64,
}

impl PlanStats {
    pub fn from_plan(plan: &Plan<'_>) -> Self {
        let mut size_histogram = BTreeMap::new();
        let mut interests = BTreeSet::new();
        for group in plan.groups() {
            *size_histogram.entry(group.len()).or_insert(0) += 1;
            interests.insert(group.interest());
        }

        Self {
            total_students: plan.total_students(),
            grouped: plan.grouped_count(),
            ungrouped: plan.ungrouped_count(),
            groups: plan.groups().len(),
            size_histogram,
            interests_covered: interests.len(),
            trial: plan.trial(),
            seed: plan.seed(),
        }
    }

    /// Fraction of students placed in a group, 1.0 for an empty population
    pub fn placement_rate(&self) -> f64 {
        if self.total_students == 0 {
            return 1.0;
        }
        self.grouped as f64 / self.total_students as f64
    }
}
