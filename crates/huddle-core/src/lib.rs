//! huddle-core: interest-based discussion grouping
//!
//! This crate provides:
//! - Bucketing students by primary interest
//! - An absorption pass that folds tiny buckets into secondary interests
//! - A randomized augmentation pass that tops up 2-3 student buckets
//! - A table-driven partitioner that splits buckets into groups of 4-8
//! - A multi-trial orchestrator that keeps the plan with the fewest
//!   ungrouped students
//! - JSON/CSV student sources and plan sinks
//!
//! ```rust
//! use huddle_core::{regroup, Student};
//!
//! let students: Vec<Student> = (0..9)
//!     .map(|i| Student::new(i.to_string(), "robotics", "chess"))
//!     .collect();
//! let plan = regroup(&students);
//!
//! assert_eq!(plan.groups().len(), 2);
//! assert_eq!(plan.ungrouped_count(), 0);
//! ```

pub mod absorb;
pub mod augment;
pub mod bucket;
pub mod io;
pub mod partition;
pub mod stats;
pub mod student;
pub mod trial;

// Re-exports
pub use absorb::{absorb_undersized, ABSORBING_BUCKET_MIN};
pub use augment::{augment_undersized, draw_target_size, recruit, AUGMENTABLE_SIZES};
pub use bucket::{bucket_by_interest, population, Bucket, Buckets};
pub use io::{
    read_students, read_students_csv, read_students_json, write_plan_csv, write_plan_json,
    StudentFormat,
};
pub use partition::{
    partition_buckets, pop_groups, schedule, split_size, Schedule, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
pub use stats::PlanStats;
pub use student::{Group, Plan, Student};
pub use trial::{regroup, regroup_with_options, run_trial, TrialOptions, DEFAULT_TRIALS};
