//! Corpus build orchestration for kbdocs.
//!
//! This crate ties the filesystem primitives, the four build operations and
//! the language target table into the sequential `build_corpus` driver.

pub mod fsops;
pub mod pipeline;
pub mod steps;
pub mod targets;

pub use pipeline::{
    BuildSummary, ProgressReporter, SilentProgress, StepReport, TargetReport, TargetStatus,
    build_corpus, run_target,
};
pub use targets::{Action, PlannedTarget, Target, plan};
