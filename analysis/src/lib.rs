//! Aggregation and comparative analysis of data structure benchmark runs.
//!
//! Records flow through [`group`] (partitioning and per-group statistics), [`compare`]
//! (differences and guarded ratios), [`recommend`] (best performer per operation) and end up
//! in a [`report::Report`] for presentation layers to render.

pub mod compare;
pub mod error;
pub mod group;
pub mod recommend;
pub mod record;
pub mod report;

#[cfg(test)]
mod group_test;

pub use error::{AnalysisError, CategoryKind};
pub use record::{is_search_op, is_tree, Metric, Operation, PerformanceRecord, RecordSet, Structure};
pub use report::{assemble, Grouping, Report, ReportOptions};
