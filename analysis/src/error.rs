use crate::record::{Metric, Operation};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Cannot aggregate {metric} over the empty group {group}")]
    DegenerateGroup { group: String, metric: Metric },
    #[error("Ratio {numerator}/{denominator} is undefined, the denominator is zero")]
    UndefinedRatio { numerator: Metric, denominator: Metric },
    #[error("No records found for operation {0}")]
    EmptyOperationGroup(Operation),
    #[error("No records to select from")]
    EmptyRecordSet,
    #[error("Unknown {kind} '{value}'")]
    UnknownCategory { kind: CategoryKind, value: String },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Cannot compare {left} against {right}")]
    MetricMismatch { left: Metric, right: Metric },
}

/// which closed enumeration a rejected value was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Structure,
    Operation,
    Metric,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Structure => "structure",
            Self::Operation => "operation",
            Self::Metric => "metric",
        })
    }
}
