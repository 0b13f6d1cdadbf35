use crate::error::{AnalysisError, CategoryKind};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref, str::FromStr};

/// The data structure variant a run was measured on
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Structure {
    #[serde(rename = "avl")]
    Avl,
    #[serde(rename = "rb")]
    RedBlack,
    #[serde(rename = "open-hash")]
    OpenHash,
    #[serde(rename = "extern-hash")]
    ExternHash,
}

/// The operation a run measured
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Search,
    Remove,
}

/// Every numeric column of a record that can be aggregated
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ExecutionTimeMs,
    KeyComparisons,
    Rotations,
    InsertionFixups,
    DeletionFixups,
    ColorChanges,
    SearchDepth,
    NodesVisited,
}

// Applicability table for the tree-only metrics. Adding a structure only
// requires a new row here.
const TREE_METRICS: [(Structure, &[Metric]); 4] = [
    (
        Structure::Avl,
        &[
            Metric::Rotations,
            Metric::InsertionFixups,
            Metric::DeletionFixups,
        ],
    ),
    (
        Structure::RedBlack,
        &[
            Metric::Rotations,
            Metric::InsertionFixups,
            Metric::DeletionFixups,
            Metric::ColorChanges,
        ],
    ),
    (Structure::OpenHash, &[]),
    (Structure::ExternHash, &[]),
];

const SEARCH_METRICS: [Metric; 2] = [Metric::SearchDepth, Metric::NodesVisited];

pub fn is_tree(structure: Structure) -> bool {
    structure.is_tree()
}

pub fn is_search_op(operation: Operation) -> bool {
    operation.is_search()
}

/// strip everything but alphanumerics and lowercase the rest, so that harness labels like
/// "RedBlack Tree" and canonical names like "rb" end up comparable
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl Structure {
    pub const ALL: [Structure; 4] = [
        Structure::Avl,
        Structure::RedBlack,
        Structure::OpenHash,
        Structure::ExternHash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avl => "avl",
            Self::RedBlack => "rb",
            Self::OpenHash => "open-hash",
            Self::ExternHash => "extern-hash",
        }
    }

    /// tree-only metrics that carry meaning for this structure
    pub fn tree_metrics(&self) -> &'static [Metric] {
        TREE_METRICS
            .iter()
            .find(|(structure, _)| structure == self)
            .map(|(_, metrics)| *metrics)
            .unwrap_or(&[])
    }

    pub fn is_tree(&self) -> bool {
        !self.tree_metrics().is_empty()
    }
}

impl FromStr for Structure {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "avl" | "avltree" => Ok(Self::Avl),
            "rb" | "redblack" | "redblacktree" | "rbtree" => Ok(Self::RedBlack),
            "openhash" | "open" | "openhashmap" => Ok(Self::OpenHash),
            "externhash" | "extern" | "externhashmap" => Ok(Self::ExternHash),
            _ => Err(AnalysisError::UnknownCategory {
                kind: CategoryKind::Structure,
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Insert, Operation::Search, Operation::Remove];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Search => "search",
            Self::Remove => "remove",
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search)
    }
}

impl FromStr for Operation {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "insert" => Ok(Self::Insert),
            "search" => Ok(Self::Search),
            "remove" => Ok(Self::Remove),
            _ => Err(AnalysisError::UnknownCategory {
                kind: CategoryKind::Operation,
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::ExecutionTimeMs,
        Metric::KeyComparisons,
        Metric::Rotations,
        Metric::InsertionFixups,
        Metric::DeletionFixups,
        Metric::ColorChanges,
        Metric::SearchDepth,
        Metric::NodesVisited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecutionTimeMs => "execution_time_ms",
            Self::KeyComparisons => "key_comparisons",
            Self::Rotations => "rotations",
            Self::InsertionFixups => "insertion_fixups",
            Self::DeletionFixups => "deletion_fixups",
            Self::ColorChanges => "color_changes",
            Self::SearchDepth => "search_depth",
            Self::NodesVisited => "nodes_visited",
        }
    }

    /// number of decimal digits used when presenting values of this metric
    pub fn precision(&self) -> u32 {
        match self {
            Self::ExecutionTimeMs => 3,
            _ => 2,
        }
    }

    pub fn is_tree_only(&self) -> bool {
        TREE_METRICS
            .iter()
            .any(|(_, metrics)| metrics.contains(self))
    }

    pub fn is_search_only(&self) -> bool {
        SEARCH_METRICS.contains(self)
    }

    /// whether a value of this metric means anything for the given combination
    pub fn applies_to(&self, structure: Structure, operation: Operation) -> bool {
        if self.is_tree_only() {
            structure.tree_metrics().contains(self)
        } else if self.is_search_only() {
            operation.is_search()
        } else {
            true
        }
    }

    pub fn value(&self, record: &PerformanceRecord) -> f64 {
        match self {
            Self::ExecutionTimeMs => record.execution_time_ms,
            Self::KeyComparisons => record.key_comparisons as f64,
            Self::Rotations => record.rotations as f64,
            Self::InsertionFixups => record.insertion_fixups as f64,
            Self::DeletionFixups => record.deletion_fixups as f64,
            Self::ColorChanges => record.color_changes as f64,
            Self::SearchDepth => record.search_depth as f64,
            Self::NodesVisited => record.nodes_visited as f64,
        }
    }
}

impl FromStr for Metric {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(value);

        Self::ALL
            .into_iter()
            .find(|metric| normalize(metric.as_str()) == normalized)
            .ok_or_else(|| AnalysisError::UnknownCategory {
                kind: CategoryKind::Metric,
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measured benchmark run
///
/// Metrics that do not apply to the structure/operation of the run are `0`, not absent, and
/// still count towards aggregates.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub structure: Structure,
    pub operation: Operation,
    pub data_size: u64,
    pub execution_time_ms: f64,
    pub key_comparisons: u64,
    pub rotations: u64,
    pub insertion_fixups: u64,
    pub deletion_fixups: u64,
    pub color_changes: u64,
    pub search_depth: u64,
    pub nodes_visited: u64,
}

impl PerformanceRecord {
    /// create a record with every counter zeroed
    pub fn new(
        structure: Structure,
        operation: Operation,
        data_size: u64,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            structure,
            operation,
            data_size,
            execution_time_ms,
            key_comparisons: 0,
            rotations: 0,
            insertion_fixups: 0,
            deletion_fixups: 0,
            color_changes: 0,
            search_depth: 0,
            nodes_visited: 0,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.data_size == 0 {
            return Err(AnalysisError::InvalidRecord(format!(
                "{}/{} has a data size of 0",
                self.structure, self.operation
            )));
        }

        if !self.execution_time_ms.is_finite() || self.execution_time_ms < 0.0 {
            return Err(AnalysisError::InvalidRecord(format!(
                "{}/{} has an execution time of {} ms",
                self.structure, self.operation, self.execution_time_ms
            )));
        }

        Ok(())
    }
}

/// Ordered, validated and immutable set of records
///
/// The order is the order the runs were recorded in and decides ties downstream.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RecordSet(Vec<PerformanceRecord>);

impl RecordSet {
    pub fn new(records: Vec<PerformanceRecord>) -> Result<Self, AnalysisError> {
        records.iter().try_for_each(PerformanceRecord::validate)?;

        Ok(Self(records))
    }

    pub fn records(&self) -> &[PerformanceRecord] {
        &self.0
    }
}

impl Deref for RecordSet {
    type Target = [PerformanceRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<PerformanceRecord>> for RecordSet {
    type Error = AnalysisError;

    fn try_from(records: Vec<PerformanceRecord>) -> Result<Self, Self::Error> {
        Self::new(records)
    }
}
