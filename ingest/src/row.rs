use dsan_analysis::{AnalysisError, Operation, PerformanceRecord, Structure};
use serde::Deserialize;

/// Header written by the benchmark harness, every column is required
pub const COLUMNS: [&str; 11] = [
    "Structure",
    "Operation",
    "Data_Size",
    "Execution_Time_ms",
    "Rotations",
    "Key_Comparisons",
    "Insertion_Fixups",
    "Deletion_Fixups",
    "Search_Depth",
    "Nodes_Visited",
    "Color_Changes",
];

/// One CSV row before its categories are checked
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RawRecord {
    #[serde(rename = "Structure")]
    pub structure: String,
    #[serde(rename = "Operation")]
    pub operation: String,
    #[serde(rename = "Data_Size")]
    pub data_size: u64,
    #[serde(rename = "Execution_Time_ms")]
    pub execution_time_ms: f64,
    #[serde(rename = "Rotations")]
    pub rotations: u64,
    #[serde(rename = "Key_Comparisons")]
    pub key_comparisons: u64,
    #[serde(rename = "Insertion_Fixups")]
    pub insertion_fixups: u64,
    #[serde(rename = "Deletion_Fixups")]
    pub deletion_fixups: u64,
    #[serde(rename = "Search_Depth")]
    pub search_depth: u64,
    #[serde(rename = "Nodes_Visited")]
    pub nodes_visited: u64,
    #[serde(rename = "Color_Changes")]
    pub color_changes: u64,
}

impl TryFrom<RawRecord> for PerformanceRecord {
    type Error = AnalysisError;

    fn try_from(row: RawRecord) -> Result<Self, Self::Error> {
        let record = PerformanceRecord {
            structure: row.structure.parse::<Structure>()?,
            operation: row.operation.parse::<Operation>()?,
            data_size: row.data_size,
            execution_time_ms: row.execution_time_ms,
            key_comparisons: row.key_comparisons,
            rotations: row.rotations,
            insertion_fixups: row.insertion_fixups,
            deletion_fixups: row.deletion_fixups,
            color_changes: row.color_changes,
            search_depth: row.search_depth,
            nodes_visited: row.nodes_visited,
        };
        record.validate()?;

        Ok(record)
    }
}
