use crate::{
    compare::{compare_totals, per_unit, GroupRatio, TotalsComparison},
    error::AnalysisError,
    group::{summarize_by, Aggregates, GroupSummary, KeyField},
    recommend::{best_overall, recommend, recommend_all, Recommendation},
    record::{is_search_op, is_tree, Metric, Operation, PerformanceRecord, RecordSet, Structure},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const TREE_METRICS: [Metric; 4] = [
    Metric::Rotations,
    Metric::InsertionFixups,
    Metric::DeletionFixups,
    Metric::ColorChanges,
];

const TOTALS_METRICS: [Metric; 3] = [
    Metric::Rotations,
    Metric::InsertionFixups,
    Metric::DeletionFixups,
];

/// Key used for the general (non search, non scaling) sections of a report
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    #[default]
    StructureOperation,
    Structure,
}

impl Grouping {
    pub fn fields(&self) -> &'static [KeyField] {
        match self {
            Self::StructureOperation => &[KeyField::Structure, KeyField::Operation],
            Self::Structure => &[KeyField::Structure],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub grouping: Grouping,
    /// operations to recommend a structure for, `None` selects every operation in the data
    pub operations: Option<Vec<Operation>>,
    /// operation whose execution time is tracked across data sizes
    pub scaling_operation: Operation,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            grouping: Grouping::default(),
            operations: None,
            scaling_operation: Operation::Insert,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Overview {
    pub record_count: usize,
    pub structures: Vec<Structure>,
    pub operations: Vec<Operation>,
    pub data_sizes: Vec<u64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchSection {
    pub key_comparisons: Vec<GroupSummary>,
    pub search_depth: Vec<GroupSummary>,
    pub nodes_visited: Vec<GroupSummary>,
    pub comparisons_per_node: Vec<GroupRatio>,
}

/// Tree-only metrics, restricted to the structures they apply to
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TreeSection {
    pub rotations: Vec<GroupSummary>,
    pub insertion_fixups: Vec<GroupSummary>,
    pub deletion_fixups: Vec<GroupSummary>,
    pub color_changes: Vec<GroupSummary>,
    pub totals: Vec<TotalsComparison>,
    pub rotations_per_fixup: Vec<GroupRatio>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationEntry {
    Recommended(Recommendation),
    NotApplicable { operation: Operation },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BestOverall {
    pub fastest: Option<Recommendation>,
    pub fewest_key_comparisons: Option<Recommendation>,
}

/// Everything a presentation layer needs, without any formatting applied
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub overview: Overview,
    pub execution_time: Vec<GroupSummary>,
    pub key_comparisons: Vec<GroupSummary>,
    pub search: SearchSection,
    pub trees: TreeSection,
    pub scaling: Vec<GroupSummary>,
    pub recommendations: Vec<RecommendationEntry>,
    pub best_overall: BestOverall,
}

/// A titled list of group summaries, in report order
#[derive(Debug, Clone, Copy)]
pub struct SummaryTable<'r> {
    pub title: &'static str,
    pub summaries: &'r [GroupSummary],
}

impl Report {
    /// all summary sections of the report, in the order they were assembled
    pub fn tables(&self) -> Vec<SummaryTable<'_>> {
        [
            ("Execution time (ms)", &self.execution_time),
            ("Key comparisons", &self.key_comparisons),
            ("Search: key comparisons", &self.search.key_comparisons),
            ("Search: depth", &self.search.search_depth),
            ("Search: nodes visited", &self.search.nodes_visited),
            ("Trees: rotations", &self.trees.rotations),
            ("Trees: insertion fixups", &self.trees.insertion_fixups),
            ("Trees: deletion fixups", &self.trees.deletion_fixups),
            ("Trees: color changes", &self.trees.color_changes),
            ("Scaling: execution time by data size", &self.scaling),
        ]
        .into_iter()
        .map(|(title, summaries)| SummaryTable {
            title,
            summaries: summaries.as_slice(),
        })
        .collect()
    }
}

impl Overview {
    fn of(records: &[PerformanceRecord]) -> Self {
        Self {
            record_count: records.len(),
            structures: records.iter().map(|record| record.structure).unique().collect(),
            operations: records.iter().map(|record| record.operation).unique().collect(),
            data_sizes: records
                .iter()
                .map(|record| record.data_size)
                .unique()
                .sorted()
                .collect(),
        }
    }
}

impl SearchSection {
    fn assemble(records: &[PerformanceRecord]) -> Result<Self, AnalysisError> {
        let fields = [KeyField::Structure, KeyField::Operation];
        let search = records
            .iter()
            .filter(|record| is_search_op(record.operation))
            .collect_vec();

        let summarize = |metric: Metric| {
            summarize_by(
                search.iter().copied(),
                &fields,
                metric,
                Aggregates::WITH_EXTREMA,
            )
        };

        let key_comparisons = summarize(Metric::KeyComparisons)?;
        let search_depth = summarize(Metric::SearchDepth)?;
        let nodes_visited = summarize(Metric::NodesVisited)?;
        let comparisons_per_node =
            per_unit(&key_comparisons, &nodes_visited, Metric::NodesVisited);

        Ok(Self {
            key_comparisons,
            search_depth,
            nodes_visited,
            comparisons_per_node,
        })
    }
}

/// summaries of `metric` over the records it carries meaning for
fn applicable_summaries(
    records: &[PerformanceRecord],
    fields: &[KeyField],
    metric: Metric,
) -> Result<Vec<GroupSummary>, AnalysisError> {
    summarize_by(
        records
            .iter()
            .filter(|record| metric.applies_to(record.structure, record.operation)),
        fields,
        metric,
        Aggregates::BASIC,
    )
}

impl TreeSection {
    fn assemble(records: &[PerformanceRecord], fields: &[KeyField]) -> Result<Self, AnalysisError> {
        let trees = records
            .iter()
            .filter(|record| is_tree(record.structure))
            .cloned()
            .collect_vec();
        let records = trees.as_slice();

        let [rotations, insertion_fixups, deletion_fixups, color_changes] = TREE_METRICS
            .map(|metric| applicable_summaries(records, fields, metric));

        let mut totals = Vec::new();
        for metric in TOTALS_METRICS {
            let per_structure = applicable_summaries(records, &[KeyField::Structure], metric)?;

            for (left, right) in per_structure.iter().tuple_combinations() {
                totals.push(compare_totals(left, right)?);
            }
        }

        let inserts = records
            .iter()
            .filter(|record| record.operation == Operation::Insert)
            .cloned()
            .collect_vec();
        let ratio_fields = [KeyField::Structure, KeyField::Operation];
        let rotations_per_fixup = per_unit(
            &applicable_summaries(&inserts, &ratio_fields, Metric::Rotations)?,
            &applicable_summaries(&inserts, &ratio_fields, Metric::InsertionFixups)?,
            Metric::InsertionFixups,
        );

        Ok(Self {
            rotations: rotations?,
            insertion_fixups: insertion_fixups?,
            deletion_fixups: deletion_fixups?,
            color_changes: color_changes?,
            totals,
            rotations_per_fixup,
        })
    }
}

/// mean execution time per (data size, structure), sizes ascending
fn scaling(
    records: &[PerformanceRecord],
    operation: Operation,
) -> Result<Vec<GroupSummary>, AnalysisError> {
    let summaries = summarize_by(
        records
            .iter()
            .filter(|record| record.operation == operation),
        &[KeyField::DataSize, KeyField::Structure],
        Metric::ExecutionTimeMs,
        Aggregates::BASIC,
    )?;

    Ok(summaries
        .into_iter()
        .sorted_by_key(|summary| summary.key.data_size)
        .collect())
}

fn recommendations(
    records: &RecordSet,
    requested: Option<&[Operation]>,
) -> Result<Vec<RecommendationEntry>, AnalysisError> {
    let Some(operations) = requested else {
        return Ok(recommend_all(records)?
            .into_iter()
            .map(RecommendationEntry::Recommended)
            .collect());
    };

    operations
        .iter()
        .map(|&operation| match recommend(records.records(), operation) {
            Ok(recommendation) => Ok(RecommendationEntry::Recommended(recommendation)),
            Err(AnalysisError::EmptyOperationGroup(operation)) => {
                warn!(operation = %operation, "No records to recommend a structure from");

                Ok(RecommendationEntry::NotApplicable { operation })
            }
            Err(error) => Err(error),
        })
        .collect()
}

/// Build the full report for a record set
#[tracing::instrument(level = "info", skip(record_set))]
pub fn assemble(record_set: &RecordSet, options: &ReportOptions) -> Result<Report, AnalysisError> {
    let records = record_set.records();
    let fields = options.grouping.fields();
    let overview = Overview::of(records);

    info!(
        records = overview.record_count,
        structures = overview.structures.len(),
        operations = overview.operations.len(),
        "Assembling report"
    );

    let best = if records.is_empty() {
        BestOverall {
            fastest: None,
            fewest_key_comparisons: None,
        }
    } else {
        BestOverall {
            fastest: Some(best_overall(record_set, Metric::ExecutionTimeMs)?),
            fewest_key_comparisons: Some(best_overall(record_set, Metric::KeyComparisons)?),
        }
    };

    Ok(Report {
        execution_time: summarize_by(
            records,
            fields,
            Metric::ExecutionTimeMs,
            Aggregates::WITH_EXTREMA,
        )?,
        key_comparisons: summarize_by(records, fields, Metric::KeyComparisons, Aggregates::BASIC)?,
        search: SearchSection::assemble(records)?,
        trees: TreeSection::assemble(records, fields)?,
        scaling: scaling(records, options.scaling_operation)?,
        recommendations: recommendations(record_set, options.operations.as_deref())?,
        best_overall: best,
        overview,
    })
}
