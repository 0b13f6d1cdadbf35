use crate::{
    error::AnalysisError,
    record::{Metric, Operation, PerformanceRecord, RecordSet, Structure},
};
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

/// The winning run for an operation (or over all runs) under one metric
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub operation: Operation,
    pub structure: Structure,
    pub metric: Metric,
    pub value: f64,
    pub data_size: u64,
}

impl Recommendation {
    fn from_record(record: &PerformanceRecord, metric: Metric) -> Self {
        Self {
            operation: record.operation,
            structure: record.structure,
            metric,
            value: metric.value(record),
            data_size: record.data_size,
        }
    }
}

/// metric an operation is ranked by, lower is better
pub fn ranking_metric(operation: Operation) -> Metric {
    match operation {
        Operation::Search => Metric::KeyComparisons,
        _ => Metric::ExecutionTimeMs,
    }
}

// first record reaching the minimum wins, later equal values never replace it
fn stable_argmin<'a, I>(
    records: I,
    metric: Metric,
) -> Result<Option<&'a PerformanceRecord>, AnalysisError>
where
    I: IntoIterator<Item = &'a PerformanceRecord>,
{
    records.into_iter().try_fold(None, |best, record| {
        let value = metric.value(record);
        if !value.is_finite() {
            return Err(AnalysisError::InvalidRecord(format!(
                "{}/{} has a {metric} of {value}",
                record.structure, record.operation
            )));
        }

        Ok(match best {
            Some(current) if metric.value(current).total_cmp(&value).is_le() => Some(current),
            _ => Some(record),
        })
    })
}

/// Select the best structure for `operation` out of `records`
pub fn recommend<'a, I>(records: I, operation: Operation) -> Result<Recommendation, AnalysisError>
where
    I: IntoIterator<Item = &'a PerformanceRecord>,
{
    let metric = ranking_metric(operation);

    let winner = stable_argmin(
        records
            .into_iter()
            .filter(|record| record.operation == operation),
        metric,
    )?
    .ok_or(AnalysisError::EmptyOperationGroup(operation))?;

    debug!(
        operation = %operation,
        structure = %winner.structure,
        metric = %metric,
        "Selected best performer"
    );

    Ok(Recommendation::from_record(winner, metric))
}

/// One recommendation per operation present in `records`, in first-seen order
#[tracing::instrument(level = "debug", skip(records))]
pub fn recommend_all(records: &RecordSet) -> Result<Vec<Recommendation>, AnalysisError> {
    records
        .iter()
        .map(|record| record.operation)
        .unique()
        .map(|operation| recommend(records.records(), operation))
        .collect()
}

/// Best run over the whole record set for a single metric, regardless of operation
pub fn best_overall(
    records: &RecordSet,
    metric: Metric,
) -> Result<Recommendation, AnalysisError> {
    stable_argmin(records.records(), metric)?
        .map(|record| Recommendation::from_record(record, metric))
        .ok_or(AnalysisError::EmptyRecordSet)
}
