use crate::{
    error::AnalysisError,
    record::{Metric, Operation, PerformanceRecord, Structure},
};
use itertools::{Itertools, MinMaxResult};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};
use tracing::{debug, trace};

/// A record field that can take part in a group key
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KeyField {
    Structure,
    Operation,
    DataSize,
}

/// Values of the selected key fields, unselected fields stay `None`
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GroupKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<Structure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u64>,
}

impl GroupKey {
    pub fn of(record: &PerformanceRecord, fields: &[KeyField]) -> Self {
        fields.iter().fold(Self::default(), |mut key, field| {
            match field {
                KeyField::Structure => key.structure = Some(record.structure),
                KeyField::Operation => key.operation = Some(record.operation),
                KeyField::DataSize => key.data_size = Some(record.data_size),
            }

            key
        })
    }

    pub fn structure(structure: Structure) -> Self {
        Self {
            structure: Some(structure),
            ..Self::default()
        }
    }

    pub fn structure_operation(structure: Structure, operation: Operation) -> Self {
        Self {
            structure: Some(structure),
            operation: Some(operation),
            data_size: None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .structure
            .map(|structure| structure.to_string())
            .into_iter()
            .chain(self.operation.map(|operation| operation.to_string()))
            .chain(self.data_size.map(|size| size.to_string()))
            .collect_vec();

        if parts.is_empty() {
            f.write_str("all")
        } else {
            f.write_str(&parts.join("/"))
        }
    }
}

/// Records sharing one key, in record order
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub records: Vec<&'a PerformanceRecord>,
}

/// Which optional aggregates to compute next to count, sum and mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aggregates {
    pub extrema: bool,
}

impl Aggregates {
    pub const BASIC: Self = Self { extrema: false };
    pub const WITH_EXTREMA: Self = Self { extrema: true };
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl MetricSummary {
    /// copy of the summary rounded to the presentation precision of its metric
    pub fn rounded(&self) -> Self {
        let digits = self.metric.precision();

        Self {
            metric: self.metric,
            count: self.count,
            sum: round_to(self.sum, digits),
            mean: round_to(self.mean, digits),
            min: self.min.map(|value| round_to(value, digits)),
            max: self.max.map(|value| round_to(value, digits)),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    #[serde(flatten)]
    pub summary: MetricSummary,
}

/// round half away from zero to `digits` decimals
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);

    (value * factor).round() / factor
}

/// Partition records by the selected key fields
///
/// Groups appear in the order their key was first seen and are never empty.
pub fn group_by<'a, I>(records: I, fields: &[KeyField]) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a PerformanceRecord>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for record in records {
        let key = GroupKey::of(record, fields);

        match index.get(&key) {
            Some(&position) => groups[position].records.push(record),
            None => {
                trace!(key = %key, "Opened new group");
                index.insert(key, groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    debug!(groups = groups.len(), fields = ?fields, "Grouped records");

    groups
}

/// Aggregate a metric over a single group
pub fn summarize(
    group: &Group<'_>,
    metric: Metric,
    aggregates: Aggregates,
) -> Result<MetricSummary, AnalysisError> {
    if group.records.is_empty() {
        return Err(AnalysisError::DegenerateGroup {
            group: group.key.to_string(),
            metric,
        });
    }

    let count = group.records.len();
    let sum: f64 = group.records.iter().map(|record| metric.value(record)).sum();

    let (min, max) = if aggregates.extrema {
        match group
            .records
            .iter()
            .map(|record| metric.value(record))
            .minmax_by(f64::total_cmp)
        {
            MinMaxResult::NoElements => (None, None),
            MinMaxResult::OneElement(value) => (Some(value), Some(value)),
            MinMaxResult::MinMax(min, max) => (Some(min), Some(max)),
        }
    } else {
        (None, None)
    };

    Ok(MetricSummary {
        metric,
        count,
        sum,
        mean: sum / count as f64,
        min,
        max,
    })
}

/// Group records and aggregate one metric per group, keeping first-seen group order
#[tracing::instrument(level = "debug", skip(records))]
pub fn summarize_by<'a, I>(
    records: I,
    fields: &[KeyField],
    metric: Metric,
    aggregates: Aggregates,
) -> Result<Vec<GroupSummary>, AnalysisError>
where
    I: IntoIterator<Item = &'a PerformanceRecord>,
{
    let groups = group_by(records, fields);

    #[cfg(feature = "parallel")]
    let iter = groups.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = groups.iter();

    iter.map(|group| {
        summarize(group, metric, aggregates).map(|summary| GroupSummary {
            key: group.key,
            summary,
        })
    })
    .collect()
}
