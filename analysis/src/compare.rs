use crate::{
    error::AnalysisError,
    group::{GroupKey, GroupSummary, MetricSummary},
    record::Metric,
};
use serde::{Serialize, Serializer};
use std::{collections::HashMap, fmt};
use tracing::debug;

/// Quotient of two aggregates, `Undefined` whenever the denominator is exactly zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Self::Undefined
        } else {
            Self::Defined(numerator / denominator)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Defined(value) => serializer.serialize_f64(*value),
            Self::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{value}"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// metric_a / metric_b within one group
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupRatio {
    pub key: GroupKey,
    pub numerator: Metric,
    pub denominator: Metric,
    pub ratio: Ratio,
}

impl GroupRatio {
    pub fn value(&self) -> Result<f64, AnalysisError> {
        self.ratio.value().ok_or(AnalysisError::UndefinedRatio {
            numerator: self.numerator,
            denominator: self.denominator,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Larger {
    Left,
    Right,
    Tie,
}

/// Difference of the totals of one metric between two groups
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TotalsComparison {
    pub metric: Metric,
    pub left: GroupKey,
    pub right: GroupKey,
    pub left_total: f64,
    pub right_total: f64,
    /// `left_total - right_total`
    pub difference: f64,
    pub larger: Larger,
    pub label: String,
}

/// Compare `sum(left) - sum(right)` for summaries of the same metric
pub fn compare_totals(
    left: &GroupSummary,
    right: &GroupSummary,
) -> Result<TotalsComparison, AnalysisError> {
    if left.summary.metric != right.summary.metric {
        return Err(AnalysisError::MetricMismatch {
            left: left.summary.metric,
            right: right.summary.metric,
        });
    }

    let difference = left.summary.sum - right.summary.sum;
    let (larger, label) = if difference > 0.0 {
        (Larger::Left, format!("{} has more", left.key))
    } else if difference < 0.0 {
        (Larger::Right, format!("{} has more", right.key))
    } else {
        (Larger::Tie, "tie".to_owned())
    };

    debug!(
        metric = %left.summary.metric,
        left = %left.key,
        right = %right.key,
        difference,
        "Compared totals"
    );

    Ok(TotalsComparison {
        metric: left.summary.metric,
        left: left.key,
        right: right.key,
        left_total: left.summary.sum,
        right_total: right.summary.sum,
        difference,
        larger,
        label,
    })
}

/// mean(numerator) / mean(denominator) for two summaries of the same group
pub fn ratio_of_means(
    key: GroupKey,
    numerator: &MetricSummary,
    denominator: &MetricSummary,
) -> GroupRatio {
    GroupRatio {
        key,
        numerator: numerator.metric,
        denominator: denominator.metric,
        ratio: Ratio::of(numerator.mean, denominator.mean),
    }
}

/// Per-unit efficiency `numerator / denominator` for every group of `numerators`, matched by
/// key against the `denominator` summaries in `denominators`
///
/// Output follows the order of `numerators`. A group without a denominator summary is
/// `Undefined` just like a zero denominator.
pub fn per_unit(
    numerators: &[GroupSummary],
    denominators: &[GroupSummary],
    denominator: Metric,
) -> Vec<GroupRatio> {
    let lookup: HashMap<GroupKey, &MetricSummary> = denominators
        .iter()
        .filter(|group| group.summary.metric == denominator)
        .map(|group| (group.key, &group.summary))
        .collect();

    numerators
        .iter()
        .map(|group| match lookup.get(&group.key) {
            Some(summary) => ratio_of_means(group.key, &group.summary, summary),
            None => GroupRatio {
                key: group.key,
                numerator: group.summary.metric,
                denominator,
                ratio: Ratio::Undefined,
            },
        })
        .collect()
}
