use clap::ValueEnum;
use dsan_analysis::{
    compare::{GroupRatio, Ratio},
    group::{round_to, GroupSummary},
    recommend::Recommendation,
    report::{RecommendationEntry, Report},
    Metric,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use thiserror::Error;

// ratios are dimensionless, presented like counts
const RATIO_PRECISION: u32 = 2;
const NOT_APPLICABLE: &str = "n/a";

#[derive(ValueEnum, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// sectioned tables for humans
    #[default]
    Text,
    /// the full report as YAML
    Yaml,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write report")]
    Io(#[from] io::Error),
    #[error("Failed to serialize report")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn render<W: Write>(report: &Report, format: Format, out: &mut W) -> Result<(), RenderError> {
    match format {
        Format::Text => Ok(render_text(report, out)?),
        Format::Yaml => Ok(serde_yaml::to_writer(out, report)?),
    }
}

fn format_value(value: f64, metric: Metric) -> String {
    format!("{:.*}", metric.precision() as usize, value)
}

fn format_ratio(ratio: Ratio) -> String {
    match ratio {
        Ratio::Defined(value) => format!(
            "{:.*}",
            RATIO_PRECISION as usize,
            round_to(value, RATIO_PRECISION)
        ),
        Ratio::Undefined => NOT_APPLICABLE.to_owned(),
    }
}

fn format_recommendation(recommendation: &Recommendation) -> String {
    format!(
        "{} ({} {}, data size {})",
        recommendation.structure,
        format_value(recommendation.value, recommendation.metric),
        recommendation.metric,
        recommendation.data_size
    )
}

fn write_table<W: Write>(out: &mut W, title: &str, summaries: &[GroupSummary]) -> io::Result<()> {
    writeln!(out, "\n== {title} ==")?;

    if summaries.is_empty() {
        return writeln!(out, "no data");
    }

    let with_extrema = summaries.iter().any(|group| group.summary.min.is_some());
    let width = summaries
        .iter()
        .map(|group| group.key.to_string().len())
        .max()
        .unwrap_or(0)
        .max("group".len());

    write!(out, "{:<width$} {:>8} {:>14} {:>14}", "group", "count", "mean", "sum")?;
    if with_extrema {
        write!(out, " {:>14} {:>14}", "min", "max")?;
    }
    writeln!(out)?;

    for group in summaries {
        let summary = group.summary.rounded();
        write!(
            out,
            "{:<width$} {:>8} {:>14} {:>14}",
            group.key.to_string(),
            summary.count,
            format_value(summary.mean, summary.metric),
            format_value(summary.sum, summary.metric),
        )?;

        if let (Some(min), Some(max)) = (summary.min, summary.max) {
            write!(
                out,
                " {:>14} {:>14}",
                format_value(min, summary.metric),
                format_value(max, summary.metric)
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_ratios<W: Write>(out: &mut W, title: &str, ratios: &[GroupRatio]) -> io::Result<()> {
    writeln!(out, "{title}:")?;

    if ratios.is_empty() {
        return writeln!(out, "  no data");
    }

    for ratio in ratios {
        writeln!(out, "  {:<24} {:>10}", ratio.key.to_string(), format_ratio(ratio.ratio))?;
    }

    Ok(())
}

fn render_text<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    let overview = &report.overview;

    writeln!(out, "Loaded {} performance measurements", overview.record_count)?;
    writeln!(out, "Structures tested: {}", overview.structures.iter().join(", "))?;
    writeln!(out, "Operations tested: {}", overview.operations.iter().join(", "))?;
    writeln!(out, "Data sizes tested: {}", overview.data_sizes.iter().join(", "))?;

    for table in report.tables() {
        write_table(out, table.title, table.summaries)?;
    }

    writeln!(out, "\n== Tree totals ==")?;
    if report.trees.totals.is_empty() {
        writeln!(out, "no data")?;
    }
    for totals in report.trees.totals.iter() {
        writeln!(
            out,
            "{}: {} {} vs {} {}, difference {} ({})",
            totals.metric,
            totals.left,
            format_value(totals.left_total, totals.metric),
            totals.right,
            format_value(totals.right_total, totals.metric),
            format_value(totals.difference.abs(), totals.metric),
            totals.label
        )?;
    }

    writeln!(out, "\n== Ratios ==")?;
    write_ratios(
        out,
        "Key comparisons per node visited",
        &report.search.comparisons_per_node,
    )?;
    write_ratios(
        out,
        "Rotations per insertion fixup",
        &report.trees.rotations_per_fixup,
    )?;

    writeln!(out, "\n== Recommendations ==")?;
    if report.recommendations.is_empty() {
        writeln!(out, "no data")?;
    }
    for entry in report.recommendations.iter() {
        match entry {
            RecommendationEntry::Recommended(recommendation) => writeln!(
                out,
                "Best for {}: {}",
                recommendation.operation,
                format_recommendation(recommendation)
            )?,
            RecommendationEntry::NotApplicable { operation } => {
                writeln!(out, "Best for {operation}: {NOT_APPLICABLE} (no records)")?
            }
        }
    }

    if let Some(fastest) = &report.best_overall.fastest {
        writeln!(out, "Best for speed: {}", format_recommendation(fastest))?;
    }
    if let Some(fewest) = &report.best_overall.fewest_key_comparisons {
        writeln!(out, "Best for key comparisons: {}", format_recommendation(fewest))?;
    }

    Ok(())
}
