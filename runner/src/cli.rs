use crate::render::Format;
use clap::{Parser, ValueEnum};
use dsan_analysis::{Grouping, Operation};
use std::path::PathBuf;

/// Summarize, compare and rank data structure benchmark results
#[derive(Parser, Debug)]
#[command(name = "dsan", version, about, long_about = None)]
pub struct Cli {
    /// CSV files or directories containing benchmark results
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format of the report
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Key for the general summary tables
    #[arg(long, value_enum)]
    pub group_by: Option<GroupBy>,

    /// Operation to recommend a structure for, repeat for several (default: all present)
    #[arg(short = 'o', long = "operation")]
    pub operations: Vec<Operation>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    StructureOperation,
    Structure,
}

impl From<GroupBy> for Grouping {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::StructureOperation => Grouping::StructureOperation,
            GroupBy::Structure => Grouping::Structure,
        }
    }
}

impl Cli {
    /// log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
