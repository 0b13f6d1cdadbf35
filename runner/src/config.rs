use crate::{cli::Cli, render::Format};
use dsan_analysis::{AnalysisError, Grouping, Operation, ReportOptions};
use globset::{GlobBuilder, GlobMatcher};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Error, path::Path};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Glob was invalid")]
    InvalidGlob(#[from] globset::Error),
    #[error("Config file could not be read")]
    FileNotFound(#[from] Error),
    #[error("Config file is not valid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("Invalid category in config: {0}")]
    InvalidCategory(#[from] AnalysisError),
    #[error("Preflight checks failed, see the log above for details")]
    PreflightFailed,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    // where to look for benchmark result tables
    #[serde(default)]
    pub inputs: InputConfig,
    // knobs for the report assembly
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub path: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    // only applied to files found while walking directories
    #[serde(default = "default_glob")]
    pub glob: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub grouping: Grouping,
    // kept as strings so every bad entry can be reported during preflight
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default = "default_scaling_operation")]
    pub scaling_operation: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Format,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            paths: Vec::new(),
            glob: default_glob(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            grouping: Grouping::default(),
            operations: Vec::new(),
            scaling_operation: default_scaling_operation(),
        }
    }
}

impl InputConfig {
    pub fn compile_glob(&self) -> Result<GlobMatcher, ConfigErrors> {
        Ok(GlobBuilder::new(&self.glob).build()?.compile_matcher())
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }

    /// command line flags take precedence over the config file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if !cli.inputs.is_empty() {
            self.inputs.path = None;
            self.inputs.paths = cli
                .inputs
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect();
        }

        if let Some(format) = cli.format {
            self.output.format = format;
        }

        if let Some(group_by) = cli.group_by {
            self.report.grouping = group_by.into();
        }

        if !cli.operations.is_empty() {
            self.report.operations = cli
                .operations
                .iter()
                .map(|operation| operation.as_str().to_owned())
                .collect();
        }
    }

    pub fn report_options(&self) -> Result<ReportOptions, ConfigErrors> {
        let operations = self
            .report
            .operations
            .iter()
            .map(|operation| operation.parse::<Operation>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReportOptions {
            grouping: self.report.grouping,
            operations: if operations.is_empty() {
                None
            } else {
                Some(operations.into_iter().unique().collect())
            },
            scaling_operation: self.report.scaling_operation.parse()?,
        })
    }

    /// Check the whole config and log every problem, returns true if any error was found
    pub fn preflight_checks(&mut self) -> bool {
        // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        if self.inputs.path.is_none() && self.inputs.paths.is_empty() {
            error!("inputs contains neither 'path' nor 'paths', there is nothing to analyze");
            contains_error = true;
        } else if let Some(ref path) = self.inputs.path {
            if !self.inputs.paths.is_empty() {
                warn!("inputs contains both 'path' and 'paths'. This will be treated as if 'path' is a member of 'paths'");
            }

            // merge path into paths if neccessary
            if !self.inputs.paths.contains(path) {
                self.inputs.paths.push(path.clone());
            }
        }

        for path in self.inputs.paths.iter() {
            if !Path::new(path).exists() {
                error!("Input {path} does not exist");
                contains_error = true;
            }
        }

        if self.inputs.glob.trim().is_empty() {
            error!("inputs.glob is empty, no result file could ever match");
            contains_error = true;
        } else if let Err(e) = self.inputs.compile_glob() {
            error!("inputs.glob '{}' is not a valid glob: {e}", self.inputs.glob);
            contains_error = true;
        }

        for operation in self.report.operations.iter() {
            if let Err(e) = operation.parse::<Operation>() {
                error!("report.operations: {e}, expected one of insert, search or remove");
                contains_error = true;
            }
        }

        if let Err(e) = self.report.scaling_operation.parse::<Operation>() {
            error!("report.scaling_operation: {e}, expected one of insert, search or remove");
            contains_error = true;
        }

        contains_error
    }
}

fn default_glob() -> String {
    "*.csv".to_owned()
}

fn default_scaling_operation() -> String {
    Operation::Insert.as_str().to_owned()
}
