use crate::{
    cli::Cli,
    config::{AnalyzerConfig, ConfigErrors},
    render::Format,
};
use clap::Parser;
use dsan_analysis::{Grouping, Operation};

fn parse(yaml: &str) -> AnalyzerConfig {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
pub fn empty_config_uses_defaults() {
    let config = parse("{}");

    assert_eq!(config.inputs.glob, "*.csv");
    assert_eq!(config.report.grouping, Grouping::StructureOperation);
    assert_eq!(config.output.format, Format::Text);

    let options = config.report_options().unwrap();
    assert_eq!(options.operations, None);
    assert_eq!(options.scaling_operation, Operation::Insert);
}

#[test]
pub fn full_config() {
    let config = parse(
        r#"
inputs:
  paths: [results/, extra.csv]
  glob: "**/performance_*.csv"
report:
  grouping: structure
  operations: [Search, insert, search]
  scaling_operation: remove
output:
  format: yaml
"#,
    );

    assert_eq!(config.inputs.paths, vec!["results/", "extra.csv"]);
    assert_eq!(config.output.format, Format::Yaml);

    let options = config.report_options().unwrap();
    assert_eq!(options.grouping, Grouping::Structure);
    assert_eq!(
        options.operations,
        Some(vec![Operation::Search, Operation::Insert])
    );
    assert_eq!(options.scaling_operation, Operation::Remove);
}

#[test]
pub fn unknown_fields_are_rejected() {
    assert!(serde_yaml::from_str::<AnalyzerConfig>("inputs:\n  folder: results\n").is_err());
}

#[test]
pub fn unknown_operation_is_an_invalid_category() {
    let config = parse("report:\n  operations: [insert, sort]\n");

    assert!(matches!(
        config.report_options(),
        Err(ConfigErrors::InvalidCategory(_))
    ));
}

#[test]
pub fn preflight_without_inputs_fails() {
    assert!(AnalyzerConfig::default().preflight_checks());
}

#[test]
pub fn preflight_reports_missing_inputs_and_bad_glob() {
    let mut config = parse("inputs:\n  path: /nonexistent/results\n  glob: \"[\"\n");

    assert!(config.preflight_checks());
    // path is merged into paths even when the check fails
    assert_eq!(config.inputs.paths, vec!["/nonexistent/results"]);
}

#[test]
pub fn preflight_rejects_empty_glob_and_unknown_operations() {
    let dir = std::env::temp_dir();
    let mut config = AnalyzerConfig::default();
    config.inputs.path = Some(dir.to_string_lossy().into_owned());

    config.inputs.glob = String::new();
    assert!(config.preflight_checks());

    config.inputs.glob = "*.csv".to_owned();
    config.report.operations = vec!["insert".to_owned(), "sort".to_owned()];
    assert!(config.preflight_checks());

    config.report.operations.clear();
    config.report.scaling_operation = "lookup".to_owned();
    assert!(config.preflight_checks());
}

#[test]
pub fn preflight_accepts_existing_directory() {
    let dir = std::env::temp_dir();
    let mut config = AnalyzerConfig::default();
    config.inputs.path = Some(dir.to_string_lossy().into_owned());

    assert!(!config.preflight_checks());
}

#[test]
pub fn command_line_overrides_config() {
    let mut config = parse(
        r#"
inputs:
  path: results
report:
  grouping: structure
  operations: [remove]
"#,
    );
    let cli = Cli::parse_from([
        "dsan",
        "bench.csv",
        "--format",
        "yaml",
        "--group-by",
        "structure-operation",
        "-o",
        "search",
        "-o",
        "Insert",
    ]);

    config.apply_cli(&cli);

    assert_eq!(config.inputs.path, None);
    assert_eq!(config.inputs.paths, vec!["bench.csv"]);
    assert_eq!(config.output.format, Format::Yaml);
    assert_eq!(config.report.grouping, Grouping::StructureOperation);
    assert_eq!(config.report.operations, vec!["search", "insert"]);
}

#[test]
pub fn verbosity_maps_to_log_level() {
    assert_eq!(Cli::parse_from(["dsan"]).log_level(), "warn");
    assert_eq!(Cli::parse_from(["dsan", "-vv"]).log_level(), "debug");
    assert_eq!(Cli::parse_from(["dsan", "-vvvv"]).log_level(), "trace");
}
