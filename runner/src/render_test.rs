use crate::render::{render, Format};
use dsan_analysis::{
    assemble, Operation, PerformanceRecord, RecordSet, Report, ReportOptions, Structure,
};

fn report(operations: Option<Vec<Operation>>) -> Report {
    let records = RecordSet::new(vec![
        PerformanceRecord {
            rotations: 40,
            key_comparisons: 9000,
            ..PerformanceRecord::new(Structure::Avl, Operation::Insert, 1000, 1.2)
        },
        PerformanceRecord {
            rotations: 25,
            key_comparisons: 9500,
            ..PerformanceRecord::new(Structure::RedBlack, Operation::Insert, 1000, 1.0)
        },
    ])
    .unwrap();

    assemble(
        &records,
        &ReportOptions {
            operations,
            ..ReportOptions::default()
        },
    )
    .unwrap()
}

fn render_to_string(report: &Report, format: Format) -> String {
    let mut out = Vec::new();
    render(report, format, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
pub fn text_contains_every_section() {
    let text = render_to_string(&report(None), Format::Text);

    assert!(text.starts_with("Loaded 2 performance measurements"));
    assert!(text.contains("Structures tested: avl, rb"));
    assert!(text.contains("== Tree totals =="));
    assert!(text.contains("avl has more"));
    assert!(text.contains("Best for insert: rb (1.000 execution_time_ms, data size 1000)"));
}

#[test]
pub fn undefined_ratios_and_missing_operations_are_not_applicable() {
    let text = render_to_string(
        &report(Some(vec![Operation::Insert, Operation::Search])),
        Format::Text,
    );

    // no fixups were recorded, so rotations per fixup is undefined
    assert!(text
        .lines()
        .any(|line| line.trim_start().starts_with("avl/insert") && line.trim_end().ends_with("n/a")));
    assert!(text.contains("Best for search: n/a (no records)"));
}

#[test]
pub fn yaml_is_the_serialized_report() {
    let report = report(None);
    let yaml = render_to_string(&report, Format::Yaml);

    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(value["overview"]["record_count"].as_u64(), Some(2));
    assert!(yaml.contains("undefined"));
}
