use dsan_analysis::{
    assemble,
    compare::Larger,
    report::RecommendationEntry,
    Metric, Operation, PerformanceRecord, RecordSet, ReportOptions, Structure,
};

fn tree_inserts() -> RecordSet {
    RecordSet::new(vec![
        PerformanceRecord {
            rotations: 40,
            ..PerformanceRecord::new(Structure::Avl, Operation::Insert, 1000, 1.2)
        },
        PerformanceRecord {
            rotations: 25,
            ..PerformanceRecord::new(Structure::RedBlack, Operation::Insert, 1000, 1.0)
        },
    ])
    .unwrap()
}

#[test]
fn avl_against_red_black_inserts() {
    let records = tree_inserts();
    let report = assemble(&records, &ReportOptions::default()).unwrap();

    let rotations = report
        .trees
        .totals
        .iter()
        .find(|totals| totals.metric == Metric::Rotations)
        .unwrap();
    assert_eq!(rotations.difference, 15.0);
    assert_eq!(rotations.larger, Larger::Left);
    assert_eq!(rotations.label, "avl has more");

    match &report.recommendations[..] {
        [RecommendationEntry::Recommended(insert)] => {
            assert_eq!(insert.operation, Operation::Insert);
            assert_eq!(insert.structure, Structure::RedBlack);
            assert_eq!(insert.value, 1.0);
            assert_eq!(insert.metric, Metric::ExecutionTimeMs);
        }
        other => panic!("unexpected recommendations: {other:?}"),
    }
}

#[test]
fn zero_fixups_are_not_applicable() {
    let records = tree_inserts();
    let report = assemble(&records, &ReportOptions::default()).unwrap();

    // no insertion fixups were recorded at all
    assert_eq!(report.trees.rotations_per_fixup.len(), 2);
    assert!(report
        .trees
        .rotations_per_fixup
        .iter()
        .all(|ratio| !ratio.ratio.is_defined() && ratio.value().is_err()));
}

#[test]
fn hash_maps_never_show_tree_metrics() {
    let records = RecordSet::new(vec![
        PerformanceRecord {
            key_comparisons: 1000,
            ..PerformanceRecord::new(Structure::OpenHash, Operation::Insert, 1000, 0.2)
        },
        PerformanceRecord {
            key_comparisons: 800,
            nodes_visited: 800,
            search_depth: 800,
            ..PerformanceRecord::new(Structure::OpenHash, Operation::Search, 1000, 0.1)
        },
    ])
    .unwrap();
    let report = assemble(&records, &ReportOptions::default()).unwrap();

    assert!(report.trees.rotations.is_empty());
    assert!(report.trees.insertion_fixups.is_empty());
    assert!(report.trees.deletion_fixups.is_empty());
    assert!(report.trees.color_changes.is_empty());
    assert!(report.trees.totals.is_empty());
    assert_eq!(report.execution_time.len(), 2);
    assert_eq!(report.search.nodes_visited.len(), 1);
}
