use crate::{
    error::AnalysisError,
    group::{
        group_by, round_to, summarize, summarize_by, Aggregates, Group, GroupKey, KeyField,
    },
    record::{Metric, Operation, PerformanceRecord, Structure},
};

fn runs() -> Vec<PerformanceRecord> {
    vec![
        PerformanceRecord {
            rotations: 4,
            key_comparisons: 10,
            ..PerformanceRecord::new(Structure::RedBlack, Operation::Insert, 100, 0.25)
        },
        PerformanceRecord {
            key_comparisons: 7,
            ..PerformanceRecord::new(Structure::OpenHash, Operation::Insert, 100, 0.125)
        },
        PerformanceRecord {
            rotations: 0,
            key_comparisons: 30,
            ..PerformanceRecord::new(Structure::RedBlack, Operation::Insert, 1000, 2.5)
        },
        PerformanceRecord {
            key_comparisons: 5,
            search_depth: 5,
            nodes_visited: 4,
            ..PerformanceRecord::new(Structure::RedBlack, Operation::Search, 100, 0.05)
        },
    ]
}

#[test]
pub fn groups_keep_first_seen_order() {
    let records = runs();
    let fields = [KeyField::Structure, KeyField::Operation];

    let first = group_by(&records, &fields)
        .into_iter()
        .map(|group| group.key)
        .collect::<Vec<_>>();
    let second = group_by(&records, &fields)
        .into_iter()
        .map(|group| group.key)
        .collect::<Vec<_>>();

    assert_eq!(
        first,
        vec![
            GroupKey::structure_operation(Structure::RedBlack, Operation::Insert),
            GroupKey::structure_operation(Structure::OpenHash, Operation::Insert),
            GroupKey::structure_operation(Structure::RedBlack, Operation::Search),
        ]
    );
    assert_eq!(first, second);
}

#[test]
pub fn groups_keep_record_order() {
    let records = runs();
    let groups = group_by(&records, &[KeyField::Structure]);

    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0]
            .records
            .iter()
            .map(|record| record.data_size)
            .collect::<Vec<_>>(),
        vec![100, 1000, 100]
    );
}

#[test]
pub fn empty_input_has_no_groups() {
    let records: Vec<PerformanceRecord> = Vec::new();
    let groups = group_by(&records, &[KeyField::Structure]);
    assert!(groups.is_empty());

    let summaries = summarize_by(
        &records,
        &[KeyField::Structure],
        Metric::Rotations,
        Aggregates::BASIC,
    )
    .unwrap();
    assert!(summaries.is_empty());
}

#[test]
pub fn empty_group_is_degenerate() {
    let group = Group {
        key: GroupKey::structure(Structure::Avl),
        records: Vec::new(),
    };

    assert_eq!(
        summarize(&group, Metric::Rotations, Aggregates::BASIC),
        Err(AnalysisError::DegenerateGroup {
            group: "avl".to_owned(),
            metric: Metric::Rotations
        })
    );
}

#[test]
pub fn zeros_count_towards_the_mean() {
    let records = runs();
    let summaries = summarize_by(
        records.iter().filter(|record| record.operation == Operation::Insert),
        &[KeyField::Structure],
        Metric::Rotations,
        Aggregates::WITH_EXTREMA,
    )
    .unwrap();

    let red_black = &summaries[0].summary;
    assert_eq!(red_black.count, 2);
    assert_eq!(red_black.sum, 4.0);
    assert_eq!(red_black.mean, 2.0);
    assert_eq!(red_black.min, Some(0.0));
    assert_eq!(red_black.max, Some(4.0));
}

#[test]
pub fn sum_is_mean_times_count() {
    let records = runs();

    for fields in [
        &[KeyField::Structure][..],
        &[KeyField::Operation][..],
        &[KeyField::Structure, KeyField::Operation][..],
        &[KeyField::DataSize, KeyField::Structure][..],
    ] {
        for metric in Metric::ALL {
            for group in summarize_by(&records, fields, metric, Aggregates::BASIC).unwrap() {
                let summary = group.summary;
                assert!((summary.sum - summary.mean * summary.count as f64).abs() < 1e-9);
            }
        }
    }
}

#[test]
pub fn extrema_only_when_requested() {
    let records = runs();
    let summaries = summarize_by(
        &records,
        &[KeyField::Operation],
        Metric::ExecutionTimeMs,
        Aggregates::BASIC,
    )
    .unwrap();

    assert!(summaries
        .iter()
        .all(|group| group.summary.min.is_none() && group.summary.max.is_none()));
}

#[test]
pub fn data_size_keys_and_labels() {
    let records = runs();
    let groups = group_by(&records, &[KeyField::DataSize, KeyField::Structure]);

    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].key.to_string(), "rb/100");
    assert_eq!(groups[0].records.len(), 2);
    assert_eq!(GroupKey::default().to_string(), "all");
}

#[test]
pub fn rounding_happens_on_request() {
    let records = vec![
        PerformanceRecord::new(Structure::Avl, Operation::Insert, 3, 1.0),
        PerformanceRecord::new(Structure::Avl, Operation::Insert, 3, 1.0),
        PerformanceRecord::new(Structure::Avl, Operation::Insert, 3, 2.0),
    ];
    let summary = summarize_by(
        &records,
        &[KeyField::Structure],
        Metric::ExecutionTimeMs,
        Aggregates::BASIC,
    )
    .unwrap()
    .remove(0)
    .summary;

    assert!((summary.mean - 4.0 / 3.0).abs() < 1e-12);
    assert_eq!(summary.rounded().mean, 1.333);
    assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
}
