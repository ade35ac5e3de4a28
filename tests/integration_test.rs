// Integration tests for erbound
use erbound::{
    failures, pairwise_class_balance, rebalance_precision, rebalance_recall, successes, Database,
    EstimatorConfig, FeatureVector, FieldMatcher, FieldRule, FieldRules, Interval, Labeling,
    MatchFunction, MetricsSnapshot, OperatingPoint, PairwiseComparison, Record, Scenario, Sweep,
    ValidationReport, VectorMatcher, VectorMetric,
};
use serde_json::json;
use std::io::Write;

fn report(precision: Interval, recall: Interval, balance: f64) -> ValidationReport {
    ValidationReport::new(precision, recall, balance)
}

/// Two well separated entities of three records each, plus one noisy record
fn population() -> Database {
    let features = [
        (1, vec![1.0, 0.0]),
        (2, vec![0.95, 0.05]),
        (3, vec![0.9, 0.1]),
        (4, vec![0.0, 1.0]),
        (5, vec![0.05, 0.95]),
        (6, vec![0.1, 0.9]),
        (7, vec![0.7, 0.7]),
    ];
    Database::from_records(
        features
            .into_iter()
            .map(|(id, f)| Record::new(id as u64, FeatureVector::new(f))),
    )
    .unwrap()
}

#[test]
fn test_class_balance_properties() {
    let singletons = Labeling::from_pairs((1u64..=7).map(|i| (i, i))).unwrap();
    assert_eq!(pairwise_class_balance(&singletons).unwrap(), 0.0);

    let together = Labeling::from_pairs((1u64..=7).map(|i| (i, 0u64))).unwrap();
    assert_eq!(pairwise_class_balance(&together).unwrap(), 1.0);

    let truth =
        Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 0), (4, 1), (5, 1), (6, 1), (7, 2)])
            .unwrap();
    let balance = pairwise_class_balance(&truth).unwrap();
    assert!((balance - 6.0 / 21.0).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&balance));
}

#[test]
fn test_rebalancing_laws() {
    assert!((rebalance_precision(0.8, 0.5, 0.1).unwrap() - 0.04 / 0.13).abs() < 1e-12);
    assert_eq!(rebalance_precision(0.73, 0.2, 0.2).unwrap(), 0.73);
    assert_eq!(rebalance_recall(0.61, 0.5, 0.02), 0.61);

    // lower test balance means more negatives and so lower precision
    let high = rebalance_precision(0.9, 0.5, 0.4).unwrap();
    let low = rebalance_precision(0.9, 0.5, 0.05).unwrap();
    assert!(low < high);
    assert!(high < 0.9);
}

#[test]
fn test_vector_matcher_end_to_end() {
    let db = population();
    let matcher = VectorMatcher::new(
        VectorMetric::Cosine,
        0.9,
        report(Interval::new(0.9, 0.85, 0.95), Interval::new(0.8, 0.75, 0.85), 0.3),
    )
    .unwrap();

    // the noisy record 7 is merged into the first entity
    let predicted =
        Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 0), (7, 0), (4, 1), (5, 1), (6, 1)])
            .unwrap();
    let truth =
        Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 0), (4, 1), (5, 1), (6, 1), (7, 2)])
            .unwrap();
    let class_balance_test = pairwise_class_balance(&truth).unwrap();

    let snapshot = MetricsSnapshot::evaluate(
        &db,
        &predicted,
        &matcher,
        class_balance_test,
        &EstimatorConfig::default(),
    )
    .unwrap();

    // 6 pairs in the first cluster, 3 in the second; record 7 matches nobody
    assert_eq!(snapshot.total_swoosh_pairs(), 9);
    assert_eq!(snapshot.total_match_pairs(), 6);

    let rebalanced = rebalance_precision(0.9, 0.3, class_balance_test).unwrap();
    assert!((snapshot.precision_lower_bound() - rebalanced * 6.0 / 9.0).abs() < 1e-12);
    assert_eq!(snapshot.recall_interval(), matcher.recall());

    let p = snapshot.precision_lower_bound();
    let r = snapshot.recall_lower_bound();
    assert!((snapshot.f1_lower_bound() - 2.0 * p * r / (p + r)).abs() < 1e-12);

    // the bound stays below the true pairwise precision here
    let exact = PairwiseComparison::compare(&truth, &predicted).unwrap();
    assert!(snapshot.precision_lower_bound() <= exact.precision());
}

#[test]
fn test_field_matcher_end_to_end() {
    let people = [
        (1u64, "Katherine Johnson", "Hampton"),
        (2, "Katharine Johnson", "Hampton"),
        (3, "Dorothy Vaughan", "Hampton"),
        (4, "Mary Jackson", "Hampton"),
    ];
    let db = Database::from_records(people.iter().map(|(id, name, city)| {
        Record::new(*id, FeatureVector::default()).with_payload(json!({"name": name, "city": city}))
    }))
    .unwrap();

    let rules = FieldRules::new(vec![
        FieldRule::text("name", 0.8),
        FieldRule::categorical("city", 0.2),
    ])
    .unwrap();
    let matcher = FieldMatcher::new(
        rules,
        0.7,
        report(Interval::exact(1.0), Interval::exact(0.9), 0.25),
    )
    .unwrap();

    let predicted = Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 0), (4, 1)]).unwrap();
    let snapshot =
        MetricsSnapshot::evaluate(&db, &predicted, &matcher, 0.25, &EstimatorConfig::default())
            .unwrap();

    assert_eq!(snapshot.total_swoosh_pairs(), 3);
    assert_eq!(snapshot.total_match_pairs(), 1);
    assert!((snapshot.precision_lower_bound() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_sweep_over_thresholds() {
    let db = population();
    let matcher = VectorMatcher::new(
        VectorMetric::Cosine,
        0.9,
        report(Interval::new(0.9, 0.85, 0.95), Interval::new(0.8, 0.75, 0.85), 0.3),
    )
    .unwrap();

    let points = vec![
        OperatingPoint::new(0.2, Labeling::from_pairs((1u64..=7).map(|i| (i, 0u64))).unwrap()),
        OperatingPoint::new(
            0.5,
            Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 0), (4, 1), (5, 1), (6, 1), (7, 2)])
                .unwrap(),
        ),
        OperatingPoint::new(0.9, Labeling::from_pairs((1u64..=7).map(|i| (i, i))).unwrap()),
        // record 8 does not exist
        OperatingPoint::new(1.0, Labeling::from_pairs(vec![(1u64, 0u64), (8, 0)]).unwrap()),
    ];

    let sweep = Sweep::new(EstimatorConfig::default().with_parallel(true)).unwrap();
    let outcomes = sweep.run(&db, &points, &matcher, 0.3);

    assert_eq!(successes(&outcomes), 3);
    assert_eq!(failures(&outcomes), 1);
    let bounds: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.snapshot())
        .map(|s| s.precision_lower_bound())
        .collect();
    // over-merged < correct clustering; all singletons is vacuous
    assert!(bounds[0] < bounds[1]);
    assert_eq!(bounds[1], 0.9);
    assert_eq!(bounds[2], 1.0);
}

#[test]
fn test_scenario_file() {
    let scenario = json!({
        "records": [
            {"id": "a", "features": [1.0, 0.0]},
            {"id": "b", "features": [0.99, 0.01]},
            {"id": "c", "features": [0.0, 1.0]}
        ],
        "matcher": {
            "type": "vector",
            "threshold": 0.8,
            "validation": {
                "precision": {"estimate": 0.8, "lower": 0.7, "upper": 0.9},
                "recall": {"estimate": 0.6, "lower": 0.5, "upper": 0.7},
                "class_balance": 0.5
            }
        },
        "config": {"max_batch_pairs": 1},
        "class_balance_test": 0.1,
        "operating_points": [
            {"threshold": 0.5, "corruption": 0.0, "labeling": [["a", 0], ["b", 0], ["c", 0]]}
        ]
    });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", scenario).unwrap();

    let loaded = Scenario::load(file.path()).unwrap();
    assert_eq!(loaded.config.max_batch_pairs, Some(1));

    let reports = loaded.evaluate().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].corruption, Some(0.0));
    let metrics = reports[0].metrics.as_ref().unwrap();
    assert_eq!(metrics.total_swoosh_pairs(), 3);
    assert_eq!(metrics.total_match_pairs(), 1);

    let expected = 0.04 / 0.13 / 3.0;
    assert!((metrics.precision_lower_bound() - expected).abs() < 1e-12);

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["metrics"]["total_match_pairs"], 1);
    assert!(json[0].get("error").is_none());
}

#[test]
fn test_scenario_point_outside_ground_truth() {
    // the second labeling omits record 3 of the ground truth
    let scenario = json!({
        "records": [
            {"id": 1, "features": [1.0, 0.0]},
            {"id": 2, "features": [0.98, 0.02]},
            {"id": 3, "features": [0.0, 1.0]}
        ],
        "matcher": {
            "type": "vector",
            "validation": {
                "precision": {"estimate": 0.9, "lower": 0.8, "upper": 1.0},
                "recall": {"estimate": 0.7, "lower": 0.6, "upper": 0.8},
                "class_balance": 0.4
            }
        },
        "ground_truth": [[1, 0], [2, 0], [3, 1]],
        "operating_points": [
            {"threshold": 0.3, "labeling": [[1, 0], [2, 0], [3, 1]]},
            {"threshold": 0.6, "labeling": [[1, 0], [2, 0]]}
        ]
    });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", scenario).unwrap();

    let reports = Scenario::load(file.path()).unwrap().evaluate().unwrap();
    assert_eq!(reports.len(), 2);

    let first = &reports[0];
    assert!(!first.is_failed());
    assert_eq!(first.truth.unwrap().precision(), 1.0);
    assert_eq!(first.metrics.as_ref().unwrap().total_swoosh_pairs(), 1);

    let second = &reports[1];
    assert!(second.metrics.is_some());
    assert!(second.error.is_none());
    assert!(second.truth.is_none());
    assert!(second.truth_error.as_ref().unwrap().contains('3'));

    let json = serde_json::to_value(&reports).unwrap();
    assert!(json[0].get("truth_error").is_none());
    assert!(json[1]["truth_error"].is_string());
}
