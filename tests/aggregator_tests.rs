use snapshot_trace_studio::aggregator::{aggregate, group_by_namespace, rank_objects, rank_scripts};
use snapshot_trace_studio::timeline::{ObjectRecord, ObjectTimeline, ScriptRecord};
use snapshot_trace_studio::tree::NodeId;
use snapshot_trace_studio::utils::config::ReportConfig;
use snapshot_trace_studio::utils::error::AggregateError;

fn timeline(timestamps: &[f64]) -> Vec<ObjectRecord> {
    let mut objects = ObjectTimeline::new();
    for (i, ts) in timestamps.iter().enumerate() {
        objects.record(*ts, format!("0x{:x} obj{}", i, i), NodeId(i + 1), -1);
    }
    objects.into_records()
}

fn script(id: u64, timestamp: f64, elapsed: f64, name: &str) -> ScriptRecord {
    ScriptRecord {
        id,
        timestamp,
        elapsed,
        name: Some(name.to_string()),
        node_id: Some(NodeId(id as usize)),
    }
}

#[test]
fn test_first_object_duration_is_zero() {
    let objects = timeline(&[5.0, 5.5, 7.0]);
    assert_eq!(objects[0].duration, 0.0);
    assert_eq!(objects[2].duration, 1.5);
}

#[test]
fn test_fallback_keeps_top_ten() {
    // Fifteen objects, each 0.001ms apart, all below the default threshold
    let timestamps: Vec<f64> = (0..15).map(|i| i as f64 * 0.001 + (i * i) as f64 * 0.0001).collect();
    let objects = timeline(&timestamps);

    let ranking = rank_objects(objects, 0.02, 10);

    assert_eq!(ranking.objects.len(), 10);
    for pair in ranking.objects.windows(2) {
        assert!(pair[0].duration >= pair[1].duration);
    }
    assert_eq!(ranking.objects[0].data, "0xe obj14");
}

#[test]
fn test_threshold_filters_objects() {
    let objects = timeline(&[0.0, 1.0, 1.001, 3.0]);

    let ranking = rank_objects(objects, 0.02, 10);

    let data: Vec<&str> = ranking.objects.iter().map(|o| o.data.as_str()).collect();
    assert_eq!(data, vec!["0x3 obj3", "0x1 obj1"]);
    assert_eq!(ranking.total_time, 3.0);
}

#[test]
fn test_no_objects_yields_placeholder() {
    let ranking = rank_objects(Vec::new(), 0.02, 10);

    assert_eq!(ranking.total_time, 0.0);
    assert_eq!(ranking.objects, vec![ObjectRecord::placeholder()]);
}

#[test]
fn test_scripts_sorted_and_zero_elapsed_dropped() {
    let scripts = vec![
        script(1, 1.0, 0.0, "node:fs"),
        script(2, 3.0, 2.0, "node:path"),
        script(3, 3.0, 0.0, "node:url"),
        script(4, 8.0, 5.0, "ext:deno_web/00_infra.js"),
    ];

    let ranking = rank_scripts(scripts);

    let ids: Vec<u64> = ranking.scripts.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![4, 2]);
    assert_eq!(ranking.total_time, 7.0);
}

#[test]
fn test_namespace_shares_sum_to_hundred() {
    let scripts = vec![
        script(2, 3.0, 2.0, "node:path"),
        script(4, 8.0, 6.0, "ext:deno_web/00_infra.js"),
    ];

    let groups = group_by_namespace(&scripts, 8.0).unwrap();

    assert_eq!(groups["deno_node"], 25.0);
    assert_eq!(groups["deno_web"], 75.0);
    assert_eq!(groups.values().sum::<f64>(), 100.0);
}

#[test]
fn test_aggregate_rejects_unknown_namespace() {
    let scripts = vec![
        script(1, 1.0, 0.0, "node:fs"),
        script(2, 2.0, 1.0, "file:///main.js"),
    ];

    let result = aggregate(Vec::new(), scripts, &ReportConfig::default());

    assert_eq!(
        result.unwrap_err(),
        AggregateError::UnrecognizedNamespace("file:///main.js".to_string())
    );
}

#[test]
fn test_aggregate_without_scripts() {
    let result = aggregate(timeline(&[1.0, 2.0]), Vec::new(), &ReportConfig::default()).unwrap();

    assert_eq!(result.total_script_time, 0.0);
    assert!(result.scripts.is_empty());
    assert!(result.namespaces.is_empty());
    assert_eq!(result.chart.len(), 1);
    assert_eq!(result.total_object_time, 1.0);
}
