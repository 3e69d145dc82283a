use snapshot_trace_studio::parser::{parse_trace, DepthEncoding};
use snapshot_trace_studio::timeline::{correlate, parse_event_log, EventLog};
use snapshot_trace_studio::utils::error::CorrelationError;

#[test]
fn test_two_runs_average() {
    let baseline = parse_event_log("script,deserialize,1,100.0\nscript,deserialize,2,200.0\n");
    let second = parse_event_log("script,deserialize,1,300.0\nscript,deserialize,2,400.0\n");

    let events = correlate(&[baseline, second]).unwrap();

    assert_eq!(events.runs(), 2);
    assert_eq!(events.get(1), Some(200.0));
    assert_eq!(events.get(2), Some(300.0));
}

#[test]
fn test_missing_id_in_later_run_fails() {
    let baseline = parse_event_log("script,deserialize,1,100\nscript,deserialize,2,200\n");
    let second = parse_event_log("script,deserialize,1,300\n");
    let third = parse_event_log("script,deserialize,1,300\nscript,deserialize,2,400\n");

    let result = correlate(&[baseline, third, second]);

    assert_eq!(
        result.unwrap_err(),
        CorrelationError::MissingCorrelationData { id: 2, run: 2 }
    );
}

#[test]
fn test_extra_ids_in_later_runs_are_ignored() {
    let baseline = parse_event_log("script,deserialize,1,100\n");
    let second = parse_event_log("script,deserialize,1,300\nscript,deserialize,9,900\n");

    let events = correlate(&[baseline, second]).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events.get(9), None);
}

#[test]
fn test_no_runs_fails() {
    let logs: Vec<EventLog> = Vec::new();
    assert_eq!(correlate(&logs).unwrap_err(), CorrelationError::NoRuns);
}

#[test]
fn test_script_timeline_uses_averaged_timestamps() {
    let events = correlate(&[
        parse_event_log("script,deserialize,1,1000\nscript,deserialize,2,4000\n"),
        parse_event_log("script,deserialize,1,3000\nscript,deserialize,2,6000\n"),
    ])
    .unwrap();

    let text = "\
script,deserialize,1,0
script-details,1,node:fs
0 A
script,deserialize,2,0
script,script-details,2,ext:deno_web/00_infra.js
0 B
";
    let parsed = parse_trace(text, &events, DepthEncoding::HexToken).unwrap();

    assert_eq!(parsed.scripts.len(), 2);
    assert_eq!(parsed.scripts[0].timestamp, 2.0);
    assert_eq!(parsed.scripts[0].elapsed, 0.0);
    assert_eq!(parsed.scripts[1].timestamp, 5.0);
    assert_eq!(parsed.scripts[1].elapsed, 3.0);
    assert_eq!(parsed.scripts[1].name.as_deref(), Some("ext:deno_web/00_infra.js"));
}
