// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed specs
//!
//! Raw JSON messages from the gateway decoded at the boundary and applied
//! to the tracker.

use crate::prelude::*;
use similar_asserts::assert_eq;

const FEED: &[&str] = &[
    r#"{"type":"agents:snapshot","agents":[
        {"name":"summarizer","state":"running","port":8101,"repo":"fleet/summarizer","tag":"1.4"},
        {"name":"indexer","state":"not-created"}
    ]}"#,
    r#"{"type":"invocation:observed","invocation":
        {"threadId":"t-100","agent":"summarizer","state":"pending","createdAt":5000}}"#,
    r#"{"type":"invocation:updated","threadId":"t-100",
        "patch":{"state":"running","startedAt":5050,"progress":{"percent":40,"message":"reading"}}}"#,
    r#"{"type":"invocation:updated","threadId":"t-100",
        "patch":{"state":"completed","endedAt":5400,"result":{"summary":"done"}}}"#,
    r#"{"type":"invocation:updated","threadId":"t-999","patch":{"state":"failed"}}"#,
];

fn decode_all(lines: &[&str]) -> Vec<TrackerEvent> {
    lines.iter().map(|line| TrackerEvent::from_json(line).unwrap()).collect()
}

#[test]
fn decoded_feed_builds_expected_state() {
    let mut tracker = Tracker::new();
    for event in decode_all(FEED) {
        tracker.apply_event(&event);
    }

    assert_eq!(
        invocation_json(&tracker, "t-100"),
        serde_json::json!({
            "threadId": "t-100",
            "agent": "summarizer",
            "state": "completed",
            "progress": { "percent": 40, "message": "reading", "steps": [] },
            "result": { "summary": "done" },
            "createdAt": 5000,
            "startedAt": 5050,
            "endedAt": 5400,
        })
    );
    assert!(tracker.get_invocation("t-999").is_none());
    assert_eq!(tracker.state().agent_counts().not_created, 1);
    assert_eq!(
        tracker.get_agent("summarizer").map(|a| a.image()),
        Some(Some("fleet/summarizer:1.4".to_string()))
    );
}

#[test]
fn malformed_messages_never_reach_the_tracker() {
    let bad = [
        r#"{"type":"invocation:updated","threadId":"","patch":{}}"#,
        r#"{"type":"invocation:observed","invocation":{"threadId":"t1","state":"pending"}}"#,
        r#"{"type":"agents:reboot"}"#,
        "not json",
    ];
    for line in bad {
        assert!(TrackerEvent::from_json(line).is_err(), "accepted: {line}");
    }
}

#[test]
fn events_round_trip_through_json() {
    let events = decode_all(FEED);
    let encoded: Vec<String> = events.iter().map(|e| serde_json::to_string(e).unwrap()).collect();
    let decoded: Vec<TrackerEvent> =
        encoded.iter().map(|line| TrackerEvent::from_json(line).unwrap()).collect();
    assert_eq!(decoded, events);
}
