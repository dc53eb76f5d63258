//! Integration tests for the inspector
//!
//! These tests drive the event pump through the transport channel and check
//! the lifecycle and the query surface.

use capture_types::CdpEvent;
use inspector_component::{Inspector, InspectorConfig, InspectorError};
use serde_json::json;
use std::time::Duration;

fn frame_event(request_id: &str, ts: f64, text: &str) -> CdpEvent {
    CdpEvent::new(
        "Network.webSocketFrameReceived",
        json!({
            "requestId": request_id,
            "timestamp": ts,
            "response": {"opcode": 1, "payloadData": text}
        }),
    )
}

#[tokio::test]
async fn test_pump_ingests_in_order() {
    let inspector = Inspector::new(InspectorConfig::default()).expect("Failed to create inspector");
    let mut changes = inspector.subscribe();

    inspector.start().await.expect("Failed to start");
    let sender = inspector.sender().expect("No sender while running");

    for (i, text) in ["one", "two", "three"].iter().enumerate() {
        sender.send(frame_event("c1", i as f64, text)).await.unwrap();
    }
    for _ in 0..3 {
        tokio::time::timeout(Duration::from_secs(5), changes.recv())
            .await
            .expect("Timed out waiting for change")
            .unwrap();
    }

    let ids: Vec<u64> = inspector.frames_of("c1").iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(inspector.search("thr").len(), 1);

    inspector.stop().await.expect("Failed to stop");
    assert!(!inspector.is_running());
    assert!(sender.send(frame_event("c1", 4.0, "late")).await.is_err());
}

#[tokio::test]
async fn test_pump_survives_bad_events() {
    let inspector = Inspector::new(InspectorConfig::default()).unwrap();
    let mut changes = inspector.subscribe();
    inspector.start().await.unwrap();
    let sender = inspector.sender().unwrap();

    sender
        .send(CdpEvent::new("Network.webSocketFrameReceived", json!({"requestId": 1})))
        .await
        .unwrap();
    sender.send(CdpEvent::new("bogus", json!({}))).await.unwrap();
    sender.send(frame_event("c1", 0.0, "ok")).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), changes.recv())
        .await
        .expect("Timed out waiting for change")
        .unwrap();
    assert_eq!(inspector.frames_of("c1").len(), 1);

    inspector.stop().await.unwrap();
}

#[tokio::test]
async fn test_multiple_start_stop_cycles() {
    let inspector = Inspector::new(InspectorConfig::default()).unwrap();

    for _ in 0..3 {
        inspector.start().await.expect("Failed to start");
        assert!(inspector.is_running());
        inspector.stop().await.expect("Failed to stop");
        assert!(!inspector.is_running());
    }

    assert!(matches!(inspector.stop().await, Err(InspectorError::NotRunning)));
}

#[tokio::test]
async fn test_malformed_json_is_reported() {
    let inspector = Inspector::new(InspectorConfig::default()).unwrap();
    let result = inspector.ingest_json("[1, 2").await;
    assert!(matches!(result, Err(InspectorError::Capture(_))));
}

#[test]
fn test_ingest_without_runtime_helper() {
    let inspector = Inspector::new(InspectorConfig::default()).unwrap();
    tokio_test::block_on(inspector.ingest(frame_event("c9", 0.0, "sync"))).unwrap();
    assert_eq!(inspector.list_connections()[0].id.as_str(), "c9");
}
