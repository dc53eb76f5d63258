// Deserialization of Network WebSocket events as the browser sends them

use capture_types::{
    CdpEvent, Direction, WebSocketCreatedEvent, WebSocketFrameEvent, WebSocketOpcode,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_websocket_created_from_wire() {
    let event = CdpEvent::from_json(
        r#"{
            "method": "Network.webSocketCreated",
            "params": {
                "requestId": "1000.12",
                "url": "wss://example.test/rsocket",
                "initiator": { "type": "script" }
            }
        }"#,
    )
    .unwrap();

    let params: WebSocketCreatedEvent = serde_json::from_value(event.params).unwrap();
    assert_eq!(params.request_id.as_str(), "1000.12");
    assert_eq!(params.url.as_deref(), Some("wss://example.test/rsocket"));
}

#[test]
fn test_frame_received_from_wire() {
    let params: WebSocketFrameEvent = serde_json::from_value(json!({
        "requestId": "1000.12",
        "timestamp": 42.125,
        "response": {
            "opcode": 2,
            "mask": false,
            "payloadData": "AAAAAQ=="
        }
    }))
    .unwrap();

    assert_eq!(params.timestamp.0, 42.125);
    assert_eq!(params.response.opcode, WebSocketOpcode::Binary);
    assert_eq!(params.response.payload_data, "AAAAAQ==");
    assert_eq!(params.response.payload_is_text, None);
}

#[test]
fn test_unknown_opcode_survives() {
    let params: WebSocketFrameEvent = serde_json::from_value(json!({
        "requestId": "r",
        "timestamp": 0.0,
        "response": { "opcode": 11, "payloadData": "" }
    }))
    .unwrap();

    assert_eq!(params.response.opcode, WebSocketOpcode::Other(11));
    assert!(!params.response.opcode.carries_data());
    assert!(!params.response.mask);
}

#[test]
fn test_missing_response_is_an_error() {
    let result: Result<WebSocketFrameEvent, _> =
        serde_json::from_value(json!({ "requestId": "r", "timestamp": 1.0 }));
    assert!(result.is_err());
}

#[test]
fn test_direction_serialization() {
    assert_eq!(serde_json::to_value(Direction::Incoming).unwrap(), json!("incoming"));
    assert_eq!(Direction::Outgoing.to_string(), "outgoing");
}
