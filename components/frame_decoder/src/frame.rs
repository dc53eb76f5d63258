//! Decoded RSocket frame model

use crate::structured::parse_structured;
use crate::types::{flags, FrameType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::fmt;

/// A data, metadata or resume-token field in the encoding chosen by the decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "value", rename_all = "lowercase")]
pub enum Payload {
    /// Decoded as UTF-8 text
    Text(String),
    /// Kept as raw bytes
    Buffer(Vec<u8>),
}

impl Payload {
    /// Raw bytes of the field
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Buffer(bytes) => bytes,
        }
    }

    /// Text form of the field; buffers are converted lossily
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Payload::Text(text) => Cow::Borrowed(text),
            Payload::Buffer(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the field is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_json(&self) -> Value {
        match self {
            Payload::Text(text) => Value::String(text.clone()),
            Payload::Buffer(bytes) => json!({ "type": "Buffer", "data": bytes }),
        }
    }
}

/// Fields specific to a frame type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameFields {
    /// Frame type has no fields beyond header and payload
    None,
    #[serde(rename_all = "camelCase")]
    Setup {
        major_version: u16,
        minor_version: u16,
        keep_alive: u32,
        lifetime: u32,
        resume_token: Option<Payload>,
        metadata_mime_type: String,
        data_mime_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Lease { ttl: u32, request_count: u32 },
    #[serde(rename_all = "camelCase")]
    KeepAlive { last_received_position: u64 },
    /// REQUEST_STREAM, REQUEST_CHANNEL and REQUEST_N
    #[serde(rename_all = "camelCase")]
    RequestN { request_n: u32 },
    #[serde(rename_all = "camelCase")]
    Error { code: u32, message: String },
    #[serde(rename_all = "camelCase")]
    Resume {
        major_version: u16,
        minor_version: u16,
        resume_token: Payload,
        server_position: u64,
        client_position: u64,
    },
    #[serde(rename_all = "camelCase")]
    ResumeOk { client_position: u64 },
}

/// Structured interpretation of one captured message
///
/// Produced on demand by [`crate::FrameDecoder`] and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedFrame {
    /// Stream identifier (0 for connection-level frames)
    pub stream_id: u32,
    /// Frame type
    #[serde(rename = "type")]
    pub frame_type: FrameType,
    /// Flag bits
    pub flags: u16,
    /// Frame size in bytes, excluding any length prefix
    pub length: usize,
    /// Metadata field
    pub metadata: Option<Payload>,
    /// Data field
    pub data: Option<Payload>,
    /// Type-specific fields
    pub fields: FrameFields,
}

impl DecodedFrame {
    /// Check if a flag bit is set
    pub fn has_flag(&self, flag: u16) -> bool {
        flags::has_flag(self.flags, flag)
    }

    /// Names of the flags set on this frame
    pub fn flag_names(&self) -> Vec<&'static str> {
        flags::names(self.flags)
    }

    /// One-line label, e.g. `PAYLOAD [COMPLETE, LEASE, NEXT]`
    pub fn short_name(&self) -> String {
        format!("{} [{}]", self.frame_type.name(), self.flag_names().join(", "))
    }

    /// Data field as text, if present
    pub fn data_text(&self) -> Option<Cow<'_, str>> {
        self.data.as_ref().map(Payload::to_text)
    }

    /// Data field parsed as a JSON document
    pub fn structured_data(&self) -> Option<Value> {
        self.data
            .as_ref()
            .and_then(|data| parse_structured(data.as_bytes()))
    }

    /// Metadata field parsed as a JSON document
    pub fn structured_metadata(&self) -> Option<Value> {
        self.metadata
            .as_ref()
            .and_then(|metadata| parse_structured(metadata.as_bytes()))
    }

    /// Multi-line printable description of every field
    pub fn describe(&self) -> String {
        let mut obj = Map::new();
        obj.insert(
            "type".to_string(),
            json!(format!(
                "{} (0x{:x})",
                self.frame_type.name(),
                self.frame_type.code()
            )),
        );

        let mut names = self.flag_names();
        if names.is_empty() {
            names.push("NO FLAGS");
        }
        obj.insert(
            "flags".to_string(),
            json!(format!("{} (0x{:x})", names.join(" | "), self.flags)),
        );
        obj.insert("streamId".to_string(), json!(self.stream_id));
        obj.insert("length".to_string(), json!(self.length));
        obj.insert(
            "metadata".to_string(),
            self.metadata.as_ref().map_or(Value::Null, Payload::to_json),
        );
        obj.insert(
            "data".to_string(),
            self.data.as_ref().map_or(Value::Null, Payload::to_json),
        );

        match &self.fields {
            FrameFields::None => {}
            FrameFields::Setup {
                major_version,
                minor_version,
                keep_alive,
                lifetime,
                resume_token,
                metadata_mime_type,
                data_mime_type,
            } => {
                obj.insert("majorVersion".to_string(), json!(major_version));
                obj.insert("minorVersion".to_string(), json!(minor_version));
                obj.insert("keepAlive".to_string(), json!(keep_alive));
                obj.insert("lifetime".to_string(), json!(lifetime));
                obj.insert(
                    "resumeToken".to_string(),
                    resume_token.as_ref().map_or(Value::Null, Payload::to_json),
                );
                obj.insert("metadataMimeType".to_string(), json!(metadata_mime_type));
                obj.insert("dataMimeType".to_string(), json!(data_mime_type));
            }
            FrameFields::Lease { ttl, request_count } => {
                obj.insert("ttl".to_string(), json!(ttl));
                obj.insert("requestCount".to_string(), json!(request_count));
            }
            FrameFields::KeepAlive {
                last_received_position,
            } => {
                obj.insert(
                    "lastReceivedPosition".to_string(),
                    json!(last_received_position),
                );
            }
            FrameFields::RequestN { request_n } => {
                obj.insert("requestN".to_string(), json!(request_n));
            }
            FrameFields::Error { code, message } => {
                obj.insert("code".to_string(), json!(format!("0x{:08x}", code)));
                obj.insert("message".to_string(), json!(message));
            }
            FrameFields::Resume {
                major_version,
                minor_version,
                resume_token,
                server_position,
                client_position,
            } => {
                obj.insert("majorVersion".to_string(), json!(major_version));
                obj.insert("minorVersion".to_string(), json!(minor_version));
                obj.insert("resumeToken".to_string(), resume_token.to_json());
                obj.insert("serverPosition".to_string(), json!(server_position));
                obj.insert("clientPosition".to_string(), json!(client_position));
            }
            FrameFields::ResumeOk { client_position } => {
                obj.insert("clientPosition".to_string(), json!(client_position));
            }
        }

        serde_json::to_string_pretty(&Value::Object(obj))
            .unwrap_or_else(|_| self.short_name())
    }
}

impl fmt::Display for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload_frame(flags: u16, data: Option<Payload>, metadata: Option<Payload>) -> DecodedFrame {
        DecodedFrame {
            stream_id: 3,
            frame_type: FrameType::Payload,
            flags,
            length: 6,
            metadata,
            data,
            fields: FrameFields::None,
        }
    }

    #[test]
    fn test_short_name() {
        let frame = payload_frame(flags::NEXT | flags::METADATA, None, None);
        assert_eq!(frame.short_name(), "PAYLOAD [METADATA, NEXT]");
        assert_eq!(frame.to_string(), "PAYLOAD [METADATA, NEXT]");

        let frame = payload_frame(0, None, None);
        assert_eq!(frame.short_name(), "PAYLOAD []");
    }

    #[test]
    fn test_describe_no_flags() {
        let frame = payload_frame(0, Some(Payload::Text("x".into())), None);
        let text = frame.describe();
        assert!(text.contains("\"PAYLOAD (0xa)\""));
        assert!(text.contains("\"NO FLAGS (0x0)\""));
        assert!(text.contains("\"streamId\": 3"));
    }

    #[test]
    fn test_describe_buffer_payload() {
        let frame = payload_frame(flags::NEXT, Some(Payload::Buffer(vec![0xff, 1])), None);
        let value: Value = serde_json::from_str(&frame.describe()).unwrap();
        assert_eq!(value["data"]["type"], "Buffer");
        assert_eq!(value["data"]["data"], json!([255, 1]));
        assert_eq!(value["flags"], "NEXT (0x20)");
    }

    #[test]
    fn test_structured_fields_are_independent() {
        let frame = payload_frame(
            flags::METADATA,
            Some(Payload::Text("{\"a\": 1}".into())),
            Some(Payload::Text("not json".into())),
        );
        assert_eq!(frame.structured_data(), Some(json!({"a": 1})));
        assert_eq!(frame.structured_metadata(), None);
    }

    #[test]
    fn test_data_text_lossy_for_buffers() {
        let frame = payload_frame(0, Some(Payload::Buffer(b"ab\xffc".to_vec())), None);
        assert_eq!(frame.data_text().unwrap(), "ab\u{fffd}c");
        assert!(payload_frame(0, None, None).data_text().is_none());
    }
}
