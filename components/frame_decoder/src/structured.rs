//! Secondary parse of data/metadata fields as JSON documents

use serde_json::Value;

/// Parse a field as a JSON document
///
/// Returns `None` for empty or non-JSON input; the caller then shows the field raw.
pub fn parse_structured(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}
