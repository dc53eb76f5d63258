//! RSocket frame type codes and flag bits

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Frame type, the upper 6 bits of the type/flags word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FrameType {
    Reserved = 0x00,
    Setup = 0x01,
    Lease = 0x02,
    KeepAlive = 0x03,
    RequestResponse = 0x04,
    RequestFnf = 0x05,
    RequestStream = 0x06,
    RequestChannel = 0x07,
    RequestN = 0x08,
    Cancel = 0x09,
    Payload = 0x0A,
    Error = 0x0B,
    MetadataPush = 0x0C,
    Resume = 0x0D,
    ResumeOk = 0x0E,
    Ext = 0x3F,
}

/// Stream id constraint attached to each frame type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamRule {
    /// Connection-level frame, stream id must be 0
    Connection,
    /// Stream-level frame, stream id must be positive
    Stream,
    /// Either
    Any,
}

impl FrameType {
    /// Look up a frame type by its 6-bit code
    pub fn from_code(code: u8) -> Option<Self> {
        let frame_type = match code {
            0x00 => FrameType::Reserved,
            0x01 => FrameType::Setup,
            0x02 => FrameType::Lease,
            0x03 => FrameType::KeepAlive,
            0x04 => FrameType::RequestResponse,
            0x05 => FrameType::RequestFnf,
            0x06 => FrameType::RequestStream,
            0x07 => FrameType::RequestChannel,
            0x08 => FrameType::RequestN,
            0x09 => FrameType::Cancel,
            0x0A => FrameType::Payload,
            0x0B => FrameType::Error,
            0x0C => FrameType::MetadataPush,
            0x0D => FrameType::Resume,
            0x0E => FrameType::ResumeOk,
            0x3F => FrameType::Ext,
            _ => return None,
        };
        Some(frame_type)
    }

    /// Numeric code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Protocol name, e.g. `REQUEST_STREAM`
    pub fn name(self) -> &'static str {
        match self {
            FrameType::Reserved => "RESERVED",
            FrameType::Setup => "SETUP",
            FrameType::Lease => "LEASE",
            FrameType::KeepAlive => "KEEPALIVE",
            FrameType::RequestResponse => "REQUEST_RESPONSE",
            FrameType::RequestFnf => "REQUEST_FNF",
            FrameType::RequestStream => "REQUEST_STREAM",
            FrameType::RequestChannel => "REQUEST_CHANNEL",
            FrameType::RequestN => "REQUEST_N",
            FrameType::Cancel => "CANCEL",
            FrameType::Payload => "PAYLOAD",
            FrameType::Error => "ERROR",
            FrameType::MetadataPush => "METADATA_PUSH",
            FrameType::Resume => "RESUME",
            FrameType::ResumeOk => "RESUME_OK",
            FrameType::Ext => "EXT",
        }
    }

    pub(crate) fn stream_rule(self) -> StreamRule {
        match self {
            FrameType::Setup
            | FrameType::Lease
            | FrameType::KeepAlive
            | FrameType::MetadataPush
            | FrameType::Resume
            | FrameType::ResumeOk => StreamRule::Connection,
            FrameType::Error | FrameType::Reserved | FrameType::Ext => StreamRule::Any,
            _ => StreamRule::Stream,
        }
    }
}

/// Name for a raw type code, falling back to hex for unknown codes
pub fn frame_type_name(code: u8) -> String {
    match FrameType::from_code(code) {
        Some(frame_type) => frame_type.name().to_string(),
        None => format!("0x{:x}", code),
    }
}

/// Flag bits (low 10 bits of the type/flags word)
///
/// Several names share a bit; their meaning depends on the frame type.
pub mod flags {
    pub const IGNORE: u16 = 0x200;
    pub const METADATA: u16 = 0x100;
    pub const FOLLOWS: u16 = 0x80;
    pub const RESPOND: u16 = 0x80;
    pub const RESUME_ENABLE: u16 = 0x80;
    pub const COMPLETE: u16 = 0x40;
    pub const LEASE: u16 = 0x40;
    pub const NEXT: u16 = 0x20;

    /// Mask of all flag bits
    pub const MASK: u16 = 0x3FF;

    /// Every named flag, in display order
    pub const NAMED: [(&str, u16); 8] = [
        ("COMPLETE", COMPLETE),
        ("FOLLOWS", FOLLOWS),
        ("IGNORE", IGNORE),
        ("LEASE", LEASE),
        ("METADATA", METADATA),
        ("NEXT", NEXT),
        ("RESPOND", RESPOND),
        ("RESUME_ENABLE", RESUME_ENABLE),
    ];

    /// Check if a flag is set
    #[inline]
    pub fn has_flag(flags: u16, flag: u16) -> bool {
        flags & flag == flag
    }

    /// Names of every flag set in `flags`
    pub fn names(flags: u16) -> Vec<&'static str> {
        NAMED
            .iter()
            .filter(|(_, bit)| has_flag(flags, *bit))
            .map(|(name, _)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(FrameType::from_code(0x0A), Some(FrameType::Payload));
        assert_eq!(FrameType::from_code(0x3F), Some(FrameType::Ext));
        assert_eq!(FrameType::from_code(0x10), None);
        assert_eq!(FrameType::RequestN.code(), 0x08);
    }

    #[test]
    fn test_frame_type_name() {
        assert_eq!(frame_type_name(0x04), "REQUEST_RESPONSE");
        assert_eq!(frame_type_name(0x2a), "0x2a");
    }

    #[test]
    fn test_frame_type_serializes_as_number() {
        assert_eq!(serde_json::to_string(&FrameType::Payload).unwrap(), "10");
    }

    #[test]
    fn test_flag_names() {
        assert_eq!(flags::names(flags::METADATA), vec!["METADATA"]);
        // shared bits report every alias
        assert_eq!(
            flags::names(flags::FOLLOWS),
            vec!["FOLLOWS", "RESPOND", "RESUME_ENABLE"]
        );
        assert!(flags::names(0).is_empty());
    }

    #[test]
    fn test_stream_rules() {
        assert_eq!(FrameType::Setup.stream_rule(), StreamRule::Connection);
        assert_eq!(FrameType::Payload.stream_rule(), StreamRule::Stream);
        assert_eq!(FrameType::Error.stream_rule(), StreamRule::Any);
    }
}
