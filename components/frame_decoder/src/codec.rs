//! Strict RSocket frame deserialization under one hypothesis
//!
//! A buffer parses only if it is consumed exactly by the framing rule, the frame
//! type is known, the stream id satisfies the type's rule and every declared length
//! fits in what remains. Anything else is a [`FrameError`].

use crate::error::{FrameError, Result};
use crate::frame::{DecodedFrame, FrameFields, Payload};
use crate::reader::ByteReader;
use crate::types::{flags, FrameType, StreamRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the stream id + type/flags header
pub const FRAME_HEADER_SIZE: usize = 6;

/// Bits the frame type is shifted by in the type/flags word
const FRAME_TYPE_OFFSET: u16 = 10;

/// How data, metadata and resume tokens are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Strict UTF-8 text
    Utf8,
    /// Raw bytes
    Buffer,
}

/// How frames are delimited in the message stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Framing {
    /// One frame per message, no prefix
    Delimited,
    /// 24-bit big-endian frame length before each frame
    LengthPrefixed,
}

/// One (encoding, framing) combination the decoder may try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hypothesis {
    pub encoding: Encoding,
    pub framing: Framing,
}

impl Hypothesis {
    pub const fn new(encoding: Encoding, framing: Framing) -> Self {
        Self { encoding, framing }
    }

    /// Parse `bytes` under this hypothesis
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedFrame> {
        match self.framing {
            Framing::Delimited => deserialize_frame(bytes, self.encoding),
            Framing::LengthPrefixed => deserialize_frame_with_length(bytes, self.encoding),
        }
    }
}

impl Default for Hypothesis {
    fn default() -> Self {
        Self::new(Encoding::Utf8, Framing::Delimited)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match self.encoding {
            Encoding::Utf8 => "utf8",
            Encoding::Buffer => "buffer",
        };
        let framing = match self.framing {
            Framing::Delimited => "delimited",
            Framing::LengthPrefixed => "length-prefixed",
        };
        write!(f, "{}/{}", encoding, framing)
    }
}

/// Parse a length-prefixed frame; the prefix must match the rest of the buffer
pub fn deserialize_frame_with_length(bytes: &[u8], encoding: Encoding) -> Result<DecodedFrame> {
    let mut reader = ByteReader::new(bytes);
    let declared = reader.u24()?;
    let actual = reader.remaining();
    if declared != actual {
        return Err(FrameError::LengthMismatch { declared, actual });
    }
    deserialize_frame(reader.rest(), encoding)
}

/// Parse a whole buffer as exactly one frame
pub fn deserialize_frame(bytes: &[u8], encoding: Encoding) -> Result<DecodedFrame> {
    if bytes.len() < FRAME_HEADER_SIZE {
        return Err(FrameError::Truncated {
            needed: FRAME_HEADER_SIZE,
            remaining: bytes.len(),
        });
    }
    let mut reader = ByteReader::new(bytes);

    let raw_stream_id = reader.i32()?;
    if raw_stream_id < 0 {
        return Err(FrameError::NegativeStreamId(raw_stream_id));
    }
    let stream_id = raw_stream_id as u32;

    let type_and_flags = reader.u16()?;
    let code = (type_and_flags >> FRAME_TYPE_OFFSET) as u8;
    let frame_flags = type_and_flags & flags::MASK;
    let frame_type = match FrameType::from_code(code) {
        Some(FrameType::Reserved) | Some(FrameType::Ext) | None => {
            return Err(FrameError::UnsupportedType(code))
        }
        Some(frame_type) => frame_type,
    };

    let stream_ok = match frame_type.stream_rule() {
        StreamRule::Connection => stream_id == 0,
        StreamRule::Stream => stream_id > 0,
        StreamRule::Any => true,
    };
    if !stream_ok {
        return Err(FrameError::InvalidStreamId {
            frame_type,
            stream_id,
        });
    }

    let mut frame = DecodedFrame {
        stream_id,
        frame_type,
        flags: frame_flags,
        length: bytes.len(),
        metadata: None,
        data: None,
        fields: FrameFields::None,
    };
    let mut body = FrameBody {
        reader: &mut reader,
        encoding,
        flags: frame_flags,
    };

    match frame_type {
        FrameType::Setup => body.setup(&mut frame)?,
        FrameType::Lease => {
            let ttl = body.reader.u32()?;
            let request_count = body.reader.u32()?;
            frame.fields = FrameFields::Lease { ttl, request_count };
            frame.metadata = body.trailing_field("metadata")?;
        }
        FrameType::KeepAlive => {
            let last_received_position = body.reader.u64()?;
            frame.fields = FrameFields::KeepAlive {
                last_received_position,
            };
            frame.data = body.trailing_field("data")?;
        }
        FrameType::RequestResponse | FrameType::RequestFnf | FrameType::Payload => {
            body.payload(&mut frame)?
        }
        FrameType::RequestStream | FrameType::RequestChannel => {
            let request_n = body.request_n()?;
            frame.fields = FrameFields::RequestN { request_n };
            body.payload(&mut frame)?;
        }
        FrameType::RequestN => {
            let request_n = body.request_n()?;
            frame.fields = FrameFields::RequestN { request_n };
            body.reader.finish()?;
        }
        FrameType::Cancel => body.reader.finish()?,
        FrameType::Error => {
            let code = body.reader.u32()?;
            let message = text(body.reader.rest(), "message")?;
            frame.fields = FrameFields::Error { code, message };
        }
        FrameType::MetadataPush => {
            let metadata = body.reader.rest();
            frame.metadata = Some(body.field(metadata, "metadata")?);
        }
        FrameType::Resume => {
            let major_version = body.reader.u16()?;
            let minor_version = body.reader.u16()?;
            let token_len = body.reader.i16()?;
            if token_len < 0 {
                return Err(FrameError::InvalidField {
                    field: "resume token length",
                    value: token_len as i64,
                });
            }
            let token = body.reader.bytes(token_len as usize)?;
            let resume_token = body.field(token, "resume token")?;
            let server_position = body.reader.u64()?;
            let client_position = body.reader.u64()?;
            body.reader.finish()?;
            frame.fields = FrameFields::Resume {
                major_version,
                minor_version,
                resume_token,
                server_position,
                client_position,
            };
        }
        FrameType::ResumeOk => {
            let client_position = body.reader.u64()?;
            body.reader.finish()?;
            frame.fields = FrameFields::ResumeOk { client_position };
        }
        FrameType::Reserved | FrameType::Ext => return Err(FrameError::UnsupportedType(code)),
    }

    Ok(frame)
}

/// Cursor over a frame body plus the settings that shape field decoding
struct FrameBody<'r, 'a> {
    reader: &'r mut ByteReader<'a>,
    encoding: Encoding,
    flags: u16,
}

impl FrameBody<'_, '_> {
    fn field(&self, bytes: &[u8], name: &'static str) -> Result<Payload> {
        match self.encoding {
            Encoding::Utf8 => Ok(Payload::Text(text(bytes, name)?)),
            Encoding::Buffer => Ok(Payload::Buffer(bytes.to_vec())),
        }
    }

    /// Remaining bytes as an optional field; empty means absent
    fn trailing_field(mut self, name: &'static str) -> Result<Option<Payload>> {
        let rest = self.reader.rest();
        if rest.is_empty() {
            return Ok(None);
        }
        self.field(rest, name).map(Some)
    }

    fn request_n(&mut self) -> Result<u32> {
        let request_n = self.reader.i32()?;
        if request_n <= 0 {
            return Err(FrameError::InvalidField {
                field: "request n",
                value: request_n as i64,
            });
        }
        Ok(request_n as u32)
    }

    /// Optional length-prefixed metadata followed by data to the end of the frame
    fn payload(mut self, frame: &mut DecodedFrame) -> Result<()> {
        if flags::has_flag(self.flags, flags::METADATA) {
            let metadata_len = self.reader.u24()?;
            let metadata = self.reader.bytes(metadata_len)?;
            if !metadata.is_empty() {
                frame.metadata = Some(self.field(metadata, "metadata")?);
            }
        }
        frame.data = self.trailing_field("data")?;
        Ok(())
    }

    fn setup(mut self, frame: &mut DecodedFrame) -> Result<()> {
        let major_version = self.reader.u16()?;
        let minor_version = self.reader.u16()?;
        let keep_alive = self.non_negative("keep alive")?;
        let lifetime = self.non_negative("lifetime")?;

        let resume_token = if flags::has_flag(self.flags, flags::RESUME_ENABLE) {
            let token_len = self.reader.i16()?;
            if token_len < 0 {
                return Err(FrameError::InvalidField {
                    field: "resume token length",
                    value: token_len as i64,
                });
            }
            let token = self.reader.bytes(token_len as usize)?;
            Some(self.field(token, "resume token")?)
        } else {
            None
        };

        let metadata_mime_len = self.reader.u8()? as usize;
        let metadata_mime_type = text(self.reader.bytes(metadata_mime_len)?, "metadata mime type")?;
        let data_mime_len = self.reader.u8()? as usize;
        let data_mime_type = text(self.reader.bytes(data_mime_len)?, "data mime type")?;

        frame.fields = FrameFields::Setup {
            major_version,
            minor_version,
            keep_alive,
            lifetime,
            resume_token,
            metadata_mime_type,
            data_mime_type,
        };
        self.payload(frame)
    }

    fn non_negative(&mut self, field: &'static str) -> Result<u32> {
        let value = self.reader.i32()?;
        if value < 0 {
            return Err(FrameError::InvalidField {
                field,
                value: value as i64,
            });
        }
        Ok(value as u32)
    }
}

fn text(bytes: &[u8], field: &'static str) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| FrameError::InvalidUtf8(field))
}
