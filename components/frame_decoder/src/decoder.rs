//! Cached four-hypothesis decoder
//!
//! Within one capture session the RSocket configuration does not change, so the
//! hypothesis that decoded the previous frame is tried first. Only when it fails
//! are all four hypotheses tried in [`FALLBACK_ORDER`]. A wrong cached hypothesis
//! costs extra attempts but never a wrong result: every fast-path frame is still
//! fully validated by the parser.

use crate::codec::{Encoding, Framing, Hypothesis};
use crate::frame::DecodedFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Order in which hypotheses are tried when the cached one fails
pub const FALLBACK_ORDER: [Hypothesis; 4] = [
    Hypothesis::new(Encoding::Utf8, Framing::Delimited),
    Hypothesis::new(Encoding::Utf8, Framing::LengthPrefixed),
    Hypothesis::new(Encoding::Buffer, Framing::Delimited),
    Hypothesis::new(Encoding::Buffer, Framing::LengthPrefixed),
];

/// Counters describing how decode calls were served
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoderStats {
    /// Calls answered by the cached hypothesis
    pub fast_path_hits: u64,
    /// Individual fallback parse attempts
    pub fallback_attempts: u64,
    /// Calls answered by a fallback hypothesis
    pub fallback_hits: u64,
    /// Calls no hypothesis could decode
    pub misses: u64,
}

/// Heuristic RSocket decoder with a memoized hypothesis
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    cached: Hypothesis,
    stats: DecoderStats,
}

impl FrameDecoder {
    /// Create a decoder with the default (UTF-8, delimited) hypothesis cached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder starting from a specific cached hypothesis
    pub fn with_hypothesis(hypothesis: Hypothesis) -> Self {
        Self {
            cached: hypothesis,
            stats: DecoderStats::default(),
        }
    }

    /// The hypothesis tried first on the next call
    pub fn cached(&self) -> Hypothesis {
        self.cached
    }

    /// Usage counters
    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    /// Decode a captured message, or `None` if it is not an RSocket frame
    pub fn decode(&mut self, bytes: &[u8]) -> Option<DecodedFrame> {
        match self.cached.decode(bytes) {
            Ok(frame) => {
                self.stats.fast_path_hits += 1;
                return Some(frame);
            }
            Err(e) => trace!("cached hypothesis {} failed: {}", self.cached, e),
        }

        for hypothesis in FALLBACK_ORDER {
            // already tried above
            if hypothesis == self.cached {
                continue;
            }
            self.stats.fallback_attempts += 1;
            match hypothesis.decode(bytes) {
                Ok(frame) => {
                    debug!(
                        "decoder hypothesis switched from {} to {}",
                        self.cached, hypothesis
                    );
                    self.cached = hypothesis;
                    self.stats.fallback_hits += 1;
                    return Some(frame);
                }
                Err(e) => trace!("hypothesis {} failed: {}", hypothesis, e),
            }
        }

        self.stats.misses += 1;
        None
    }
}
