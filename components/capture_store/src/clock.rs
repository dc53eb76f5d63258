//! Session clock
//!
//! Transport timestamps are seconds on an arbitrary monotonic origin. The first
//! frame of the session pins that origin to the wall clock, and every later frame
//! is placed relative to that pair. The pair is never reset, not even per
//! connection.

use capture_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `SystemTime`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}

/// The (transport time, wall time) anchor pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockReference {
    /// Transport timestamp of the first frame, in seconds
    pub transport_time: f64,
    /// Wall time when that frame was observed, in ms since epoch
    pub wall_time_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    reference: Option<ClockReference>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The anchor pair, once the first frame has been seen
    pub fn reference(&self) -> Option<ClockReference> {
        self.reference
    }

    /// Absolute time (ms since epoch) of a transport timestamp
    ///
    /// The first call establishes the reference using `wall`.
    pub fn resolve(&mut self, timestamp: Timestamp, wall: &dyn Clock) -> f64 {
        let reference = *self.reference.get_or_insert_with(|| ClockReference {
            transport_time: timestamp.0,
            wall_time_ms: wall.now_ms(),
        });
        (timestamp.0 - reference.transport_time) * 1000.0 + reference.wall_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_timestamp_sets_reference() {
        let mut clock = SessionClock::new();
        assert!(clock.reference().is_none());

        let time = clock.resolve(Timestamp(100.0), &FixedClock(5_000.0));
        assert_eq!(time, 5_000.0);
        assert_eq!(
            clock.reference(),
            Some(ClockReference {
                transport_time: 100.0,
                wall_time_ms: 5_000.0
            })
        );
    }

    #[test]
    fn test_reference_is_immutable() {
        let mut clock = SessionClock::new();
        clock.resolve(Timestamp(100.0), &FixedClock(5_000.0));

        // a different wall clock later has no effect
        let time = clock.resolve(Timestamp(101.5), &FixedClock(999_999.0));
        assert_eq!(time, 6_500.0);

        let earlier = clock.resolve(Timestamp(99.0), &FixedClock(0.0));
        assert_eq!(earlier, 4_000.0);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now_ms() > 0.0);
    }
}
