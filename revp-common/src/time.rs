//! Display clock for sink payloads
//!
//! Sinks record submissions in the restaurant's local time, which is a fixed
//! +8h offset from UTC. The offset is applied for display only.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Fixed display offset applied to UTC instants
pub const DISPLAY_OFFSET_HOURS: i64 = 8;

/// Instant a submission was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAt(DateTime<Utc>);

impl RecordedAt {
    /// Current instant
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    fn display(&self) -> NaiveDateTime {
        (self.0 + Duration::hours(DISPLAY_OFFSET_HOURS)).naive_utc()
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp(&self) -> String {
        self.display().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.display().format("%Y-%m-%d").to_string()
    }

    /// `HH:MM:SS`
    pub fn time(&self) -> String {
        self.display().format("%H:%M:%S").to_string()
    }

    /// Underlying UTC instant, without the display shift
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
