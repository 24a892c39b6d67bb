use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use thiserror::Error as ThisError;

///
/// TimestampError
///

#[derive(Debug, ThisError)]
pub enum TimestampError {
    #[error("timestamp parse error: {0}")]
    Parse(String),

    #[error("timestamp before epoch: {0}")]
    BeforeEpoch(String),

    #[error("timestamp out of range: {0} ms")]
    OutOfRange(u64),
}

impl From<TimestampError> for InternalError {
    fn from(err: TimestampError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, err.to_string())
    }
}

///
/// Timestamp
/// (in milliseconds since the unix epoch)
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse an RFC 3339 / ISO-8601 string.
    #[allow(clippy::cast_sign_loss)]
    pub fn parse_iso(s: &str) -> Result<Self, TimestampError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Parse(e.to_string()))?;
        let ms = dt.timestamp_millis();
        if ms < 0 {
            return Err(TimestampError::BeforeEpoch(s.to_string()));
        }

        Ok(Self(ms as u64))
    }

    pub fn to_datetime(self) -> Result<DateTime<Utc>, TimestampError> {
        let ms = i64::try_from(self.0).map_err(|_| TimestampError::OutOfRange(self.0))?;

        DateTime::from_timestamp_millis(ms).ok_or(TimestampError::OutOfRange(self.0))
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn to_iso(self) -> Result<String, TimestampError> {
        Ok(self.to_datetime()?.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

///
/// Clock
///
/// Source of wall-clock time in milliseconds since the epoch.
///

pub trait Clock: Send {
    fn now_millis(&self) -> u64;
}

///
/// SystemClock
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_sign_loss)]
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

///
/// ManualClock
///
/// Clock that only moves when told to. Clones share the same time.
///

#[derive(Clone, Debug, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    #[must_use]
    pub fn at(ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(ms)))
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

///
/// Stamper
///
/// Issues record timestamps. Every issued value is strictly later than the
/// previous one, and strictly later than any floor passed by the caller.
///

pub struct Stamper {
    clock: Box<dyn Clock>,
    last: Timestamp,
}

impl Stamper {
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            last: Timestamp::EPOCH,
        }
    }

    /// Raw clock reading, without the monotonic adjustment.
    #[must_use]
    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Next timestamp, strictly after the last issued one and after `floor`.
    pub fn next_after(&mut self, floor: Option<Timestamp>) -> Timestamp {
        let mut ms = self
            .clock
            .now_millis()
            .max(self.last.get().saturating_add(1));
        if let Some(floor) = floor {
            ms = ms.max(floor.get().saturating_add(1));
        }

        self.last = Timestamp(ms);
        self.last
    }

    /// Next timestamp with no external floor.
    pub fn next(&mut self) -> Timestamp {
        self.next_after(None)
    }
}
