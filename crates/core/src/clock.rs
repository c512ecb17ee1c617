//! Civil time for the guidance office.
//!
//! Every "today" and "now" decision in the booking rules is made against a
//! fixed civil offset (the reference deployment runs at UTC+8, no DST),
//! supplied through the [`Clock`] trait rather than read from the process
//! environment. Storage timestamps stay in UTC; conversion happens here.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{GuidanceError, GuidanceResult};

/// Civil offset used when the configuration does not override it.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

const SECS_PER_HOUR: i32 = 3600;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn offset(&self) -> FixedOffset;

    /// Current wall-clock date and time in the deployment's civil calendar.
    fn now_local(&self) -> NaiveDateTime {
        self.now_utc().with_timezone(&self.offset()).naive_local()
    }

    /// Current civil calendar date.
    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

/// Wall clock at a fixed civil offset.
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset_hours: i32) -> GuidanceResult<Self> {
        let offset = FixedOffset::east_opt(offset_hours * SECS_PER_HOUR).ok_or_else(|| {
            GuidanceError::InvalidInput(format!("invalid UTC offset: {offset_hours} hours"))
        })?;
        Ok(Self { offset })
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * SECS_PER_HOUR).unwrap(),
        }
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Clock pinned to a single instant, for tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Pins the clock at the given instant under the default UTC+8 offset.
    pub fn utc8(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * SECS_PER_HOUR).unwrap(),
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}
