//! Bookable slots and the rules that govern when one may be offered.
//!
//! A slot is a (calendar date, time label) pair with a capacity. The time
//! label is free text ("9:00 AM") that students' appointments must match
//! character for character, so the pair is modeled as a validated natural
//! key rather than two loose strings.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GuidanceError, GuidanceResult};

/// Capacity assigned when a create request does not specify one.
pub const DEFAULT_MAX_CAPACITY: i32 = 3;

/// Wall-clock format of a slot's time label, e.g. "9:00 AM".
pub const TIME_LABEL_FORMAT: &str = "%I:%M %p";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Composite natural key shared by slots and appointments.
///
/// The label is trimmed once at construction and never reformatted
/// afterwards; both sides of the join must agree on the exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    date: NaiveDate,
    time_label: String,
}

/// Parses a calendar date in the wire format shared by every endpoint.
pub fn parse_date(value: &str) -> GuidanceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        GuidanceError::InvalidInput(format!("invalid date '{value}', expected yyyy-mm-dd"))
    })
}

impl SlotKey {
    pub fn new(date: &str, time_label: &str) -> GuidanceResult<Self> {
        Self::from_parts(parse_date(date)?, time_label)
    }

    pub fn from_parts(date: NaiveDate, time_label: &str) -> GuidanceResult<Self> {
        let time_label = time_label.trim();
        if time_label.is_empty() {
            return Err(GuidanceError::InvalidInput(
                "time label must not be blank".to_string(),
            ));
        }
        Ok(Self {
            date,
            time_label: time_label.to_string(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Parses the label as a wall-clock time. Labels outside the strict
    /// "h:mm AM/PM" format yield `None`; callers decide whether to flag them.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time_label, TIME_LABEL_FORMAT).ok()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time_label)
    }
}

/// Rejects slots scheduled in the past: dates before today, and today's
/// slots whose label time is at or before the current local time. Labels
/// that do not parse are not rejected here; expiry flags them later.
pub fn validate_not_past(
    key: &SlotKey,
    today: NaiveDate,
    local_time_now: NaiveTime,
) -> GuidanceResult<()> {
    if key.date() < today {
        return Err(GuidanceError::InvalidInput(format!(
            "date {} has already passed",
            key.date()
        )));
    }
    if key.date() == today {
        if let Some(time) = key.time_of_day() {
            if time <= local_time_now {
                return Err(GuidanceError::InvalidInput(format!(
                    "time {} has already passed today",
                    key.time_label()
                )));
            }
        }
    }
    Ok(())
}

/// A slot lapses once it is dated today and its label time is at or before
/// the current local time. Unparsable labels never lapse.
pub fn is_lapsed(key: &SlotKey, today: NaiveDate, local_time_now: NaiveTime) -> bool {
    key.date() == today
        && key
            .time_of_day()
            .map_or(false, |time| time <= local_time_now)
}

/// Sort rank of a time label within one date; unparsable labels sort last.
pub fn label_sort_minutes(time_label: &str) -> u32 {
    NaiveTime::parse_from_str(time_label.trim(), TIME_LABEL_FORMAT)
        .map(|time| time.hour() * 60 + time.minute())
        .unwrap_or(u32::MAX)
}

/// Why one requested time was skipped during a bulk create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "already exists")]
    AlreadyExists,
    #[serde(rename = "time has passed")]
    TimePassed,
    #[serde(rename = "invalid time label")]
    InvalidLabel,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::AlreadyExists => "already exists",
            SkipReason::TimePassed => "time has passed",
            SkipReason::InvalidLabel => "invalid time label",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub date: String,
    pub time: String,
    pub max_capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateSlotsRequest {
    pub date: String,
    pub times: Vec<String>,
    pub max_capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub date: String,
    pub time: String,
    pub max_capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub max_capacity: i32,
    pub current_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Staff view of a slot with counts recomputed from live appointment rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotLoadResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub max_capacity: i32,
    pub pending_count: i64,
    pub approved_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSlotTime {
    pub time: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateSlotsResponse {
    pub created: Vec<SlotResponse>,
    pub skipped: Vec<SkippedSlotTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSlotResponse {
    pub slot: SlotResponse,
    /// Approved appointments completed by this deactivation.
    pub completed_appointments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResyncCountsResponse {
    pub slots_changed: u64,
}
