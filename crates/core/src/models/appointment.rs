//! Appointment lifecycle: statuses, the transitions staff may drive, and
//! the capacity rules guarding admission and approval.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GuidanceError, GuidanceResult};
use crate::models::slot::SlotKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Parses a stored status. An unknown value means the row was written
    /// outside this system and is reported as a data-integrity fault.
    pub fn parse(value: &str) -> GuidanceResult<Self> {
        match value {
            "pending" => Ok(AppointmentStatus::Pending),
            "approved" => Ok(AppointmentStatus::Approved),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(GuidanceError::DataIntegrity(format!(
                "unknown appointment status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Rejected | AppointmentStatus::Completed
        )
    }

    fn can_become(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Approved)
                | (AppointmentStatus::Pending, AppointmentStatus::Rejected)
                | (AppointmentStatus::Approved, AppointmentStatus::Completed)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guards a staff-driven status change.
pub fn check_transition(
    current: AppointmentStatus,
    requested: AppointmentStatus,
) -> GuidanceResult<()> {
    if current.can_become(requested) {
        Ok(())
    } else {
        Err(GuidanceError::InvalidStateTransition(format!(
            "cannot move a {current} appointment to {requested}"
        )))
    }
}

/// Admission check when a student submits a new appointment. Only approved
/// appointments consume capacity here; pending ones never block submission.
pub fn admit_new_appointment(
    slot_is_active: bool,
    approved_count: i64,
    max_capacity: i32,
    key: &SlotKey,
) -> GuidanceResult<()> {
    if !slot_is_active {
        return Err(GuidanceError::SlotUnavailable(format!(
            "slot {key} is not open for booking"
        )));
    }
    if approved_count >= i64::from(max_capacity) {
        return Err(GuidanceError::SlotUnavailable(format!(
            "slot {key} is fully booked"
        )));
    }
    Ok(())
}

/// Capacity check immediately before an approval is committed. The caller
/// must hold the slot lock so the count cannot move under it.
pub fn admit_approval(approved_count: i64, max_capacity: i32, key: &SlotKey) -> GuidanceResult<()> {
    if approved_count >= i64::from(max_capacity) {
        return Err(GuidanceError::SlotFull(format!(
            "slot {key} already has {approved_count} approved appointment(s)"
        )));
    }
    Ok(())
}

/// Reason recorded on appointments auto-rejected when an approval fills
/// their slot.
pub fn capacity_rejection_reason(key: &SlotKey) -> String {
    format!(
        "Automatically rejected: the {} slot on {} reached its approved capacity.",
        key.time_label(),
        key.date()
    )
}

/// A manual rejection must carry a reason; surrounding whitespace is not one.
pub fn normalize_rejection_reason(reason: &str) -> GuidanceResult<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(GuidanceError::InvalidInput(
            "rejection reason must not be blank".to_string(),
        ));
    }
    Ok(reason.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub student_id: String,
    pub student_name: String,
    pub program_section: String,
    pub reason: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub program_section: String,
    pub reason: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveAppointmentResponse {
    pub appointment: AppointmentResponse,
    /// Pending appointments for the same slot that this approval rejected.
    pub auto_rejected: Vec<AppointmentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAppointmentResponse {
    pub appointment: AppointmentResponse,
    pub pass: crate::models::pass::GuidancePassResponse,
}
