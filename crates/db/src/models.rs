use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use guidance_core::errors::GuidanceResult;
use guidance_core::models::appointment::AppointmentStatus;
use guidance_core::models::slot::SlotKey;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    pub time_label: String,
    pub max_capacity: i32,
    pub current_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbSlot {
    pub fn key(&self) -> GuidanceResult<SlotKey> {
        SlotKey::from_parts(self.slot_date, &self.time_label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub program_section: String,
    pub reason: String,
    pub slot_date: NaiveDate,
    pub time_label: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn key(&self) -> GuidanceResult<SlotKey> {
        SlotKey::from_parts(self.slot_date, &self.time_label)
    }

    /// Typed view of the stored status; unknown values are a data-integrity
    /// fault, never a silent default.
    pub fn parsed_status(&self) -> GuidanceResult<AppointmentStatus> {
        AppointmentStatus::parse(&self.status)
    }
}

/// Slot row joined with counts recomputed from live appointment rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotWithLoad {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    pub time_label: String,
    pub max_capacity: i32,
    pub current_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pending_count: i64,
    pub approved_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGuidancePass {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub slot_date: NaiveDate,
    pub time_label: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbActivityRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
