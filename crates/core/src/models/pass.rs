use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pass issued to a student when staff complete an approved appointment.
/// One per appointment, write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidancePassResponse {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub issued_at: DateTime<Utc>,
}
