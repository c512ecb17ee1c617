use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use guidance_core::errors::GuidanceResult;
use guidance_core::models::slot::SlotKey;

use crate::booking::{ApprovalOutcome, CompletionOutcome, NewAppointment, ToggleOutcome};
use crate::models::{DbAppointment, DbSlot, DbSlotWithLoad};

// Mock repositories for testing
mock! {
    pub SlotRepo {
        pub async fn get_slot_by_id(&self, id: Uuid) -> eyre::Result<Option<DbSlot>>;

        pub async fn get_slot_by_key(
            &self,
            slot_date: NaiveDate,
            time_label: &'static str,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn list_active_from(&self, from_date: NaiveDate) -> eyre::Result<Vec<DbSlot>>;

        pub async fn list_active_on(&self, date: NaiveDate) -> eyre::Result<Vec<DbSlot>>;

        pub async fn list_with_live_counts(&self) -> eyre::Result<Vec<DbSlotWithLoad>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn get_appointment_by_id(&self, id: Uuid) -> eyre::Result<Option<DbAppointment>>;

        pub async fn list_appointments(&self) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn list_by_status(&self, status: &'static str) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn list_by_student(
            &self,
            student_id: &'static str,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn count_for_key(
            &self,
            slot_date: NaiveDate,
            time_label: &'static str,
        ) -> eyre::Result<i64>;
    }
}

mock! {
    pub BookingEngine {
        pub async fn create_slot(&self, key: SlotKey, max_capacity: i32) -> GuidanceResult<DbSlot>;

        pub async fn update_slot(
            &self,
            id: Uuid,
            key: SlotKey,
            max_capacity: i32,
        ) -> GuidanceResult<DbSlot>;

        pub async fn toggle_slot(&self, id: Uuid) -> GuidanceResult<ToggleOutcome>;

        pub async fn delete_slot(&self, id: Uuid) -> GuidanceResult<DbSlot>;

        pub async fn expire_due_slots(
            &self,
            today: NaiveDate,
            local_time_now: NaiveTime,
        ) -> GuidanceResult<u64>;

        pub async fn create_appointment(&self, new: NewAppointment) -> GuidanceResult<DbAppointment>;

        pub async fn approve_appointment(&self, id: Uuid) -> GuidanceResult<ApprovalOutcome>;

        pub async fn reject_appointment(
            &self,
            id: Uuid,
            reason: &'static str,
        ) -> GuidanceResult<DbAppointment>;

        pub async fn complete_appointment(&self, id: Uuid) -> GuidanceResult<CompletionOutcome>;

        pub async fn resync_all_counts(&self) -> GuidanceResult<u64>;
    }
}
