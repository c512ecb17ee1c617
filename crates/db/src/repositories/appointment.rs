use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbAppointment;

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments(pool: &Pool<Postgres>) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_by_status(pool: &Pool<Postgres>, status: &str) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        WHERE status = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_by_student(
    pool: &Pool<Postgres>,
    student_id: &str,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        WHERE student_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_for_key_with_status(
    pool: &Pool<Postgres>,
    slot_date: NaiveDate,
    time_label: &str,
    status: &str,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, student_id, student_name, program_section, reason, slot_date, time_label,
               status, rejection_reason, created_at, updated_at
        FROM appointments
        WHERE slot_date = $1 AND time_label = $2 AND status = $3
        ORDER BY created_at ASC
        "#,
    )
    .bind(slot_date)
    .bind(time_label)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn count_for_key(
    pool: &Pool<Postgres>,
    slot_date: NaiveDate,
    time_label: &str,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE slot_date = $1 AND time_label = $2
        "#,
    )
    .bind(slot_date)
    .bind(time_label)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
