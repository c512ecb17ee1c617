use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use guidance_core::models::appointment::AppointmentStatus;

use crate::models::{DbSlot, DbSlotWithLoad};

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_key(
    pool: &Pool<Postgres>,
    slot_date: NaiveDate,
    time_label: &str,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE slot_date = $1 AND time_label = $2
        "#,
    )
    .bind(slot_date)
    .bind(time_label)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn list_active_from(pool: &Pool<Postgres>, from_date: NaiveDate) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE is_active = TRUE AND slot_date >= $1
        ORDER BY slot_date ASC, time_label ASC
        "#,
    )
    .bind(from_date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn list_active_on(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, slot_date, time_label, max_capacity, current_count, is_active,
               created_at, updated_at
        FROM slots
        WHERE is_active = TRUE AND slot_date = $1
        ORDER BY time_label ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn list_with_live_counts(pool: &Pool<Postgres>) -> Result<Vec<DbSlotWithLoad>> {
    let slots = sqlx::query_as::<_, DbSlotWithLoad>(
        r#"
        SELECT s.id, s.slot_date, s.time_label, s.max_capacity, s.current_count, s.is_active,
               s.created_at, s.updated_at,
               COUNT(a.id) FILTER (WHERE a.status = $1) AS pending_count,
               COUNT(a.id) FILTER (WHERE a.status = $2) AS approved_count
        FROM slots s
        LEFT JOIN appointments a
               ON a.slot_date = s.slot_date AND a.time_label = s.time_label
        GROUP BY s.id
        ORDER BY s.slot_date ASC, s.time_label ASC
        "#,
    )
    .bind(AppointmentStatus::Pending.as_str())
    .bind(AppointmentStatus::Approved.as_str())
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
