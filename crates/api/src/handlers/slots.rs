use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use guidance_core::clock::Clock;
use guidance_core::errors::GuidanceError;
use guidance_core::models::slot::{self, SlotResponse};
use guidance_db::models::DbSlot;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_open_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let today = state.clock.today();
    let local_time_now = state.clock.now_local().time();

    // Expiry is read-driven: retire lapsed slots before answering.
    guidance_db::booking::expire_due_slots(&state.db_pool, today, local_time_now).await?;

    let mut rows = guidance_db::repositories::slot::list_active_from(&state.db_pool, today)
        .await
        .map_err(GuidanceError::Database)?;
    sort_slot_rows(&mut rows);

    Ok(Json(rows.into_iter().map(slot_response).collect()))
}

#[axum::debug_handler]
pub async fn list_slots_for_date(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let date = slot::parse_date(&date)?;

    let today = state.clock.today();
    let local_time_now = state.clock.now_local().time();
    guidance_db::booking::expire_due_slots(&state.db_pool, today, local_time_now).await?;

    let mut rows = guidance_db::repositories::slot::list_active_on(&state.db_pool, date)
        .await
        .map_err(GuidanceError::Database)?;
    sort_slot_rows(&mut rows);

    Ok(Json(rows.into_iter().map(slot_response).collect()))
}

/// Orders rows by date, then by the label's wall-clock time. Label text is
/// free-form, so lexicographic order would interleave AM and PM.
pub fn sort_slot_rows(rows: &mut [DbSlot]) {
    rows.sort_by(|a, b| {
        a.slot_date
            .cmp(&b.slot_date)
            .then_with(|| {
                slot::label_sort_minutes(&a.time_label)
                    .cmp(&slot::label_sort_minutes(&b.time_label))
            })
            .then_with(|| a.time_label.cmp(&b.time_label))
    });
}

pub fn slot_response(row: DbSlot) -> SlotResponse {
    SlotResponse {
        id: row.id,
        date: row.slot_date,
        time: row.time_label,
        max_capacity: row.max_capacity,
        current_count: row.current_count,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
