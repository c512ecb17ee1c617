use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use guidance_core::clock::Clock;
use guidance_core::errors::{GuidanceError, GuidanceResult};
use guidance_core::models::slot::{
    self, BulkCreateSlotsRequest, BulkCreateSlotsResponse, CreateSlotRequest, DeleteSlotResponse,
    ResyncCountsResponse, SlotKey, SlotLoadResponse, SlotResponse, ToggleSlotResponse,
    UpdateSlotRequest,
};
use guidance_db::booking;
use guidance_db::repositories;

use crate::handlers::slots::slot_response;
use crate::{middleware::error_handling::AppError, ApiState};

/// Staff listing: every slot with counts recomputed from live appointment
/// rows, never the advisory cache.
#[axum::debug_handler]
pub async fn list_slots_with_load(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SlotLoadResponse>>, AppError> {
    let today = state.clock.today();
    let local_time_now = state.clock.now_local().time();
    booking::expire_due_slots(&state.db_pool, today, local_time_now).await?;

    let mut rows = repositories::slot::list_with_live_counts(&state.db_pool)
        .await
        .map_err(GuidanceError::Database)?;
    rows.sort_by(|a, b| {
        a.slot_date
            .cmp(&b.slot_date)
            .then_with(|| {
                slot::label_sort_minutes(&a.time_label)
                    .cmp(&slot::label_sort_minutes(&b.time_label))
            })
            .then_with(|| a.time_label.cmp(&b.time_label))
    });

    let responses = rows
        .into_iter()
        .map(|row| SlotLoadResponse {
            id: row.id,
            date: row.slot_date,
            time: row.time_label,
            max_capacity: row.max_capacity,
            pending_count: row.pending_count,
            approved_count: row.approved_count,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();

    Ok(Json(responses))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    let key = SlotKey::new(&payload.date, &payload.time)?;
    let max_capacity = capacity_or_default(payload.max_capacity)?;
    slot::validate_not_past(&key, state.clock.today(), state.clock.now_local().time())?;

    let created = booking::create_slot(&state.db_pool, &key, max_capacity).await?;

    if key.time_of_day().is_none() {
        warn!(slot_id = %created.id, label = %created.time_label,
            "slot created with a time label that does not parse; it will never auto-expire");
    }

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "slot_created",
        &format!("slot {key} created with capacity {max_capacity}"),
    )
    .await;

    Ok(Json(slot_response(created)))
}

/// Creates many slots for one date. Times that are invalid, duplicated or
/// already past are reported as skipped; the rest are still created.
#[axum::debug_handler]
pub async fn create_slots_bulk(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BulkCreateSlotsRequest>,
) -> Result<Json<BulkCreateSlotsResponse>, AppError> {
    let date = slot::parse_date(&payload.date)?;
    let max_capacity = capacity_or_default(payload.max_capacity)?;

    let (created, skipped) = booking::create_slots_bulk(
        &state.db_pool,
        date,
        &payload.times,
        max_capacity,
        state.clock.today(),
        state.clock.now_local().time(),
    )
    .await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "slots_bulk_created",
        &format!(
            "{} slot(s) created for {date}, {} skipped",
            created.len(),
            skipped.len()
        ),
    )
    .await;

    Ok(Json(BulkCreateSlotsResponse {
        created: created.into_iter().map(slot_response).collect(),
        skipped,
    }))
}

/// Administrative overwrite; past dates are deliberately not re-validated.
#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    let key = SlotKey::new(&payload.date, &payload.time)?;
    let max_capacity = capacity_or_default(Some(payload.max_capacity))?;

    let updated = booking::update_slot(&state.db_pool, id, &key, max_capacity).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "slot_updated",
        &format!("slot {id} rewritten to {key} with capacity {max_capacity}"),
    )
    .await;

    Ok(Json(slot_response(updated)))
}

#[axum::debug_handler]
pub async fn toggle_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleSlotResponse>, AppError> {
    let outcome = booking::toggle_slot(&state.db_pool, id).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "slot_toggled",
        &format!(
            "slot {} {} is now {}; {} appointment(s) completed",
            outcome.slot.slot_date,
            outcome.slot.time_label,
            if outcome.slot.is_active {
                "active"
            } else {
                "inactive"
            },
            outcome.completed.len()
        ),
    )
    .await;

    Ok(Json(ToggleSlotResponse {
        slot: slot_response(outcome.slot),
        completed_appointments: outcome.completed.len(),
    }))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    let deleted = booking::delete_slot(&state.db_pool, id).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "slot_deleted",
        &format!("slot {} {} deleted", deleted.slot_date, deleted.time_label),
    )
    .await;

    Ok(Json(DeleteSlotResponse {
        id: deleted.id,
        deleted: true,
    }))
}

#[axum::debug_handler]
pub async fn resync_counts(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ResyncCountsResponse>, AppError> {
    let slots_changed = booking::resync_all_counts(&state.db_pool).await?;

    Ok(Json(ResyncCountsResponse { slots_changed }))
}

fn capacity_or_default(max_capacity: Option<i32>) -> GuidanceResult<i32> {
    let max_capacity = max_capacity.unwrap_or(slot::DEFAULT_MAX_CAPACITY);
    if max_capacity <= 0 {
        return Err(GuidanceError::InvalidInput(
            "max capacity must be at least 1".to_string(),
        ));
    }
    Ok(max_capacity)
}
