use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use guidance_core::clock::Clock;
use guidance_core::errors::{GuidanceError, GuidanceResult};
use guidance_core::models::appointment::{
    self, AppointmentResponse, AppointmentStatus, ApproveAppointmentResponse,
    CompleteAppointmentResponse, CreateAppointmentRequest, RejectAppointmentRequest,
};
use guidance_core::models::pass::GuidancePassResponse;
use guidance_core::models::slot::SlotKey;
use guidance_db::booking::{self, NewAppointment};
use guidance_db::models::{DbAppointment, DbGuidancePass};
use guidance_db::repositories;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters selecting one slot's appointments by its natural key.
#[derive(Debug, Deserialize)]
pub struct SlotAppointmentsQuery {
    pub date: String,
    pub time: String,
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let key = SlotKey::new(&payload.date, &payload.time)?;
    let new = NewAppointment {
        student_id: require_field(&payload.student_id, "student_id")?,
        student_name: require_field(&payload.student_name, "student_name")?,
        program_section: require_field(&payload.program_section, "program_section")?,
        reason: require_field(&payload.reason, "reason")?,
        key,
    };

    // Retire lapsed slots before the admission check reads them.
    let today = state.clock.today();
    let local_time_now = state.clock.now_local().time();
    booking::expire_due_slots(&state.db_pool, today, local_time_now).await?;

    let created = booking::create_appointment(&state.db_pool, new).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        &created.student_id,
        "appointment_requested",
        &format!(
            "appointment {} requested for {} {}",
            created.id, created.slot_date, created.time_label
        ),
    )
    .await;

    Ok(Json(appointment_response(created)?))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let rows = repositories::appointment::list_appointments(&state.db_pool)
        .await
        .map_err(GuidanceError::Database)?;

    Ok(Json(appointment_responses(rows)?))
}

#[axum::debug_handler]
pub async fn list_pending_appointments(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let rows = repositories::appointment::list_by_status(
        &state.db_pool,
        AppointmentStatus::Pending.as_str(),
    )
    .await
    .map_err(GuidanceError::Database)?;

    Ok(Json(appointment_responses(rows)?))
}

/// Approved appointments for one slot, used by staff before finalizing
/// decisions on its remaining pending requests.
#[axum::debug_handler]
pub async fn list_approved_for_slot(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotAppointmentsQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let key = SlotKey::new(&query.date, &query.time)?;

    let rows = repositories::appointment::list_for_key_with_status(
        &state.db_pool,
        key.date(),
        key.time_label(),
        AppointmentStatus::Approved.as_str(),
    )
    .await
    .map_err(GuidanceError::Database)?;

    Ok(Json(appointment_responses(rows)?))
}

#[axum::debug_handler]
pub async fn list_appointments_by_student(
    State(state): State<Arc<ApiState>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let rows = repositories::appointment::list_by_student(&state.db_pool, &student_id)
        .await
        .map_err(GuidanceError::Database)?;

    Ok(Json(appointment_responses(rows)?))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let row = repositories::appointment::get_appointment_by_id(&state.db_pool, id)
        .await
        .map_err(GuidanceError::Database)?
        .ok_or_else(|| GuidanceError::NotFound(format!("appointment {id} not found")))?;

    Ok(Json(appointment_response(row)?))
}

#[axum::debug_handler]
pub async fn approve_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApproveAppointmentResponse>, AppError> {
    // Expiry runs before every capacity decision.
    let today = state.clock.today();
    let local_time_now = state.clock.now_local().time();
    booking::expire_due_slots(&state.db_pool, today, local_time_now).await?;

    let outcome = booking::approve_appointment(&state.db_pool, id).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "appointment_approved",
        &format!(
            "appointment {} approved; {} pending auto-rejected",
            outcome.appointment.id,
            outcome.auto_rejected.len()
        ),
    )
    .await;

    Ok(Json(ApproveAppointmentResponse {
        appointment: appointment_response(outcome.appointment)?,
        auto_rejected: appointment_responses(outcome.auto_rejected)?,
    }))
}

#[axum::debug_handler]
pub async fn reject_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let reason = appointment::normalize_rejection_reason(&payload.reason)?;

    let updated = booking::reject_appointment(&state.db_pool, id, &reason).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "appointment_rejected",
        &format!("appointment {} rejected: {reason}", updated.id),
    )
    .await;

    Ok(Json(appointment_response(updated)?))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompleteAppointmentResponse>, AppError> {
    let outcome = booking::complete_appointment(&state.db_pool, id).await?;

    repositories::activity::record_best_effort(
        &state.db_pool,
        "counselor",
        "guidance_pass_issued",
        &format!(
            "pass {} issued for appointment {}; slot {} {} closed",
            outcome.pass.id, outcome.appointment.id, outcome.slot.slot_date, outcome.slot.time_label
        ),
    )
    .await;

    Ok(Json(CompleteAppointmentResponse {
        appointment: appointment_response(outcome.appointment)?,
        pass: pass_response(outcome.pass),
    }))
}

fn require_field(value: &str, name: &str) -> GuidanceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GuidanceError::InvalidInput(format!(
            "{name} must not be blank"
        )));
    }
    Ok(value.to_string())
}

pub fn appointment_response(row: DbAppointment) -> GuidanceResult<AppointmentResponse> {
    let status = row.parsed_status()?;
    Ok(AppointmentResponse {
        id: row.id,
        student_id: row.student_id,
        student_name: row.student_name,
        program_section: row.program_section,
        reason: row.reason,
        date: row.slot_date,
        time: row.time_label,
        status,
        rejection_reason: row.rejection_reason,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn appointment_responses(
    rows: Vec<DbAppointment>,
) -> GuidanceResult<Vec<AppointmentResponse>> {
    rows.into_iter().map(appointment_response).collect()
}

pub fn pass_response(row: DbGuidancePass) -> GuidancePassResponse {
    GuidancePassResponse {
        id: row.id,
        appointment_id: row.appointment_id,
        student_id: row.student_id,
        student_name: row.student_name,
        date: row.slot_date,
        time: row.time_label,
        issued_at: row.issued_at,
    }
}
