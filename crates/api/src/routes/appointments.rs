use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointments::create_appointment),
        )
        .route(
            "/api/appointments",
            get(handlers::appointments::list_appointments),
        )
        .route(
            "/api/appointments/pending",
            get(handlers::appointments::list_pending_appointments),
        )
        .route(
            "/api/appointments/approved",
            get(handlers::appointments::list_approved_for_slot),
        )
        .route(
            "/api/appointments/student/:student_id",
            get(handlers::appointments::list_appointments_by_student),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointments::get_appointment),
        )
        .route(
            "/api/appointments/:id/approve",
            post(handlers::appointments::approve_appointment),
        )
        .route(
            "/api/appointments/:id/reject",
            post(handlers::appointments::reject_appointment),
        )
        .route(
            "/api/appointments/:id/complete",
            post(handlers::appointments::complete_appointment),
        )
}
