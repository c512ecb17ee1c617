use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/slots", get(handlers::admin::list_slots_with_load))
        .route("/api/admin/slots", post(handlers::admin::create_slot))
        .route(
            "/api/admin/slots/bulk",
            post(handlers::admin::create_slots_bulk),
        )
        .route(
            "/api/admin/slots/resync",
            post(handlers::admin::resync_counts),
        )
        .route("/api/admin/slots/:id", put(handlers::admin::update_slot))
        .route("/api/admin/slots/:id", delete(handlers::admin::delete_slot))
        .route(
            "/api/admin/slots/:id/toggle",
            post(handlers::admin::toggle_slot),
        )
}
