//! Client invoice API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/client-invoices", routes())
}

fn routes() -> Router<ServerState> {
    // Reads are owner-or-admin, checked in the handlers
    let scoped_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/lines", get(handler::get_lines));

    let admin_routes = Router::new()
        .route("/generate", post(handler::generate))
        .route("/{id}/status", post(handler::update_status))
        .layer(middleware::from_fn(require_permission("billing:run")));

    scoped_routes.merge(admin_routes)
}
