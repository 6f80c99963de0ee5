//! Timesheet API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/timesheets", routes())
}

fn routes() -> Router<ServerState> {
    let scoped_routes = Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/{id}/approve", post(handler::approve))
        .layer(middleware::from_fn(require_permission("timesheets:approve")));

    scoped_routes.merge(admin_routes)
}
