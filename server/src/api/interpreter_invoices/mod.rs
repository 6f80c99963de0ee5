//! Interpreter invoice API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/interpreter-invoices", routes())
}

fn routes() -> Router<ServerState> {
    let scoped_routes = Router::new()
        .route("/", post(handler::submit))
        .route("/mine", get(handler::list_mine))
        .route("/{id}/lines", get(handler::get_lines));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_permission("billing:run")));

    scoped_routes.merge(admin_routes)
}
