//! Assignment (offer) API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/assignments", routes())
}

fn routes() -> Router<ServerState> {
    // Interpreters act on offers addressed to them; the handlers verify
    // ownership.
    let scoped_routes = Router::new()
        .route("/mine", get(handler::list_mine))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/decline", post(handler::decline));

    let admin_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .layer(middleware::from_fn(require_permission("offers:manage")));

    scoped_routes.merge(admin_routes)
}
