//! User account API module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

// Account administration takes the ADMIN role outright on top of the
// scope check
fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("users:manage")))
        .layer(middleware::from_fn(require_admin))
}
