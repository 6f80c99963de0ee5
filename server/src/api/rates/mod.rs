//! Rate table API module

mod handler;

use axum::{Router, middleware, routing::delete, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/rates", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).put(handler::upsert))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("rates:manage")))
}
