//! Client profile API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clients", routes())
}

fn routes() -> Router<ServerState> {
    // Clients may read their own profile
    let scoped_routes = Router::new().route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::deactivate),
        )
        .layer(middleware::from_fn(require_permission("profiles:manage")));

    scoped_routes.merge(admin_routes)
}
