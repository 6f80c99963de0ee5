//! Booking API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    // Ownership-scoped routes check the caller inside the handler:
    // clients and interpreters only ever see their own bookings.
    let scoped_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel));

    let admin_routes = Router::new()
        .route("/{id}", put(handler::update))
        .route("/{id}/assign", post(handler::assign))
        .route("/conflict-check", get(handler::conflict_check))
        .layer(middleware::from_fn(require_permission("bookings:manage")));

    scoped_routes.merge(admin_routes)
}
