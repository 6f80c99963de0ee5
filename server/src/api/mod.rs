//! HTTP API
//!
//! One module per resource, each exposing a `router()` that nests its
//! routes under `/api/<resource>` with the permission layers it needs.
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - login and current-user info
//! - [`bookings`] - booking lifecycle and conflict scan
//! - [`assignments`] - interpreter offers
//! - [`timesheets`] - timesheet submission and approval
//! - [`rates`] - rate table maintenance
//! - [`clients`] / [`interpreters`] - profile management
//! - [`client_invoices`] / [`interpreter_invoices`] - billing
//! - [`users`] - account administration

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod health;

pub mod assignments;
pub mod bookings;
pub mod timesheets;

pub mod client_invoices;
pub mod interpreter_invoices;
pub mod rates;

pub mod clients;
pub mod interpreters;
pub mod users;

/// Request ID generator for the `x-request-id` header
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(bookings::router())
        .merge(assignments::router())
        .merge(timesheets::router())
        .merge(rates::router())
        .merge(clients::router())
        .merge(interpreters::router())
        .merge(client_invoices::router())
        .merge(interpreter_invoices::router())
        .merge(users::router())
}

/// Build the fully layered application
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication, injects CurrentUser ahead of the routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
