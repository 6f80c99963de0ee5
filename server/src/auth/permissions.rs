//! Permission definitions
//!
//! Simplified RBAC: self-service operations (viewing own bookings,
//! responding to own offers, submitting own timesheets) need no
//! configured permission beyond login; admin-console modules are gated
//! per permission below.

use shared::Role;

/// Configurable admin-console permissions
pub const ALL_PERMISSIONS: &[&str] = &[
    "bookings:manage",    // create/cancel bookings, direct-assign interpreters
    "offers:manage",      // create and retract interpreter offers
    "timesheets:approve", // approve timesheets (freezes amounts)
    "rates:manage",       // maintain the rate table
    "billing:run",        // generate client invoices, resolve interpreter invoices
    "profiles:manage",    // maintain client and interpreter profiles
    "users:manage",       // account administration
];

/// Default permissions per role
///
/// Clients and interpreters get no configured permissions; their access
/// is ownership-scoped in the handlers.
pub fn default_permissions(role: Role) -> Vec<String> {
    match role {
        Role::Admin => vec!["all".to_string()],
        Role::Client | Role::Interpreter => vec![],
    }
}
