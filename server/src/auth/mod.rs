//! Authentication and authorization
//!
//! - [`JwtService`] - JWT token service
//! - [`CurrentUser`] - current user context
//! - [`require_auth`] - authentication middleware
//! - [`require_permission`] / [`require_admin`] - authorization middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_permission};
pub use permissions::{ALL_PERMISSIONS, default_permissions};
