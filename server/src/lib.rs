//! LinguaLink Portal Server - interpreter booking marketplace backend
//!
//! # Architecture overview
//!
//! The portal server backs three fronts (admin console, client portal,
//! interpreter app) with one REST API over an embedded document store:
//!
//! - **Database** (`db`): embedded SurrealDB storage, one repository per collection
//! - **Auth** (`auth`): JWT + Argon2 authentication, role/permission middleware
//! - **Bookings** (`bookings`): booking/offer state machine and schedule conflict scan
//! - **Billing** (`billing`): timesheet calculation and invoice rollup
//! - **HTTP API** (`api`): RESTful routes per resource
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT authentication, permissions
//! ├── api/           # HTTP routes and handlers
//! ├── bookings/      # assignment state machine
//! ├── billing/       # rates, timesheet calculation, invoice rollup
//! ├── db/            # models and repositories
//! └── utils/         # logging, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod bookings;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing for auth events
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __    _                        __    _       __
   / /   (_)___  ____ ___  ______ / /   (_)___  / /__
  / /   / / __ \/ __ `/ / / / __ `/ /   / / __ \/ //_/
 / /___/ / / / / /_/ / /_/ / /_/ / /___/ / / / / ,<
/_____/_/_/ /_/\__, /\__,_/\__,_/_____/_/_/ /_/_/|_|
              /____/
    "#
    );
}
