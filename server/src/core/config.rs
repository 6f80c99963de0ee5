use crate::auth::JwtConfig;

/// Server configuration - all runtime settings of the portal server
///
/// # Environment variables
///
/// Every setting can be overridden through an environment variable:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/lingualink | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | PAYMENT_TERMS_DAYS | 30 | Client invoice due date offset |
/// | REQUEST_TIMEOUT_MS | 30000 | Request timeout (milliseconds) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown timeout (milliseconds) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/lingualink HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT authentication configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Days until a generated client invoice falls due
    pub payment_terms_days: i64,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Graceful shutdown timeout (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/lingualink".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            payment_terms_days: std::env::var("PAYMENT_TERMS_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Path of the embedded database under the working directory
    pub fn db_path(&self) -> String {
        format!("{}/db", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
