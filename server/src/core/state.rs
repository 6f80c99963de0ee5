use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::models::UserCreate;
use crate::db::repository::UserRepository;
use shared::Role;

/// Server state - shared singleton references for all services
///
/// Cloning is cheap: every field is either `Clone`-by-handle or wrapped
/// in an `Arc`.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | db | Surreal<Db> | Embedded database |
/// | jwt_service | Arc<JwtService> | JWT authentication |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT token service
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize state against the on-disk database
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| ServerError::Config(format!("Cannot create work dir: {}", e)))?;

        let db = Surreal::new::<RocksDb>(config.db_path().as_str()).await?;
        db.use_ns("lingualink").use_db("portal").await?;
        tracing::info!(path = %config.db_path(), "Database opened");

        Self::with_db(config, db).await
    }

    /// Initialize state against an in-memory database (tests)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns("lingualink").use_db("portal").await?;
        Self::with_db(config, db).await
    }

    async fn with_db(config: &Config, db: Surreal<Db>) -> Result<Self> {
        let state = Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        };
        state.seed_admin_user().await?;
        Ok(state)
    }

    /// Create the bootstrap admin account on first start
    ///
    /// Credentials come from ADMIN_USERNAME / ADMIN_PASSWORD; if the
    /// username already exists this is a no-op.
    async fn seed_admin_user(&self) -> Result<()> {
        let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let repo = UserRepository::new(self.db.clone());

        let existing = repo
            .find_by_username(&username)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if existing.is_some() {
            return Ok(());
        }

        let password = match std::env::var("ADMIN_PASSWORD") {
            Ok(p) => p,
            Err(_) if self.config.is_production() => {
                return Err(ServerError::Config(
                    "ADMIN_PASSWORD must be set in production".into(),
                ));
            }
            Err(_) => "admin".into(),
        };

        repo.create(UserCreate {
            username: username.clone(),
            password,
            role: Role::Admin,
            display_name: Some("Administrator".into()),
            client: None,
            interpreter: None,
        })
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;

        tracing::info!(username = %username, "Bootstrap admin account created");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
