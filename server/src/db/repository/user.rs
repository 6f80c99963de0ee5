//! User Account Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate, UserUpdate};
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user account
    ///
    /// The password hash is written explicitly because `hash_pass` never
    /// serializes out of the model.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        // Non-admin accounts must link the profile that scopes them
        let client = match (&data.role, &data.client) {
            (Role::Client, Some(id)) => Some(parse_record_id("client", id)?.to_string()),
            (Role::Client, None) => {
                return Err(RepoError::Validation(
                    "CLIENT accounts require a linked client profile".to_string(),
                ));
            }
            _ => None,
        };
        let interpreter = match (&data.role, &data.interpreter) {
            (Role::Interpreter, Some(id)) => Some(parse_record_id("interpreter", id)?.to_string()),
            (Role::Interpreter, None) => {
                return Err(RepoError::Validation(
                    "INTERPRETER accounts require a linked interpreter profile".to_string(),
                ));
            }
            _ => None,
        };

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    client = $client,
                    interpreter = $interpreter,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("client", client))
            .bind(("interpreter", interpreter))
            .await?;

        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let record = parse_record_id(TABLE, id)?;

        if let Some(password) = &data.password {
            let hash_pass = User::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
            self.base
                .db()
                .query("UPDATE $record SET hash_pass = $hash_pass")
                .bind(("record", record.clone()))
                .bind(("hash_pass", hash_pass))
                .await?;
        }
        if let Some(display_name) = data.display_name {
            self.base
                .db()
                .query("UPDATE $record SET display_name = $display_name")
                .bind(("record", record.clone()))
                .bind(("display_name", display_name))
                .await?;
        }
        if let Some(is_active) = data.is_active {
            self.base
                .db()
                .query("UPDATE $record SET is_active = $is_active")
                .bind(("record", record.clone()))
                .bind(("is_active", is_active))
                .await?;
        }

        let user: Option<User> = self.base.db().select(record).await?;
        user.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}
