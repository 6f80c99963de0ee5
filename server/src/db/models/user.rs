//! User account model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

pub type UserId = RecordId;

/// User account
///
/// Client and interpreter accounts link to their profile document; the
/// link scopes what the account may see and mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,

    pub username: String,

    #[serde(skip_serializing)]
    pub hash_pass: String,

    pub role: Role,

    pub display_name: String,

    #[serde(default, with = "serde_helpers::option_record_id")]
    pub client: Option<RecordId>,

    #[serde(default, with = "serde_helpers::option_record_id")]
    pub interpreter: Option<RecordId>,

    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub display_name: Option<String>,
    /// Linked client profile ("client:x"), required for CLIENT accounts
    pub client: Option<String>,
    /// Linked interpreter profile, required for INTERPRETER accounts
    pub interpreter: Option<String>,
}

/// Update user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// User data returned by the API (never carries the hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub display_name: String,
    pub profile: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let profile = user
            .client
            .as_ref()
            .or(user.interpreter.as_ref())
            .map(|r| r.to_string());
        Self {
            id: user.id.as_ref().map(|r| r.to_string()).unwrap_or_default(),
            username: user.username,
            role: user.role,
            display_name: user.display_name,
            profile,
            is_active: user.is_active,
        }
    }
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}
