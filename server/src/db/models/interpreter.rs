//! Interpreter profile model

use super::ServiceType;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type InterpreterId = RecordId;

/// Interpreter entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpreter {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<InterpreterId>,

    pub name: String,
    pub email: String,
    pub phone: Option<String>,

    /// Languages offered (ISO names, e.g. "Spanish")
    #[serde(default)]
    pub languages: Vec<String>,

    /// Service types the interpreter works
    #[serde(default)]
    pub services: Vec<ServiceType>,

    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterpreterCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub services: Vec<ServiceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterpreterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
