//! Client profile model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type ClientId = RecordId;

/// Client entity - an organisation booking interpreters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ClientId>,

    pub name: String,
    pub contact_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub billing_address: Option<String>,

    /// Overrides the global payment terms when set
    pub payment_terms_days: Option<i64>,

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
pub struct ClientCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub billing_address: Option<String>,
    #[validate(range(min = 0, max = 365))]
    pub payment_terms_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub billing_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 365))]
    pub payment_terms_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
