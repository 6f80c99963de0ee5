//! Rate model

use super::ServiceType;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type RateId = RecordId;

/// Which side of a job the rate prices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateType {
    /// What the client is billed
    Client,
    /// What the interpreter is paid
    Interpreter,
}

/// Rate entity, keyed by (rate_type, service_type)
///
/// Units are hours; `minimum_units` is a per-job floor. Money fields are
/// stored as `f64`; pricing arithmetic converts them to `Decimal` first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RateId>,

    pub rate_type: RateType,
    pub service_type: ServiceType,

    pub amount_per_unit: f64,
    pub minimum_units: f64,
}

/// Create/update rate payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateUpsert {
    pub rate_type: RateType,
    pub service_type: ServiceType,
    pub amount_per_unit: f64,
    pub minimum_units: f64,
}
