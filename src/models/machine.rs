use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub name: String,
    pub machine_type: String,
}

/// Latest reading of a named machine component (temperature, spindle load, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentValue {
    pub name: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}
