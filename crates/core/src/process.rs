//! Process instances: running or completed executions of a definition.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timefmt;
use crate::types::Timestamp;
use crate::variable::{Variable, VariableValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub id: String,
    pub process_definition_id: String,
    pub process_definition_key: String,
    #[serde(with = "timefmt::wire_date")]
    pub started_at: Timestamp,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub ended_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_in_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delete_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub business_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub super_process_instance_id: Option<String>,
    pub start_activity_id: String,
    pub start_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_activity_id: Option<String>,
    pub completed: bool,
    /// Untyped name→value view, echoed on process creation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variables: Option<BTreeMap<String, VariableValue>>,
    /// Content identifiers attached at creation, echoed on creation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<BTreeSet<String>>,
    /// Typed variable list, present only when explicitly requested
    /// (`includeProcessVariables` in the where clause).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub process_variables: Option<Vec<Variable>>,
}

/// Request body for starting a process instance.
///
/// Exactly one of `process_definition_id` / `process_definition_key` must
/// be provided; the key form starts the latest deployed version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProcess {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub process_definition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub process_definition_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub business_key: Option<String>,
    /// Initial process variables, untyped; values are inferred.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub variables: BTreeMap<String, Value>,
    /// Content identifiers to attach at start.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub items: Vec<String>,
}
