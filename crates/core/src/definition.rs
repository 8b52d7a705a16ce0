//! Process definitions: reusable workflow templates, identified by
//! key + version within a deployment.

use serde::{Deserialize, Serialize};

use crate::form::FormModelElement;

/// Category assigned to definitions deployed without an explicit one.
pub const DEFAULT_CATEGORY: &str = "http://alfresco.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    pub id: String,
    pub key: String,
    pub version: i32,
    pub name: String,
    pub deployment_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_form_resource_key: Option<String>,
    pub graphic_notation_defined: bool,
}

/// One process definition inside a [`NewDeployment`](crate::deployment::NewDeployment) body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_form_resource_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub start_form_fields: Vec<FormModelElement>,
    /// Ordered task flow: the engine activates these one at a time.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tasks: Vec<TaskSpec>,
}

/// One task node in a definition's flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub activity_definition_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub candidate_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub candidate_groups: Vec<String>,
    /// Due date offset from task activation, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_in_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub form_resource_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub form_fields: Vec<FormModelElement>,
}

fn default_priority() -> i32 {
    50
}
