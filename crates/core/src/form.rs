//! Form model elements returned by the start-form-model and
//! task-form-model sub-resources.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormModelElement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qualified_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub allowed_values: Vec<String>,
}

fn default_data_type() -> String {
    "d:text".into()
}
