//! Deployments: named, versioned units of process-definition artifacts.

use serde::{Deserialize, Serialize};

use crate::definition::DefinitionSpec;
use crate::timefmt;
use crate::types::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub name: String,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub deployed_at: Option<Timestamp>,
}

/// Request body for creating a deployment.
///
/// The artifacts are JSON definition specs rather than an archive upload;
/// each spec becomes one process definition, versioned per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeployment {
    pub name: String,
    pub definitions: Vec<DefinitionSpec>,
}
