//! Content items attached to a process or task.

use serde::{Deserialize, Serialize};

use crate::timefmt;
use crate::types::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Identifier of the attached content (a node reference).
    pub id: String,
    #[serde(with = "timefmt::wire_date")]
    pub added_at: Timestamp,
    pub added_by: String,
}

/// Request body for attaching an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub id: String,
}
