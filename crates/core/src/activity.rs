//! Activities recorded while a process instance executes.

use serde::{Deserialize, Serialize};

use crate::timefmt;
use crate::types::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub activity_definition_id: String,
    pub activity_type: ActivityType,
    #[serde(with = "timefmt::wire_date")]
    pub started_at: Timestamp,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub ended_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    StartEvent,
    UserTask,
    EndEvent,
}
