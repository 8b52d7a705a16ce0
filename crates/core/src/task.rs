//! Tasks: units of work within a process instance.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::timefmt;
use crate::types::Timestamp;
use crate::variable::TaskVariable;

/// Lifecycle state of a task.
///
/// `claimed`/`unclaimed` describe assignment; `delegated`/`resolved` track
/// the hand-off loop between an owner and a delegate; `completed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Unclaimed,
    Claimed,
    Completed,
    Delegated,
    Resolved,
}

impl TaskState {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "unclaimed" => Ok(TaskState::Unclaimed),
            "claimed" => Ok(TaskState::Claimed),
            "completed" => Ok(TaskState::Completed),
            "delegated" => Ok(TaskState::Delegated),
            "resolved" => Ok(TaskState::Resolved),
            other => Err(CoreError::Validation(format!(
                "Invalid task state: '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub process_id: String,
    pub process_definition_id: String,
    pub activity_definition_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<String>,
    pub priority: i32,
    #[serde(with = "timefmt::wire_date")]
    pub started_at: Timestamp,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub ended_at: Option<Timestamp>,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub due_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_in_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub form_resource_key: Option<String>,
    /// Present only when requested via `includeTaskVariables`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variables: Option<Vec<TaskVariable>>,
}

/// Selective task update body (`PUT /tasks/{id}`).
///
/// With a `select` list only the named fields apply; without one, every
/// non-null body field applies. Naming a read-only field in `select` is a
/// validation error. A `state` field requests a lifecycle transition
/// instead of a plain field update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub priority: Option<i32>,
    #[serde(
        with = "timefmt::wire_date_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub due_at: Option<Timestamp>,
}

/// Fields that can never be written through a task update.
pub const TASK_READ_ONLY_PROPERTIES: &[&str] = &[
    "id",
    "processId",
    "processDefinitionId",
    "activityDefinitionId",
    "startedAt",
    "endedAt",
    "durationInMs",
    "formResourceKey",
];

/// A user or group eligible to claim a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCandidate {
    pub candidate_type: CandidateType,
    pub candidate_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateType {
    User,
    Group,
}
