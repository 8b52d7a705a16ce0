//! Internal engine state: per-tenant stores plus the engine-wide id
//! sequence.
//!
//! Ids are drawn from one sequence across all tenants, so an id from
//! another tenant is a real id that simply does not resolve inside the
//! caller's tenant -- lookups answer "not found" without revealing
//! whether the resource exists elsewhere.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use flowgate_core::activity::Activity;
use flowgate_core::context::RequestContext;
use flowgate_core::definition::{ProcessDefinition, TaskSpec};
use flowgate_core::deployment::Deployment;
use flowgate_core::error::CoreError;
use flowgate_core::form::FormModelElement;
use flowgate_core::item::Item;
use flowgate_core::process::ProcessInfo;
use flowgate_core::task::{Task, TaskState};
use flowgate_core::types::Timestamp;
use flowgate_core::variable::{TaskVariable, VariableScope, VariableValue};

#[derive(Default)]
pub(crate) struct EngineState {
    id_seq: u64,
    pub tenants: HashMap<String, TenantState>,
}

impl EngineState {
    pub fn next_id(&mut self) -> String {
        self.id_seq += 1;
        self.id_seq.to_string()
    }

    pub fn tenant(&self, ctx: &RequestContext) -> Result<&TenantState, CoreError> {
        self.tenants
            .get(&ctx.tenant)
            .ok_or_else(|| CoreError::Unauthorized(format!("Unknown tenant: {}", ctx.tenant)))
    }

    pub fn tenant_mut(&mut self, ctx: &RequestContext) -> Result<&mut TenantState, CoreError> {
        self.tenants
            .get_mut(&ctx.tenant)
            .ok_or_else(|| CoreError::Unauthorized(format!("Unknown tenant: {}", ctx.tenant)))
    }

    pub fn ensure_tenant(&mut self, tenant: &str) -> &mut TenantState {
        self.tenants.entry(tenant.to_string()).or_default()
    }
}

pub(crate) struct UserRecord {
    pub password: String,
    pub admin: bool,
}

#[derive(Default)]
pub(crate) struct TenantState {
    pub users: HashMap<String, UserRecord>,
    pub groups: HashMap<String, BTreeSet<String>>,
    pub deployments: Vec<Deployment>,
    pub definitions: Vec<StoredDefinition>,
    pub processes: Vec<StoredProcess>,
    pub tasks: Vec<StoredTask>,
}

impl TenantState {
    pub fn is_admin(&self, user: &str) -> bool {
        self.users.get(user).is_some_and(|u| u.admin)
    }

    pub fn group_member(&self, group: &str, user: &str) -> bool {
        self.groups.get(group).is_some_and(|m| m.contains(user))
    }

    pub fn definition(&self, id: &str) -> Option<&StoredDefinition> {
        self.definitions.iter().find(|d| d.entity.id == id)
    }

    pub fn process(&self, id: &str) -> Option<&StoredProcess> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn process_mut(&mut self, id: &str) -> Option<&mut StoredProcess> {
        self.processes.iter_mut().find(|p| p.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&StoredTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut StoredTask> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Whether `ctx.user` participates in the task directly or through a
    /// candidate group.
    pub fn task_participant(&self, ctx: &RequestContext, task: &StoredTask) -> bool {
        task.assignee.as_deref() == Some(ctx.user.as_str())
            || task.owner.as_deref() == Some(ctx.user.as_str())
            || task.candidate_users.contains(&ctx.user)
            || task
                .candidate_groups
                .iter()
                .any(|g| self.group_member(g, &ctx.user))
    }

    /// Whether `ctx.user` may see the process: its starter, a participant
    /// in one of its tasks, or a tenant admin.
    pub fn process_visible(&self, ctx: &RequestContext, process: &StoredProcess) -> bool {
        if self.is_admin(&ctx.user) || process.start_user_id == ctx.user {
            return true;
        }
        self.tasks
            .iter()
            .filter(|t| t.process_id == process.id)
            .any(|t| self.task_participant(ctx, t))
    }
}

pub(crate) struct StoredDefinition {
    pub entity: ProcessDefinition,
    pub start_form_fields: Vec<FormModelElement>,
    pub tasks: Vec<TaskSpec>,
}

pub(crate) struct StoredProcess {
    pub id: String,
    pub process_definition_id: String,
    pub process_definition_key: String,
    pub process_definition_name: String,
    pub business_key: Option<String>,
    pub start_user_id: String,
    pub start_activity_id: String,
    pub end_activity_id: Option<String>,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub delete_reason: Option<String>,
    pub completed: bool,
    pub variables: BTreeMap<String, VariableValue>,
    pub items: BTreeMap<String, Item>,
    pub activities: Vec<Activity>,
    /// Index into the definition's task list of the next task to activate.
    pub next_task_index: usize,
}

impl StoredProcess {
    pub fn duration_in_ms(&self) -> Option<i64> {
        self.ended_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    pub fn to_info(&self) -> ProcessInfo {
        ProcessInfo {
            id: self.id.clone(),
            process_definition_id: self.process_definition_id.clone(),
            process_definition_key: self.process_definition_key.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_in_ms: self.duration_in_ms(),
            delete_reason: self.delete_reason.clone(),
            business_key: self.business_key.clone(),
            super_process_instance_id: None,
            start_activity_id: self.start_activity_id.clone(),
            start_user_id: self.start_user_id.clone(),
            end_activity_id: self.end_activity_id.clone(),
            completed: self.completed,
            variables: None,
            items: None,
            process_variables: None,
        }
    }
}

pub(crate) struct StoredTask {
    pub id: String,
    pub process_id: String,
    pub process_definition_id: String,
    pub process_definition_key: String,
    pub process_definition_name: String,
    pub activity_definition_id: String,
    pub name: String,
    pub description: Option<String>,
    pub state: TaskState,
    pub assignee: Option<String>,
    pub owner: Option<String>,
    pub priority: i32,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub due_at: Option<Timestamp>,
    pub form_resource_key: Option<String>,
    pub candidate_users: BTreeSet<String>,
    pub candidate_groups: BTreeSet<String>,
    pub local_variables: BTreeMap<String, VariableValue>,
    pub items: BTreeMap<String, Item>,
    /// Index of this task in the definition's task list.
    pub spec_index: usize,
}

impl StoredTask {
    pub fn completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn duration_in_ms(&self) -> Option<i64> {
        self.ended_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    pub fn to_task(&self) -> Task {
        Task {
            id: self.id.clone(),
            process_id: self.process_id.clone(),
            process_definition_id: self.process_definition_id.clone(),
            activity_definition_id: self.activity_definition_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            state: self.state,
            assignee: self.assignee.clone(),
            owner: self.owner.clone(),
            priority: self.priority,
            started_at: self.started_at,
            ended_at: self.ended_at,
            due_at: self.due_at,
            duration_in_ms: self.duration_in_ms(),
            form_resource_key: self.form_resource_key.clone(),
            variables: None,
        }
    }

    /// Local variables first, then the process-global ones.
    pub fn scoped_variables(&self, process: &StoredProcess) -> Vec<TaskVariable> {
        let mut out: Vec<TaskVariable> = self
            .local_variables
            .iter()
            .map(|(name, value)| TaskVariable {
                scope: VariableScope::Local,
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        out.extend(process.variables.iter().map(|(name, value)| TaskVariable {
            scope: VariableScope::Global,
            name: name.clone(),
            value: value.clone(),
        }));
        out
    }
}
