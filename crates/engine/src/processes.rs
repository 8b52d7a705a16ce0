//! Process-instance operations: start, query, delete, plus the tasks,
//! activities and items sub-resources.
//!
//! Starting a process activates the first task of its definition's flow;
//! completing the last task (see `tasks.rs`) completes the process. A
//! deleted instance stays queryable as history with its delete reason,
//! but the runtime instance is gone: a second delete answers 404.

use std::collections::BTreeMap;

use flowgate_core::activity::{Activity, ActivityType};
use flowgate_core::context::RequestContext;
use flowgate_core::error::CoreError;
use flowgate_core::item::Item;
use flowgate_core::ordering::OrderBy;
use flowgate_core::paging::{PagedList, Paging};
use flowgate_core::process::{ProcessInfo, StartProcess};
use flowgate_core::task::{Task, TaskState};
use flowgate_core::types::now;
use flowgate_core::variable::{Variable, VariableValue};
use flowgate_core::where_clause::{Comparator, WhereClause};

use crate::query::{like_match, unsupported_filter, StatusFilter};
use crate::state::{EngineState, StoredProcess, StoredTask};
use crate::WorkflowEngine;

const DELETE_REASON: &str = "deleted through REST API";
const PROCESS_ORDER_FIELDS: &[&str] = &["id", "businessKey", "startedAt", "endedAt", "durationInMs"];
const START_ACTIVITY_ID: &str = "start";
const END_ACTIVITY_ID: &str = "end";

struct ProcessFilter {
    status: StatusFilter,
    business_key: Option<String>,
    business_key_like: Option<String>,
    process_definition_id: Option<String>,
    process_definition_key: Option<String>,
    start_user_id: Option<String>,
    include_variables: bool,
}

impl Default for ProcessFilter {
    fn default() -> Self {
        Self {
            // Process listings are historic: completed instances stay
            // visible unless the caller narrows the status.
            status: StatusFilter::Any,
            business_key: None,
            business_key_like: None,
            process_definition_id: None,
            process_definition_key: None,
            start_user_id: None,
            include_variables: false,
        }
    }
}

impl ProcessFilter {
    fn from_clause(clause: &WhereClause) -> Result<Self, CoreError> {
        let mut filter = ProcessFilter::default();
        for predicate in &clause.predicates {
            let value = predicate.value.clone();
            match (predicate.property.as_str(), predicate.comparator) {
                ("status", Comparator::Equals) => filter.status = StatusFilter::parse(&value)?,
                ("businessKey", Comparator::Equals) => filter.business_key = Some(value),
                ("businessKey", Comparator::Matches) => filter.business_key_like = Some(value),
                ("processDefinitionId", Comparator::Equals) => {
                    filter.process_definition_id = Some(value)
                }
                ("processDefinitionKey", Comparator::Equals) => {
                    filter.process_definition_key = Some(value)
                }
                ("startUserId", Comparator::Equals) => filter.start_user_id = Some(value),
                ("includeProcessVariables", Comparator::Equals) => {
                    filter.include_variables = clause
                        .bool_property("includeProcessVariables")?
                        .unwrap_or(false)
                }
                (property, comparator) => {
                    return Err(unsupported_filter(property, comparator));
                }
            }
        }
        Ok(filter)
    }

    fn accepts(&self, process: &StoredProcess) -> bool {
        self.status.accepts(process.completed)
            && self
                .business_key
                .as_deref()
                .is_none_or(|k| process.business_key.as_deref() == Some(k))
            && self.business_key_like.as_deref().is_none_or(|p| {
                process
                    .business_key
                    .as_deref()
                    .is_some_and(|k| like_match(p, k))
            })
            && self
                .process_definition_id
                .as_deref()
                .is_none_or(|d| d == process.process_definition_id)
            && self
                .process_definition_key
                .as_deref()
                .is_none_or(|k| k == process.process_definition_key)
            && self
                .start_user_id
                .as_deref()
                .is_none_or(|u| u == process.start_user_id)
    }
}

impl WorkflowEngine {
    pub fn start_process(
        &self,
        ctx: &RequestContext,
        body: StartProcess,
    ) -> Result<ProcessInfo, CoreError> {
        let definition_ref = match (&body.process_definition_id, &body.process_definition_key) {
            (Some(_), Some(_)) => {
                return Err(CoreError::Validation(
                    "Only one of processDefinitionId or processDefinitionKey may be specified"
                        .into(),
                ));
            }
            (None, None) => {
                return Err(CoreError::Validation(
                    "Either processDefinitionId or processDefinitionKey must be specified".into(),
                ));
            }
            (Some(id), None) => DefinitionRef::Id(id.clone()),
            (None, Some(key)) => DefinitionRef::Key(key.clone()),
        };

        let mut variables = BTreeMap::new();
        for (name, raw) in &body.variables {
            let value = VariableValue::from_untyped(raw)
                .map_err(|e| CoreError::Validation(e.to_string()))?;
            variables.insert(name.clone(), value);
        }

        let mut state = self.write();
        let process_id = state.next_id();
        let start_activity_id = state.next_id();
        let started_at = now();

        let tenant = state.tenant_mut(ctx)?;
        let definition = match &definition_ref {
            DefinitionRef::Id(id) => tenant.definitions.iter().find(|d| &d.entity.id == id),
            DefinitionRef::Key(key) => tenant
                .definitions
                .iter()
                .filter(|d| &d.entity.key == key)
                .max_by_key(|d| d.entity.version),
        }
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "No process definition could be found for {definition_ref}"
            ))
        })?;

        let mut items = BTreeMap::new();
        for id in &body.items {
            items.insert(
                id.clone(),
                Item {
                    id: id.clone(),
                    added_at: started_at,
                    added_by: ctx.user.clone(),
                },
            );
        }

        let process = StoredProcess {
            id: process_id.clone(),
            process_definition_id: definition.entity.id.clone(),
            process_definition_key: definition.entity.key.clone(),
            process_definition_name: definition.entity.name.clone(),
            business_key: body.business_key.clone(),
            start_user_id: ctx.user.clone(),
            start_activity_id: START_ACTIVITY_ID.into(),
            end_activity_id: None,
            started_at,
            ended_at: None,
            delete_reason: None,
            completed: false,
            variables,
            items,
            activities: vec![Activity {
                id: start_activity_id,
                activity_definition_id: START_ACTIVITY_ID.into(),
                activity_type: ActivityType::StartEvent,
                started_at,
                ended_at: Some(started_at),
            }],
            next_task_index: 0,
        };
        tenant.processes.push(process);

        if !activate_next_task(&mut state, ctx, &process_id)? {
            complete_process(&mut state, ctx, &process_id)?;
        }

        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(&process_id)
            .ok_or_else(|| CoreError::Internal("Started process vanished".into()))?;
        let mut info = process.to_info();
        info.variables = Some(process.variables.clone());
        info.items = Some(process.items.keys().cloned().collect());
        tracing::info!(
            tenant = %ctx.tenant,
            process_id = %process_id,
            definition_id = %info.process_definition_id,
            user = %ctx.user,
            "Process started"
        );
        Ok(info)
    }

    pub fn list_processes(
        &self,
        ctx: &RequestContext,
        clause: Option<&WhereClause>,
        order_by: Option<&OrderBy>,
        paging: &Paging,
    ) -> Result<PagedList<ProcessInfo>, CoreError> {
        paging.validate()?;
        let filter = match clause {
            Some(clause) => ProcessFilter::from_clause(clause)?,
            None => ProcessFilter::default(),
        };
        let state = self.read();
        let tenant = state.tenant(ctx)?;

        let mut matched: Vec<ProcessInfo> = tenant
            .processes
            .iter()
            .filter(|p| tenant.process_visible(ctx, p) && filter.accepts(p))
            .map(|p| {
                let mut info = p.to_info();
                if filter.include_variables {
                    info.process_variables = Some(
                        p.variables
                            .iter()
                            .map(|(name, value)| Variable {
                                name: name.clone(),
                                value: value.clone(),
                            })
                            .collect(),
                    );
                }
                info
            })
            .collect();
        if let Some(order) = order_by {
            order.validate_field(PROCESS_ORDER_FIELDS)?;
            matched.sort_by(|a, b| {
                let ordering = match order.field.as_str() {
                    "businessKey" => a.business_key.cmp(&b.business_key),
                    "startedAt" => a.started_at.cmp(&b.started_at),
                    "endedAt" => a.ended_at.cmp(&b.ended_at),
                    "durationInMs" => a.duration_in_ms.cmp(&b.duration_in_ms),
                    _ => numeric_id(&a.id).cmp(&numeric_id(&b.id)),
                };
                if order.descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        Ok(PagedList::paginate(matched, paging))
    }

    pub fn get_process(&self, ctx: &RequestContext, id: &str) -> Result<ProcessInfo, CoreError> {
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(id)
            .ok_or_else(|| CoreError::not_found("Process", id))?;
        if !tenant.process_visible(ctx, process) {
            return Err(not_permitted(id));
        }
        Ok(process.to_info())
    }

    /// Delete a running instance. The historic record remains, carrying
    /// the delete reason; only the starter or an admin may delete.
    pub fn delete_process(&self, ctx: &RequestContext, id: &str) -> Result<(), CoreError> {
        let mut state = self.write();
        let ended_at = now();
        let tenant = state.tenant_mut(ctx)?;
        let admin = tenant.is_admin(&ctx.user);
        let process = tenant
            .process(id)
            .ok_or_else(|| CoreError::not_found("Process", id))?;
        if !admin && process.start_user_id != ctx.user {
            if tenant.process_visible(ctx, process) {
                return Err(not_permitted(id));
            }
            return Err(CoreError::not_found("Process", id));
        }
        if process.completed {
            // The runtime instance is already gone; only history remains.
            return Err(CoreError::not_found("Process", id));
        }

        for task in tenant.tasks.iter_mut().filter(|t| t.process_id == id) {
            if !task.completed() {
                task.state = TaskState::Completed;
                task.ended_at = Some(ended_at);
            }
        }
        let process = tenant
            .process_mut(id)
            .ok_or_else(|| CoreError::not_found("Process", id))?;
        process.completed = true;
        process.ended_at = Some(ended_at);
        process.delete_reason = Some(DELETE_REASON.into());
        for activity in process.activities.iter_mut() {
            if activity.ended_at.is_none() {
                activity.ended_at = Some(ended_at);
            }
        }
        tracing::info!(tenant = %ctx.tenant, process_id = %id, user = %ctx.user, "Process deleted");
        Ok(())
    }

    pub fn list_process_tasks(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        clause: Option<&WhereClause>,
        paging: &Paging,
    ) -> Result<PagedList<Task>, CoreError> {
        paging.validate()?;
        let mut status = StatusFilter::Active;
        let mut assignee: Option<String> = None;
        if let Some(clause) = clause {
            for predicate in &clause.predicates {
                match (predicate.property.as_str(), predicate.comparator) {
                    ("status", Comparator::Equals) => {
                        status = StatusFilter::parse(&predicate.value)?
                    }
                    ("assignee", Comparator::Equals) => {
                        assignee = Some(predicate.value.clone())
                    }
                    (property, comparator) => {
                        return Err(unsupported_filter(property, comparator));
                    }
                }
            }
        }
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if !tenant.process_visible(ctx, process) {
            return Err(not_permitted(process_id));
        }
        let matched: Vec<Task> = tenant
            .tasks
            .iter()
            .filter(|t| {
                t.process_id == process_id
                    && status.accepts(t.completed())
                    && assignee
                        .as_deref()
                        .is_none_or(|a| t.assignee.as_deref() == Some(a))
            })
            .map(|t| t.to_task())
            .collect();
        Ok(PagedList::paginate(matched, paging))
    }

    pub fn list_activities(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<Activity>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if !tenant.process_visible(ctx, process) {
            return Err(not_permitted(process_id));
        }
        Ok(PagedList::paginate(process.activities.clone(), paging))
    }

    pub fn list_process_items(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<Item>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if !tenant.process_visible(ctx, process) {
            return Err(not_permitted(process_id));
        }
        Ok(PagedList::paginate(
            process.items.values().cloned().collect(),
            paging,
        ))
    }

    pub fn add_process_item(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        item_id: &str,
    ) -> Result<Item, CoreError> {
        let mut state = self.write();
        let added_at = now();
        let tenant = state.tenant_mut(ctx)?;
        let visible = tenant
            .process(process_id)
            .map(|p| tenant.process_visible(ctx, p));
        let user = ctx.user.clone();
        let process = tenant
            .process_mut(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if visible != Some(true) {
            return Err(not_permitted(process_id));
        }
        if process.items.contains_key(item_id) {
            return Err(CoreError::Conflict(format!(
                "An item with id '{item_id}' is already attached"
            )));
        }
        let item = Item {
            id: item_id.to_string(),
            added_at,
            added_by: user,
        };
        process.items.insert(item_id.to_string(), item.clone());
        Ok(item)
    }

    pub fn delete_process_item(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        item_id: &str,
    ) -> Result<(), CoreError> {
        let mut state = self.write();
        let tenant = state.tenant_mut(ctx)?;
        let visible = tenant
            .process(process_id)
            .map(|p| tenant.process_visible(ctx, p));
        let process = tenant
            .process_mut(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if visible != Some(true) {
            return Err(not_permitted(process_id));
        }
        process
            .items
            .remove(item_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("Item", item_id))
    }
}

enum DefinitionRef {
    Id(String),
    Key(String),
}

impl std::fmt::Display for DefinitionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionRef::Id(id) => write!(f, "id '{id}'"),
            DefinitionRef::Key(key) => write!(f, "key '{key}'"),
        }
    }
}

fn not_permitted(id: &str) -> CoreError {
    CoreError::Forbidden(format!(
        "The current user is not permitted to access the process instance {id}"
    ))
}


/// Activate the next task of the process's flow, if any.
///
/// Returns `false` when the flow is exhausted (the caller then completes
/// the process).
pub(crate) fn activate_next_task(
    state: &mut EngineState,
    ctx: &RequestContext,
    process_id: &str,
) -> Result<bool, CoreError> {
    let task_id = state.next_id();
    let activity_id = state.next_id();
    let started_at = now();
    let tenant = state.tenant_mut(ctx)?;

    let (definition_id, definition_key, definition_name, spec_index) = {
        let process = tenant
            .process(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        (
            process.process_definition_id.clone(),
            process.process_definition_key.clone(),
            process.process_definition_name.clone(),
            process.next_task_index,
        )
    };
    let Some(spec) = tenant
        .definition(&definition_id)
        .and_then(|d| d.tasks.get(spec_index))
        .cloned()
    else {
        return Ok(false);
    };

    let task = StoredTask {
        id: task_id.clone(),
        process_id: process_id.to_string(),
        process_definition_id: definition_id,
        process_definition_key: definition_key,
        process_definition_name: definition_name,
        activity_definition_id: spec.activity_definition_id.clone(),
        name: spec.name.clone(),
        description: spec.description.clone(),
        state: if spec.assignee.is_some() {
            TaskState::Claimed
        } else {
            TaskState::Unclaimed
        },
        assignee: spec.assignee.clone(),
        owner: None,
        priority: spec.priority,
        started_at,
        ended_at: None,
        due_at: spec
            .due_in_ms
            .map(|offset| started_at + chrono::Duration::milliseconds(offset)),
        form_resource_key: spec.form_resource_key.clone(),
        candidate_users: spec.candidate_users.iter().cloned().collect(),
        candidate_groups: spec.candidate_groups.iter().cloned().collect(),
        local_variables: BTreeMap::new(),
        items: BTreeMap::new(),
        spec_index,
    };
    let process = tenant
        .process_mut(process_id)
        .ok_or_else(|| CoreError::not_found("Process", process_id))?;
    process.next_task_index = spec_index + 1;
    process.activities.push(Activity {
        id: activity_id,
        activity_definition_id: spec.activity_definition_id.clone(),
        activity_type: ActivityType::UserTask,
        started_at,
        ended_at: None,
    });
    tenant.tasks.push(task);
    tracing::debug!(process_id, task_id = %task_id, "Task activated");
    Ok(true)
}

/// Mark the process completed and record its end event.
pub(crate) fn complete_process(
    state: &mut EngineState,
    ctx: &RequestContext,
    process_id: &str,
) -> Result<(), CoreError> {
    let activity_id = state.next_id();
    let ended_at = now();
    let tenant = state.tenant_mut(ctx)?;
    let process = tenant
        .process_mut(process_id)
        .ok_or_else(|| CoreError::not_found("Process", process_id))?;
    process.completed = true;
    process.ended_at = Some(ended_at);
    process.end_activity_id = Some(END_ACTIVITY_ID.into());
    process.activities.push(Activity {
        id: activity_id,
        activity_definition_id: END_ACTIVITY_ID.into(),
        activity_type: ActivityType::EndEvent,
        started_at: ended_at,
        ended_at: Some(ended_at),
    });
    tracing::debug!(process_id, "Process completed");
    Ok(())
}
