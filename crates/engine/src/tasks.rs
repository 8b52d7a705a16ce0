//! Task operations: the collection query with its full filter grammar,
//! the selective update / state machine, and the candidates, items and
//! form-model sub-resources.
//!
//! Claiming follows optimistic concurrency: a task assigned to somebody
//! else answers 409 with a fixed message, even when the caller would
//! otherwise be eligible through a candidate group.

use std::cmp::Ordering;

use flowgate_core::context::RequestContext;
use flowgate_core::error::CoreError;
use flowgate_core::form::FormModelElement;
use flowgate_core::item::Item;
use flowgate_core::ordering::OrderBy;
use flowgate_core::paging::{PagedList, Paging};
use flowgate_core::task::{
    CandidateType, Task, TaskCandidate, TaskState, UpdateTask, TASK_READ_ONLY_PROPERTIES,
};
use flowgate_core::types::{now, Timestamp};
use flowgate_core::variable::{TaskVariable, VariableScope, VariableValue};
use flowgate_core::where_clause::{Comparator, WhereClause};

use crate::processes::{activate_next_task, complete_process};
use crate::query::{like_match, parse_time_literal, parse_variable_literal, unsupported_filter, StatusFilter};
use crate::state::{StoredProcess, StoredTask, TenantState};
use crate::WorkflowEngine;

pub const CLAIM_CONFLICT: &str = "The task is already claimed by another user.";
pub const CANDIDATE_USER_REQUIRES_ACTIVE: &str =
    "Filtering on candidateUser is only allowed in combination with status-parameter 'active'";
pub const CANDIDATE_GROUP_REQUIRES_ACTIVE: &str =
    "Filtering on candidateGroup is only allowed in combination with status-parameter 'active'";

const TASK_ORDER_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "priority",
    "processId",
    "assignee",
    "startedAt",
    "dueAt",
    "endedAt",
    "durationInMs",
];

const TASK_UPDATABLE_PROPERTIES: &[&str] = &[
    "state",
    "name",
    "description",
    "assignee",
    "owner",
    "priority",
    "dueAt",
];

struct VariablePredicate {
    scope: Option<VariableScope>,
    name: String,
    comparator: Comparator,
    value: VariableValue,
}

struct TaskFilter {
    status: StatusFilter,
    assignee: Option<String>,
    assignee_like: Option<String>,
    owner: Option<String>,
    owner_like: Option<String>,
    candidate_user: Option<String>,
    candidate_group: Option<String>,
    name: Option<String>,
    name_like: Option<String>,
    description: Option<String>,
    description_like: Option<String>,
    priority: Option<i32>,
    priority_ge: Option<i32>,
    priority_le: Option<i32>,
    process_id: Option<String>,
    process_business_key: Option<String>,
    process_business_key_like: Option<String>,
    activity_definition_id: Option<String>,
    process_definition_id: Option<String>,
    process_definition_key: Option<String>,
    process_definition_name: Option<String>,
    started_before: Option<Timestamp>,
    started_after: Option<Timestamp>,
    ended_before: Option<Timestamp>,
    ended_after: Option<Timestamp>,
    due_before: Option<Timestamp>,
    due_after: Option<Timestamp>,
    variable_predicates: Vec<VariablePredicate>,
    include_task_variables: bool,
    include_process_variables: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            // Task listings default to the active working set.
            status: StatusFilter::Active,
            assignee: None,
            assignee_like: None,
            owner: None,
            owner_like: None,
            candidate_user: None,
            candidate_group: None,
            name: None,
            name_like: None,
            description: None,
            description_like: None,
            priority: None,
            priority_ge: None,
            priority_le: None,
            process_id: None,
            process_business_key: None,
            process_business_key_like: None,
            activity_definition_id: None,
            process_definition_id: None,
            process_definition_key: None,
            process_definition_name: None,
            started_before: None,
            started_after: None,
            ended_before: None,
            ended_after: None,
            due_before: None,
            due_after: None,
            variable_predicates: Vec::new(),
            include_task_variables: false,
            include_process_variables: false,
        }
    }
}

fn parse_priority(value: &str) -> Result<i32, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::Validation(format!("Invalid priority value: {value}")))
}

impl TaskFilter {
    fn from_clause(clause: &WhereClause) -> Result<Self, CoreError> {
        let mut filter = TaskFilter::default();
        for predicate in &clause.predicates {
            let value = predicate.value.clone();
            if let Some(rest) = predicate.property.strip_prefix("variables/") {
                filter
                    .variable_predicates
                    .push(parse_variable_predicate(rest, predicate.comparator, &value)?);
                continue;
            }
            match (predicate.property.as_str(), predicate.comparator) {
                ("status", Comparator::Equals) => filter.status = StatusFilter::parse(&value)?,
                ("assignee", Comparator::Equals) => filter.assignee = Some(value),
                ("assignee", Comparator::Matches) => filter.assignee_like = Some(value),
                ("owner", Comparator::Equals) => filter.owner = Some(value),
                ("owner", Comparator::Matches) => filter.owner_like = Some(value),
                ("candidateUser", Comparator::Equals) => filter.candidate_user = Some(value),
                ("candidateGroup", Comparator::Equals) => filter.candidate_group = Some(value),
                ("name", Comparator::Equals) => filter.name = Some(value),
                ("name", Comparator::Matches) => filter.name_like = Some(value),
                ("description", Comparator::Equals) => filter.description = Some(value),
                ("description", Comparator::Matches) => filter.description_like = Some(value),
                ("priority", Comparator::Equals) => filter.priority = Some(parse_priority(&value)?),
                ("priority", Comparator::GreaterThanOrEqual) => {
                    filter.priority_ge = Some(parse_priority(&value)?)
                }
                ("priority", Comparator::LessThanOrEqual) => {
                    filter.priority_le = Some(parse_priority(&value)?)
                }
                ("processId", Comparator::Equals) => filter.process_id = Some(value),
                ("processBusinessKey", Comparator::Equals) => {
                    filter.process_business_key = Some(value)
                }
                ("processBusinessKey", Comparator::Matches) => {
                    filter.process_business_key_like = Some(value)
                }
                ("activityDefinitionId", Comparator::Equals) => {
                    filter.activity_definition_id = Some(value)
                }
                ("processDefinitionId", Comparator::Equals) => {
                    filter.process_definition_id = Some(value)
                }
                ("processDefinitionKey", Comparator::Equals) => {
                    filter.process_definition_key = Some(value)
                }
                ("processDefinitionName", Comparator::Equals) => {
                    filter.process_definition_name = Some(value)
                }
                ("startedAt", Comparator::GreaterThan) => {
                    filter.started_after = Some(parse_time_literal("startedAt", &value)?)
                }
                ("startedAt", Comparator::LessThan) => {
                    filter.started_before = Some(parse_time_literal("startedAt", &value)?)
                }
                ("endedAt", Comparator::GreaterThan) => {
                    filter.ended_after = Some(parse_time_literal("endedAt", &value)?)
                }
                ("endedAt", Comparator::LessThan) => {
                    filter.ended_before = Some(parse_time_literal("endedAt", &value)?)
                }
                ("dueAt", Comparator::GreaterThan) => {
                    filter.due_after = Some(parse_time_literal("dueAt", &value)?)
                }
                ("dueAt", Comparator::LessThan) => {
                    filter.due_before = Some(parse_time_literal("dueAt", &value)?)
                }
                ("includeTaskVariables", Comparator::Equals) => {
                    filter.include_task_variables =
                        clause.bool_property("includeTaskVariables")?.unwrap_or(false)
                }
                ("includeProcessVariables", Comparator::Equals) => {
                    filter.include_process_variables = clause
                        .bool_property("includeProcessVariables")?
                        .unwrap_or(false)
                }
                (property, comparator) => {
                    return Err(unsupported_filter(property, comparator));
                }
            }
        }
        // Candidate filters only make sense against the active working
        // set; combined with completed/any they are rejected outright.
        if filter.status != StatusFilter::Active {
            if filter.candidate_user.is_some() {
                return Err(CoreError::Validation(
                    CANDIDATE_USER_REQUIRES_ACTIVE.into(),
                ));
            }
            if filter.candidate_group.is_some() {
                return Err(CoreError::Validation(
                    CANDIDATE_GROUP_REQUIRES_ACTIVE.into(),
                ));
            }
        }
        Ok(filter)
    }

    fn accepts(&self, tenant: &TenantState, task: &StoredTask, process: &StoredProcess) -> bool {
        self.status.accepts(task.completed())
            && eq_opt(self.assignee.as_deref(), task.assignee.as_deref())
            && like_opt(self.assignee_like.as_deref(), task.assignee.as_deref())
            && eq_opt(self.owner.as_deref(), task.owner.as_deref())
            && like_opt(self.owner_like.as_deref(), task.owner.as_deref())
            && self.candidate_user.as_deref().is_none_or(|user| {
                task.assignee.is_none()
                    && (task.candidate_users.contains(user)
                        || task
                            .candidate_groups
                            .iter()
                            .any(|g| tenant.group_member(g, user)))
            })
            && self.candidate_group.as_deref().is_none_or(|group| {
                task.assignee.is_none() && task.candidate_groups.contains(group)
            })
            && self.name.as_deref().is_none_or(|n| n == task.name)
            && self
                .name_like
                .as_deref()
                .is_none_or(|p| like_match(p, &task.name))
            && eq_opt(self.description.as_deref(), task.description.as_deref())
            && like_opt(self.description_like.as_deref(), task.description.as_deref())
            && self.priority.is_none_or(|p| p == task.priority)
            && self.priority_ge.is_none_or(|p| task.priority >= p)
            && self.priority_le.is_none_or(|p| task.priority <= p)
            && self.process_id.as_deref().is_none_or(|p| p == task.process_id)
            && eq_opt(
                self.process_business_key.as_deref(),
                process.business_key.as_deref(),
            )
            && like_opt(
                self.process_business_key_like.as_deref(),
                process.business_key.as_deref(),
            )
            && self
                .activity_definition_id
                .as_deref()
                .is_none_or(|a| a == task.activity_definition_id)
            && self
                .process_definition_id
                .as_deref()
                .is_none_or(|d| d == task.process_definition_id)
            && self
                .process_definition_key
                .as_deref()
                .is_none_or(|k| k == task.process_definition_key)
            && self
                .process_definition_name
                .as_deref()
                .is_none_or(|n| n == task.process_definition_name)
            && self.started_after.is_none_or(|t| task.started_at > t)
            && self.started_before.is_none_or(|t| task.started_at < t)
            && self
                .ended_after
                .is_none_or(|t| task.ended_at.is_some_and(|e| e > t))
            && self
                .ended_before
                .is_none_or(|t| task.ended_at.is_some_and(|e| e < t))
            && self
                .due_after
                .is_none_or(|t| task.due_at.is_some_and(|d| d > t))
            && self
                .due_before
                .is_none_or(|t| task.due_at.is_some_and(|d| d < t))
            && self.variables_match(task, process)
    }

    fn variables_match(&self, task: &StoredTask, process: &StoredProcess) -> bool {
        self.variable_predicates.iter().all(|vp| {
            let actual = match vp.scope {
                Some(VariableScope::Local) => task.local_variables.get(&vp.name),
                Some(VariableScope::Global) => process.variables.get(&vp.name),
                None => task
                    .local_variables
                    .get(&vp.name)
                    .or_else(|| process.variables.get(&vp.name)),
            };
            let Some(actual) = actual else {
                return false;
            };
            match vp.comparator {
                Comparator::Equals => actual.compare(&vp.value) == Some(Ordering::Equal),
                Comparator::GreaterThan => {
                    actual.compare(&vp.value) == Some(Ordering::Greater)
                }
                Comparator::GreaterThanOrEqual => matches!(
                    actual.compare(&vp.value),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                ),
                Comparator::LessThan => actual.compare(&vp.value) == Some(Ordering::Less),
                Comparator::LessThanOrEqual => matches!(
                    actual.compare(&vp.value),
                    Some(Ordering::Less) | Some(Ordering::Equal)
                ),
                Comparator::Matches => match (actual, &vp.value) {
                    (VariableValue::Text(actual), VariableValue::Text(pattern)) => {
                        like_match(pattern, actual)
                    }
                    _ => false,
                },
            }
        })
    }
}

fn parse_variable_predicate(
    rest: &str,
    comparator: Comparator,
    value: &str,
) -> Result<VariablePredicate, CoreError> {
    let (scope, name) = match rest.split_once('/') {
        Some((scope, name)) => (Some(VariableScope::parse(scope)?), name),
        None => (None, rest),
    };
    if name.is_empty() {
        return Err(CoreError::Validation(
            "A variable name is required in a variables/ filter".into(),
        ));
    }
    let value = parse_variable_literal(value).map_err(|e| CoreError::Validation(e.to_string()))?;
    Ok(VariablePredicate {
        scope,
        name: name.to_string(),
        comparator,
        value,
    })
}

fn eq_opt(filter: Option<&str>, actual: Option<&str>) -> bool {
    filter.is_none_or(|f| actual == Some(f))
}

fn like_opt(pattern: Option<&str>, actual: Option<&str>) -> bool {
    pattern.is_none_or(|p| actual.is_some_and(|a| like_match(p, a)))
}

fn not_permitted(id: &str) -> CoreError {
    CoreError::Forbidden(format!(
        "The current user is not permitted to access the task {id}"
    ))
}

impl WorkflowEngine {
    pub fn list_tasks(
        &self,
        ctx: &RequestContext,
        clause: Option<&WhereClause>,
        order_by: Option<&OrderBy>,
        paging: &Paging,
    ) -> Result<PagedList<Task>, CoreError> {
        paging.validate()?;
        let filter = match clause {
            Some(clause) => TaskFilter::from_clause(clause)?,
            None => TaskFilter::default(),
        };
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let admin = tenant.is_admin(&ctx.user);

        let mut matched: Vec<Task> = Vec::new();
        for task in &tenant.tasks {
            if !admin && !tenant.task_participant(ctx, task) {
                continue;
            }
            let Some(process) = tenant.process(&task.process_id) else {
                continue;
            };
            if !filter.accepts(tenant, task, process) {
                continue;
            }
            let mut entity = task.to_task();
            if filter.include_task_variables || filter.include_process_variables {
                let mut variables: Vec<TaskVariable> = Vec::new();
                if filter.include_task_variables {
                    variables.extend(task.local_variables.iter().map(|(name, value)| {
                        TaskVariable {
                            scope: VariableScope::Local,
                            name: name.clone(),
                            value: value.clone(),
                        }
                    }));
                }
                if filter.include_process_variables {
                    variables.extend(process.variables.iter().map(|(name, value)| {
                        TaskVariable {
                            scope: VariableScope::Global,
                            name: name.clone(),
                            value: value.clone(),
                        }
                    }));
                }
                entity.variables = Some(variables);
            }
            matched.push(entity);
        }

        if let Some(order) = order_by {
            order.validate_field(TASK_ORDER_FIELDS)?;
            matched.sort_by(|a, b| {
                let ordering = match order.field.as_str() {
                    "name" => a.name.cmp(&b.name),
                    "description" => a.description.cmp(&b.description),
                    "priority" => a.priority.cmp(&b.priority),
                    "processId" => numeric_id(&a.process_id).cmp(&numeric_id(&b.process_id)),
                    "assignee" => a.assignee.cmp(&b.assignee),
                    "startedAt" => a.started_at.cmp(&b.started_at),
                    "dueAt" => a.due_at.cmp(&b.due_at),
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

    pub fn get_task(&self, ctx: &RequestContext, id: &str) -> Result<Task, CoreError> {
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(id)
            .ok_or_else(|| CoreError::not_found("Task", id))?;
        self.check_task_access(tenant, ctx, task)?;
        Ok(task.to_task())
    }

    /// Apply a selective update or a state transition.
    ///
    /// With a `select` list only the named properties apply and read-only
    /// names are rejected; without one every non-null body field applies.
    /// A selected `state` drives the task lifecycle instead.
    pub fn update_task(
        &self,
        ctx: &RequestContext,
        id: &str,
        body: UpdateTask,
        select: Option<&[String]>,
    ) -> Result<Task, CoreError> {
        if let Some(selected) = select {
            for name in selected {
                if TASK_READ_ONLY_PROPERTIES.contains(&name.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "The property '{name}' cannot be updated"
                    )));
                }
                if !TASK_UPDATABLE_PROPERTIES.contains(&name.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "'{name}' is not a valid task property"
                    )));
                }
            }
        }
        let selected = |name: &str| match select {
            Some(names) => names.iter().any(|n| n == name),
            None => true,
        };
        let wants_transition = match select {
            Some(_) => {
                if selected("state") && body.state.is_none() {
                    return Err(CoreError::Validation(
                        "Task state is missing from the message body".into(),
                    ));
                }
                selected("state")
            }
            None => body.state.is_some(),
        };

        let mut state = self.write();
        let ended_at = now();
        let tenant = state.tenant_mut(ctx)?;
        let admin = tenant.is_admin(&ctx.user);

        let (participant, starter) = {
            let task = tenant
                .task(id)
                .ok_or_else(|| CoreError::not_found("Task", id))?;
            if task.completed() {
                // Completed tasks left the runtime; only history remains.
                return Err(CoreError::not_found("Task", id));
            }
            let starter = tenant
                .process(&task.process_id)
                .is_some_and(|p| p.start_user_id == ctx.user);
            (tenant.task_participant(ctx, task), starter)
        };
        if !(admin || participant || starter) {
            return Err(not_permitted(id));
        }

        let mut advance_process: Option<String> = None;
        {
            let user = ctx.user.clone();
            let task = tenant
                .task_mut(id)
                .ok_or_else(|| CoreError::not_found("Task", id))?;

            if wants_transition {
                let target = body.state.ok_or_else(|| {
                    CoreError::Validation("Task state is missing from the message body".into())
                })?;
                match target {
                    TaskState::Claimed => {
                        if let Some(assignee) = &task.assignee {
                            if assignee != &user {
                                return Err(CoreError::Conflict(CLAIM_CONFLICT.into()));
                            }
                        }
                        task.assignee = Some(user.clone());
                        task.state = TaskState::Claimed;
                    }
                    TaskState::Unclaimed => {
                        task.assignee = None;
                        task.state = TaskState::Unclaimed;
                    }
                    TaskState::Delegated => {
                        let delegate = body.assignee.clone().ok_or_else(|| {
                            CoreError::Validation(
                                "An assignee is required to delegate a task".into(),
                            )
                        })?;
                        task.owner = task
                            .owner
                            .clone()
                            .or_else(|| task.assignee.clone())
                            .or_else(|| Some(user.clone()));
                        task.assignee = Some(delegate);
                        task.state = TaskState::Delegated;
                    }
                    TaskState::Resolved => {
                        task.assignee = task.owner.clone().or_else(|| task.assignee.clone());
                        task.state = TaskState::Resolved;
                    }
                    TaskState::Completed => {
                        if let Some(assignee) = &task.assignee {
                            if assignee != &user
                                && !admin
                                && task.owner.as_deref() != Some(user.as_str())
                            {
                                return Err(CoreError::Forbidden(
                                    "The task is assigned to a different user".into(),
                                ));
                            }
                        }
                        task.state = TaskState::Completed;
                        task.ended_at = Some(ended_at);
                        advance_process = Some(task.process_id.clone());
                    }
                }
            }

            if selected("name") {
                if let Some(name) = &body.name {
                    task.name = name.clone();
                }
            }
            if selected("description") {
                if let Some(description) = &body.description {
                    task.description = Some(description.clone());
                }
            }
            if selected("assignee") && !wants_transition {
                if let Some(assignee) = &body.assignee {
                    task.assignee = Some(assignee.clone());
                }
            }
            if selected("owner") {
                if let Some(owner) = &body.owner {
                    task.owner = Some(owner.clone());
                }
            }
            if selected("priority") {
                if let Some(priority) = body.priority {
                    task.priority = priority;
                }
            }
            if selected("dueAt") {
                if let Some(due_at) = body.due_at {
                    task.due_at = Some(due_at);
                }
            }
        }

        if let Some(process_id) = &advance_process {
            // Close the task's activity before moving the flow along.
            let activity_definition_id = tenant
                .task(id)
                .map(|t| t.activity_definition_id.clone())
                .ok_or_else(|| CoreError::not_found("Task", id))?;
            if let Some(process) = tenant.process_mut(process_id) {
                if let Some(activity) = process
                    .activities
                    .iter_mut()
                    .find(|a| a.activity_definition_id == activity_definition_id && a.ended_at.is_none())
                {
                    activity.ended_at = Some(ended_at);
                }
            }
            if !activate_next_task(&mut state, ctx, process_id)? {
                complete_process(&mut state, ctx, process_id)?;
            }
        }

        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(id)
            .ok_or_else(|| CoreError::not_found("Task", id))?;
        tracing::info!(tenant = %ctx.tenant, task_id = %id, user = %ctx.user, "Task updated");
        Ok(task.to_task())
    }

    pub fn list_task_candidates(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<TaskCandidate>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        self.check_task_access(tenant, ctx, task)?;
        let mut candidates: Vec<TaskCandidate> = task
            .candidate_users
            .iter()
            .map(|u| TaskCandidate {
                candidate_type: CandidateType::User,
                candidate_id: u.clone(),
            })
            .collect();
        candidates.extend(task.candidate_groups.iter().map(|g| TaskCandidate {
            candidate_type: CandidateType::Group,
            candidate_id: g.clone(),
        }));
        Ok(PagedList::paginate(candidates, paging))
    }

    pub fn task_form_model(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<FormModelElement>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        self.check_task_access(tenant, ctx, task)?;
        let fields = tenant
            .definition(&task.process_definition_id)
            .and_then(|d| d.tasks.get(task.spec_index))
            .map(|spec| spec.form_fields.clone())
            .unwrap_or_default();
        Ok(PagedList::paginate(fields, paging))
    }

    pub fn list_task_items(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<Item>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        self.check_task_access(tenant, ctx, task)?;
        Ok(PagedList::paginate(
            task.items.values().cloned().collect(),
            paging,
        ))
    }

    pub fn add_task_item(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        item_id: &str,
    ) -> Result<Item, CoreError> {
        let mut state = self.write();
        let added_at = now();
        let tenant = state.tenant_mut(ctx)?;
        let access = tenant
            .task(task_id)
            .map(|t| self.task_accessible(tenant, ctx, t));
        let user = ctx.user.clone();
        let task = tenant
            .task_mut(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        if access != Some(true) {
            return Err(not_permitted(task_id));
        }
        if task.items.contains_key(item_id) {
            return Err(CoreError::Conflict(format!(
                "An item with id '{item_id}' is already attached"
            )));
        }
        let item = Item {
            id: item_id.to_string(),
            added_at,
            added_by: user,
        };
        task.items.insert(item_id.to_string(), item.clone());
        Ok(item)
    }

    pub fn delete_task_item(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        item_id: &str,
    ) -> Result<(), CoreError> {
        let mut state = self.write();
        let tenant = state.tenant_mut(ctx)?;
        let access = tenant
            .task(task_id)
            .map(|t| self.task_accessible(tenant, ctx, t));
        let task = tenant
            .task_mut(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        if access != Some(true) {
            return Err(not_permitted(task_id));
        }
        task.items
            .remove(item_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("Item", item_id))
    }

    fn task_accessible(&self, tenant: &TenantState, ctx: &RequestContext, task: &StoredTask) -> bool {
        tenant.is_admin(&ctx.user)
            || tenant.task_participant(ctx, task)
            || tenant
                .process(&task.process_id)
                .is_some_and(|p| p.start_user_id == ctx.user)
    }

    pub(crate) fn check_task_access(
        &self,
        tenant: &TenantState,
        ctx: &RequestContext,
        task: &StoredTask,
    ) -> Result<(), CoreError> {
        if self.task_accessible(tenant, ctx, task) {
            Ok(())
        } else {
            Err(not_permitted(&task.id))
        }
    }
}

