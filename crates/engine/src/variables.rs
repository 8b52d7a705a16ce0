//! Variable operations on processes (global scope) and tasks (local
//! scope, with write-through to the process for `scope: global`).

use flowgate_core::context::RequestContext;
use flowgate_core::error::CoreError;
use flowgate_core::paging::{PagedList, Paging};
use flowgate_core::variable::{TaskVariable, Variable, VariablePayload, VariableScope};
use flowgate_core::where_clause::{Comparator, WhereClause};

use crate::query::unsupported_filter;
use crate::WorkflowEngine;

impl WorkflowEngine {
    pub fn list_process_variables(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<Variable>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let process = tenant
            .process(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if !tenant.process_visible(ctx, process) {
            return Err(CoreError::Forbidden(format!(
                "The current user is not permitted to access the process instance {process_id}"
            )));
        }
        let variables: Vec<Variable> = process
            .variables
            .iter()
            .map(|(name, value)| Variable {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        Ok(PagedList::paginate(variables, paging))
    }

    /// Create or update one process variable.
    pub fn set_process_variable(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        payload: &VariablePayload,
        path_name: Option<&str>,
    ) -> Result<Variable, CoreError> {
        let (name, value) = payload.resolve(path_name)?;
        let mut state = self.write();
        let tenant = state.tenant_mut(ctx)?;
        let visible = tenant
            .process(process_id)
            .map(|p| tenant.process_visible(ctx, p));
        let process = tenant
            .process_mut(process_id)
            .ok_or_else(|| CoreError::not_found("Process", process_id))?;
        if visible != Some(true) {
            return Err(CoreError::Forbidden(format!(
                "The current user is not permitted to access the process instance {process_id}"
            )));
        }
        process.variables.insert(name.clone(), value.clone());
        tracing::debug!(process_id, variable = %name, "Process variable set");
        Ok(Variable { name, value })
    }

    /// Create or update a batch of process variables in one call.
    pub fn set_process_variables(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        payloads: &[VariablePayload],
    ) -> Result<Vec<Variable>, CoreError> {
        payloads
            .iter()
            .map(|p| self.set_process_variable(ctx, process_id, p, None))
            .collect()
    }

    pub fn delete_process_variable(
        &self,
        ctx: &RequestContext,
        process_id: &str,
        name: &str,
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
            return Err(CoreError::Forbidden(format!(
                "The current user is not permitted to access the process instance {process_id}"
            )));
        }
        process
            .variables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("Variable", name))
    }

    /// Task variables: the task's local scope first, then the globals of
    /// its process. A `(scope = '...')` where clause narrows the listing.
    pub fn list_task_variables(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        clause: Option<&WhereClause>,
        paging: &Paging,
    ) -> Result<PagedList<TaskVariable>, CoreError> {
        paging.validate()?;
        let mut scope: Option<VariableScope> = None;
        if let Some(clause) = clause {
            for predicate in &clause.predicates {
                match (predicate.property.as_str(), predicate.comparator) {
                    ("scope", Comparator::Equals) => {
                        scope = Some(VariableScope::parse(&predicate.value)?)
                    }
                    (property, comparator) => {
                        return Err(unsupported_filter(property, comparator));
                    }
                }
            }
        }
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let task = tenant
            .task(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        self.check_task_access(tenant, ctx, task)?;
        let process = tenant
            .process(&task.process_id)
            .ok_or_else(|| CoreError::not_found("Process", &*task.process_id))?;
        let variables: Vec<TaskVariable> = task
            .scoped_variables(process)
            .into_iter()
            .filter(|v| scope.is_none_or(|s| v.scope == s))
            .collect();
        Ok(PagedList::paginate(variables, paging))
    }

    /// Create or update one task variable. `scope: global` writes through
    /// to the owning process.
    pub fn set_task_variable(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        payload: &VariablePayload,
        path_name: Option<&str>,
    ) -> Result<TaskVariable, CoreError> {
        let (name, value) = payload.resolve(path_name)?;
        let scope = payload.scope.unwrap_or(VariableScope::Local);
        let mut state = self.write();
        let tenant = state.tenant_mut(ctx)?;
        let process_id = {
            let task = tenant
                .task(task_id)
                .ok_or_else(|| CoreError::not_found("Task", task_id))?;
            self.check_task_access(tenant, ctx, task)?;
            task.process_id.clone()
        };
        match scope {
            VariableScope::Local => {
                let task = tenant
                    .task_mut(task_id)
                    .ok_or_else(|| CoreError::not_found("Task", task_id))?;
                task.local_variables.insert(name.clone(), value.clone());
            }
            VariableScope::Global => {
                let process = tenant
                    .process_mut(&process_id)
                    .ok_or_else(|| CoreError::not_found("Process", &*process_id))?;
                process.variables.insert(name.clone(), value.clone());
            }
        }
        tracing::debug!(task_id, variable = %name, scope = scope.as_str(), "Task variable set");
        Ok(TaskVariable { scope, name, value })
    }

    pub fn set_task_variables(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        payloads: &[VariablePayload],
    ) -> Result<Vec<TaskVariable>, CoreError> {
        payloads
            .iter()
            .map(|p| self.set_task_variable(ctx, task_id, p, None))
            .collect()
    }

    /// Remove a local task variable. Globals are owned by the process and
    /// are not deletable through the task resource.
    pub fn delete_task_variable(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        name: &str,
    ) -> Result<(), CoreError> {
        let mut state = self.write();
        let tenant = state.tenant_mut(ctx)?;
        {
            let task = tenant
                .task(task_id)
                .ok_or_else(|| CoreError::not_found("Task", task_id))?;
            self.check_task_access(tenant, ctx, task)?;
        }
        let task = tenant
            .task_mut(task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        task.local_variables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("Variable", name))
    }
}
