//! Client for the tasks resource and its sub-resources.

use flowgate_core::form::FormModelElement;
use flowgate_core::item::{Item, NewItem};
use flowgate_core::paging::PagedList;
use flowgate_core::task::{Task, TaskCandidate, TaskState, UpdateTask};
use flowgate_core::variable::{TaskVariable, VariablePayload};

use crate::list::{parse_entry, parse_paged_list};
use crate::{ClientError, Credentials, ListParams, WorkflowClient};

pub struct TasksClient<'a> {
    client: &'a WorkflowClient,
}

impl<'a> TasksClient<'a> {
    pub(crate) fn new(client: &'a WorkflowClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        creds: &Credentials,
        params: &ListParams,
    ) -> Result<PagedList<Task>, ClientError> {
        let body = self.client.get(creds, "tasks", &params.to_query()).await?;
        parse_paged_list(&body)
    }

    pub async fn get(&self, creds: &Credentials, id: &str) -> Result<Task, ClientError> {
        let body = self.client.get(creds, &format!("tasks/{id}"), &[]).await?;
        parse_entry(&body)
    }

    /// Selective update: only the properties named in `select` apply.
    /// With an empty `select`, every non-null body field applies.
    pub async fn update(
        &self,
        creds: &Credentials,
        id: &str,
        body: &UpdateTask,
        select: &[&str],
    ) -> Result<Task, ClientError> {
        let query: Vec<(&str, String)> = if select.is_empty() {
            Vec::new()
        } else {
            vec![("select", select.join(","))]
        };
        let response = self
            .client
            .put(creds, &format!("tasks/{id}"), &query, body)
            .await?;
        parse_entry(&response)
    }

    /// Claim the task for the acting user.
    pub async fn claim(&self, creds: &Credentials, id: &str) -> Result<Task, ClientError> {
        self.transition(creds, id, TaskState::Claimed, None).await
    }

    /// Return the task to its candidates.
    pub async fn unclaim(&self, creds: &Credentials, id: &str) -> Result<Task, ClientError> {
        self.transition(creds, id, TaskState::Unclaimed, None).await
    }

    /// Complete the task, advancing its process.
    pub async fn complete(&self, creds: &Credentials, id: &str) -> Result<Task, ClientError> {
        self.transition(creds, id, TaskState::Completed, None).await
    }

    /// Delegate the task to another user.
    pub async fn delegate(
        &self,
        creds: &Credentials,
        id: &str,
        assignee: &str,
    ) -> Result<Task, ClientError> {
        self.transition(creds, id, TaskState::Delegated, Some(assignee.to_string()))
            .await
    }

    /// Resolve a delegated task back to its owner.
    pub async fn resolve(&self, creds: &Credentials, id: &str) -> Result<Task, ClientError> {
        self.transition(creds, id, TaskState::Resolved, None).await
    }

    async fn transition(
        &self,
        creds: &Credentials,
        id: &str,
        state: TaskState,
        assignee: Option<String>,
    ) -> Result<Task, ClientError> {
        let select = if assignee.is_some() {
            &["state", "assignee"][..]
        } else {
            &["state"][..]
        };
        let body = UpdateTask {
            state: Some(state),
            assignee,
            ..UpdateTask::default()
        };
        self.update(creds, id, &body, select).await
    }

    pub async fn candidates(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<TaskCandidate>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("tasks/{id}/candidates"), &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn task_form_model(
        &self,
        creds: &Credentials,
        id: &str,
    ) -> Result<PagedList<FormModelElement>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("tasks/{id}/task-form-model"), &[])
            .await?;
        parse_paged_list(&body)
    }

    pub async fn variables(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<TaskVariable>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("tasks/{id}/variables"), &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    /// Create or update one variable (`POST` on the collection).
    pub async fn create_variable(
        &self,
        creds: &Credentials,
        id: &str,
        payload: &VariablePayload,
    ) -> Result<TaskVariable, ClientError> {
        let response = self
            .client
            .post(creds, &format!("tasks/{id}/variables"), payload)
            .await?;
        parse_entry(&response)
    }

    /// Create or update a batch of variables in one call.
    pub async fn create_variables(
        &self,
        creds: &Credentials,
        id: &str,
        payloads: &[VariablePayload],
    ) -> Result<PagedList<TaskVariable>, ClientError> {
        let response = self
            .client
            .post(creds, &format!("tasks/{id}/variables"), &payloads)
            .await?;
        parse_paged_list(&response)
    }

    /// Update one variable by name (`PUT` on the singleton).
    pub async fn update_variable(
        &self,
        creds: &Credentials,
        id: &str,
        name: &str,
        payload: &VariablePayload,
    ) -> Result<TaskVariable, ClientError> {
        let response = self
            .client
            .put(creds, &format!("tasks/{id}/variables/{name}"), &[], payload)
            .await?;
        parse_entry(&response)
    }

    pub async fn delete_variable(
        &self,
        creds: &Credentials,
        id: &str,
        name: &str,
    ) -> Result<(), ClientError> {
        self.client
            .delete(creds, &format!("tasks/{id}/variables/{name}"))
            .await
    }

    pub async fn items(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<Item>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("tasks/{id}/items"), &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn add_item(
        &self,
        creds: &Credentials,
        id: &str,
        item_id: &str,
    ) -> Result<Item, ClientError> {
        let response = self
            .client
            .post(
                creds,
                &format!("tasks/{id}/items"),
                &NewItem {
                    id: item_id.to_string(),
                },
            )
            .await?;
        parse_entry(&response)
    }

    pub async fn delete_item(
        &self,
        creds: &Credentials,
        id: &str,
        item_id: &str,
    ) -> Result<(), ClientError> {
        self.client
            .delete(creds, &format!("tasks/{id}/items/{item_id}"))
            .await
    }
}
