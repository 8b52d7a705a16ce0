//! Client for the processes resource and its sub-resources.

use flowgate_core::activity::Activity;
use flowgate_core::item::{Item, NewItem};
use flowgate_core::paging::PagedList;
use flowgate_core::process::{ProcessInfo, StartProcess};
use flowgate_core::task::Task;
use flowgate_core::variable::{Variable, VariablePayload};

use crate::list::{parse_entry, parse_paged_list};
use crate::{ClientError, Credentials, ListParams, WorkflowClient};

pub struct ProcessesClient<'a> {
    client: &'a WorkflowClient,
}

impl<'a> ProcessesClient<'a> {
    pub(crate) fn new(client: &'a WorkflowClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        creds: &Credentials,
        params: &ListParams,
    ) -> Result<PagedList<ProcessInfo>, ClientError> {
        let body = self
            .client
            .get(creds, "processes", &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn start(
        &self,
        creds: &Credentials,
        body: &StartProcess,
    ) -> Result<ProcessInfo, ClientError> {
        let response = self.client.post(creds, "processes", body).await?;
        parse_entry(&response)
    }

    pub async fn get(
        &self,
        creds: &Credentials,
        id: &str,
    ) -> Result<ProcessInfo, ClientError> {
        let body = self
            .client
            .get(creds, &format!("processes/{id}"), &[])
            .await?;
        parse_entry(&body)
    }

    pub async fn delete(&self, creds: &Credentials, id: &str) -> Result<(), ClientError> {
        self.client.delete(creds, &format!("processes/{id}")).await
    }

    pub async fn tasks(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<Task>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("processes/{id}/tasks"), &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn activities(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<Activity>, ClientError> {
        let body = self
            .client
            .get(
                creds,
                &format!("processes/{id}/activities"),
                &params.to_query(),
            )
            .await?;
        parse_paged_list(&body)
    }

    pub async fn items(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<Item>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("processes/{id}/items"), &params.to_query())
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
                &format!("processes/{id}/items"),
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
            .delete(creds, &format!("processes/{id}/items/{item_id}"))
            .await
    }

    pub async fn variables(
        &self,
        creds: &Credentials,
        id: &str,
        params: &ListParams,
    ) -> Result<PagedList<Variable>, ClientError> {
        let body = self
            .client
            .get(
                creds,
                &format!("processes/{id}/variables"),
                &params.to_query(),
            )
            .await?;
        parse_paged_list(&body)
    }

    /// Create or update one variable (`POST` on the collection).
    pub async fn create_variable(
        &self,
        creds: &Credentials,
        id: &str,
        payload: &VariablePayload,
    ) -> Result<Variable, ClientError> {
        let response = self
            .client
            .post(creds, &format!("processes/{id}/variables"), payload)
            .await?;
        parse_entry(&response)
    }

    /// Create or update a batch of variables in one call.
    pub async fn create_variables(
        &self,
        creds: &Credentials,
        id: &str,
        payloads: &[VariablePayload],
    ) -> Result<PagedList<Variable>, ClientError> {
        let response = self
            .client
            .post(creds, &format!("processes/{id}/variables"), &payloads)
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
    ) -> Result<Variable, ClientError> {
        let response = self
            .client
            .put(
                creds,
                &format!("processes/{id}/variables/{name}"),
                &[],
                payload,
            )
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
            .delete(creds, &format!("processes/{id}/variables/{name}"))
            .await
    }

    /// The rendered process diagram. Definitions deployed from JSON specs
    /// carry no graphic notation, so this reports 404 for them.
    pub async fn image(&self, creds: &Credentials, id: &str) -> Result<Vec<u8>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("processes/{id}/image"), &[])
            .await?;
        // Reaching this point means the server produced a JSON body where
        // image bytes were expected.
        Err(ClientError::malformed(format!(
            "expected image bytes, got: {body}"
        )))
    }
}
