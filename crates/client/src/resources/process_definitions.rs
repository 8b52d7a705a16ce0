//! Client for the read-only process-definitions resource.

use flowgate_core::definition::ProcessDefinition;
use flowgate_core::form::FormModelElement;
use flowgate_core::paging::PagedList;

use crate::list::{parse_entry, parse_paged_list};
use crate::{ClientError, Credentials, ListParams, WorkflowClient};

pub struct ProcessDefinitionsClient<'a> {
    client: &'a WorkflowClient,
}

impl<'a> ProcessDefinitionsClient<'a> {
    pub(crate) fn new(client: &'a WorkflowClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        creds: &Credentials,
        params: &ListParams,
    ) -> Result<PagedList<ProcessDefinition>, ClientError> {
        let body = self
            .client
            .get(creds, "process-definitions", &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn get(
        &self,
        creds: &Credentials,
        id: &str,
    ) -> Result<ProcessDefinition, ClientError> {
        let body = self
            .client
            .get(creds, &format!("process-definitions/{id}"), &[])
            .await?;
        parse_entry(&body)
    }

    pub async fn start_form_model(
        &self,
        creds: &Credentials,
        id: &str,
    ) -> Result<PagedList<FormModelElement>, ClientError> {
        let body = self
            .client
            .get(creds, &format!("process-definitions/{id}/start-form-model"), &[])
            .await?;
        parse_paged_list(&body)
    }
}
