//! Client for the deployments resource.

use flowgate_core::deployment::{Deployment, NewDeployment};
use flowgate_core::paging::PagedList;

use crate::list::{parse_entry, parse_paged_list};
use crate::{ClientError, Credentials, ListParams, WorkflowClient};

pub struct DeploymentsClient<'a> {
    client: &'a WorkflowClient,
}

impl<'a> DeploymentsClient<'a> {
    pub(crate) fn new(client: &'a WorkflowClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        creds: &Credentials,
        params: &ListParams,
    ) -> Result<PagedList<Deployment>, ClientError> {
        let body = self
            .client
            .get(creds, "deployments", &params.to_query())
            .await?;
        parse_paged_list(&body)
    }

    pub async fn get(
        &self,
        creds: &Credentials,
        id: &str,
    ) -> Result<Deployment, ClientError> {
        let body = self
            .client
            .get(creds, &format!("deployments/{id}"), &[])
            .await?;
        parse_entry(&body)
    }

    pub async fn create(
        &self,
        creds: &Credentials,
        body: &NewDeployment,
    ) -> Result<Deployment, ClientError> {
        let response = self.client.post(creds, "deployments", body).await?;
        parse_entry(&response)
    }

    pub async fn delete(&self, creds: &Credentials, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(creds, &format!("deployments/{id}"))
            .await
    }
}
