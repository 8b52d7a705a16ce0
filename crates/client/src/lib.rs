//! Typed client for the flowgate workflow REST API.
//!
//! One [`WorkflowClient`] wraps a shared `reqwest::Client`; per-resource
//! accessors expose the collection/singleton verbs. Every call takes an
//! explicit [`Credentials`] value -- there is no ambient "current user"
//! to mutate between calls.
//!
//! ```ignore
//! let client = WorkflowClient::new("http://localhost:3000");
//! let alice = Credentials::new("acme", "alice", "secret");
//! let page = client
//!     .tasks()
//!     .list(&alice, &ListParams::new().where_clause("(status = 'active')"))
//!     .await?;
//! ```

use serde::Serialize;
use serde_json::Value;

mod credentials;
mod error;
mod list;
mod params;
pub mod resources;

pub use credentials::Credentials;
pub use error::ClientError;
pub use params::ListParams;

pub use resources::deployments::DeploymentsClient;
pub use resources::process_definitions::ProcessDefinitionsClient;
pub use resources::processes::ProcessesClient;
pub use resources::tasks::TasksClient;

pub struct WorkflowClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorkflowClient {
    /// Create a client against a server base URL (no trailing slash
    /// required), e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing `reqwest::Client` (connection pooling across
    /// several API clients).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    pub fn deployments(&self) -> DeploymentsClient<'_> {
        DeploymentsClient::new(self)
    }

    pub fn process_definitions(&self) -> ProcessDefinitionsClient<'_> {
        ProcessDefinitionsClient::new(self)
    }

    pub fn processes(&self) -> ProcessesClient<'_> {
        ProcessesClient::new(self)
    }

    pub fn tasks(&self) -> TasksClient<'_> {
        TasksClient::new(self)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    pub(crate) async fn get(
        &self,
        creds: &Credentials,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let request = self
            .http
            .get(self.url(path))
            .query(query)
            .basic_auth(creds.username(), Some(creds.password()));
        self.execute(request).await?.ok_or_else(|| {
            ClientError::malformed("expected a response body, got an empty one")
        })
    }

    pub(crate) async fn post(
        &self,
        creds: &Credentials,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Value, ClientError> {
        let request = self
            .http
            .post(self.url(path))
            .json(body)
            .basic_auth(creds.username(), Some(creds.password()));
        self.execute(request).await?.ok_or_else(|| {
            ClientError::malformed("expected a response body, got an empty one")
        })
    }

    pub(crate) async fn put(
        &self,
        creds: &Credentials,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<Value, ClientError> {
        let request = self
            .http
            .put(self.url(path))
            .query(query)
            .json(body)
            .basic_auth(creds.username(), Some(creds.password()));
        self.execute(request).await?.ok_or_else(|| {
            ClientError::malformed("expected a response body, got an empty one")
        })
    }

    pub(crate) async fn delete(
        &self,
        creds: &Credentials,
        path: &str,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.url(path))
            .basic_auth(creds.username(), Some(creds.password()));
        self.execute(request).await?;
        Ok(())
    }

    /// Send a request, mapping non-2xx responses onto
    /// [`ClientError::Api`] with the server's `briefSummary`.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<Value>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(None);
            }
            return Ok(Some(response.json().await?));
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(ClientError::from_error_body(status.as_u16(), &body))
    }
}
