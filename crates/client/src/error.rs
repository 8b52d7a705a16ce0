use serde_json::Value;

/// Errors from the workflow REST client.
///
/// Callers can tell "forbidden" (403) apart from "absent or hidden" (404)
/// through [`ClientError::api_status`]; the server's `briefSummary` is
/// preserved verbatim for conformance checks. No call is ever retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status and an error envelope.
    #[error("API error ({status}): {brief_summary}")]
    Api { status: u16, brief_summary: String },

    /// The response did not honor the wire contract.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        ClientError::MalformedResponse(detail.into())
    }

    pub(crate) fn from_error_body(status: u16, body: &Value) -> Self {
        let brief_summary = body
            .get("error")
            .and_then(|e| e.get("briefSummary"))
            .and_then(Value::as_str)
            .unwrap_or("(no error summary)")
            .to_string();
        ClientError::Api {
            status,
            brief_summary,
        }
    }

    /// The HTTP status of an API-level error, if this is one.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's `briefSummary`, if this is an API-level error.
    pub fn brief_summary(&self) -> Option<&str> {
        match self {
            ClientError::Api { brief_summary, .. } => Some(brief_summary),
            _ => None,
        }
    }

    pub fn is_bad_request(&self) -> bool {
        self.api_status() == Some(400)
    }

    pub fn is_forbidden(&self) -> bool {
        self.api_status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.api_status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.api_status() == Some(409)
    }
}
