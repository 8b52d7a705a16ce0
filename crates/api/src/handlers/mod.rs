use flowgate_core::error::CoreError;

use crate::error::ApiError;

pub mod deployments;
pub mod process_definitions;
pub mod processes;
pub mod tasks;

/// Explicit 405 handler for verbs a resource does not support, so the
/// caller still gets the error envelope instead of an empty body.
pub async fn method_not_allowed() -> ApiError {
    ApiError::Core(CoreError::MethodNotAllowed(
        "The method is not supported for this resource".into(),
    ))
}
