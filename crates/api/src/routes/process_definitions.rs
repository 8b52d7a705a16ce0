//! Route definitions for the read-only process-definitions resource.
//!
//! Definitions are written only through deployments, so the mutating
//! verbs answer 405 with the error envelope.
//!
//! ```text
//! GET  /                         -> list_process_definitions
//! GET  /{id}                     -> get_process_definition
//! GET  /{id}/start-form-model    -> get_start_form_model
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{method_not_allowed, process_definitions};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(process_definitions::list_process_definitions)
                .post(method_not_allowed)
                .put(method_not_allowed)
                .delete(method_not_allowed),
        )
        .route(
            "/{id}",
            get(process_definitions::get_process_definition)
                .post(method_not_allowed)
                .put(method_not_allowed)
                .delete(method_not_allowed),
        )
        .route(
            "/{id}/start-form-model",
            get(process_definitions::get_start_form_model),
        )
}
