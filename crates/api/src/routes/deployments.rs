//! Route definitions for the deployments resource.
//!
//! ```text
//! GET    /        -> list_deployments
//! POST   /        -> create_deployment
//! GET    /{id}    -> get_deployment
//! DELETE /{id}    -> delete_deployment
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::deployments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(deployments::list_deployments).post(deployments::create_deployment),
        )
        .route(
            "/{id}",
            get(deployments::get_deployment).delete(deployments::delete_deployment),
        )
}
