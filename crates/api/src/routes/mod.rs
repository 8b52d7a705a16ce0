use axum::Router;

use crate::state::AppState;

pub mod deployments;
pub mod health;
pub mod process_definitions;
pub mod processes;
pub mod tasks;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/deployments", deployments::router())
        .nest("/process-definitions", process_definitions::router())
        .nest("/processes", processes::router())
        .nest("/tasks", tasks::router())
}
