//! Route definitions for the tasks resource.
//!
//! Tasks are created by the engine when a process advances, never
//! directly, so POST on the collection answers 405.
//!
//! ```text
//! GET    /                          -> list_tasks
//! GET    /{id}                      -> get_task
//! PUT    /{id}                      -> update_task
//! GET    /{id}/candidates           -> list_candidates
//! GET    /{id}/task-form-model      -> get_task_form_model
//! GET    /{id}/variables            -> list_variables
//! POST   /{id}/variables            -> create_variables
//! PUT    /{id}/variables/{name}     -> update_variable
//! DELETE /{id}/variables/{name}     -> delete_variable
//! GET    /{id}/items                -> list_items
//! POST   /{id}/items                -> add_item
//! DELETE /{id}/items/{item_id}      -> delete_item
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{method_not_allowed, tasks};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(method_not_allowed))
        .route("/{id}", get(tasks::get_task).put(tasks::update_task))
        .route("/{id}/candidates", get(tasks::list_candidates))
        .route("/{id}/task-form-model", get(tasks::get_task_form_model))
        .route(
            "/{id}/variables",
            get(tasks::list_variables).post(tasks::create_variables),
        )
        .route(
            "/{id}/variables/{name}",
            axum::routing::put(tasks::update_variable).delete(tasks::delete_variable),
        )
        .route(
            "/{id}/items",
            get(tasks::list_items).post(tasks::add_item),
        )
        .route("/{id}/items/{item_id}", delete(tasks::delete_item))
}
