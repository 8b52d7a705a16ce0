//! Route definitions for the processes resource.
//!
//! ```text
//! GET    /                          -> list_processes
//! POST   /                          -> start_process
//! GET    /{id}                      -> get_process
//! DELETE /{id}                      -> delete_process
//! GET    /{id}/tasks                -> list_process_tasks
//! GET    /{id}/activities           -> list_activities
//! GET    /{id}/items                -> list_items
//! POST   /{id}/items                -> add_item
//! DELETE /{id}/items/{item_id}      -> delete_item
//! GET    /{id}/variables            -> list_variables
//! POST   /{id}/variables            -> create_variables
//! PUT    /{id}/variables/{name}     -> update_variable
//! DELETE /{id}/variables/{name}     -> delete_variable
//! GET    /{id}/image                -> get_image
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::processes;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(processes::list_processes).post(processes::start_process),
        )
        .route(
            "/{id}",
            get(processes::get_process).delete(processes::delete_process),
        )
        .route("/{id}/tasks", get(processes::list_process_tasks))
        .route("/{id}/activities", get(processes::list_activities))
        .route(
            "/{id}/items",
            get(processes::list_items).post(processes::add_item),
        )
        .route("/{id}/items/{item_id}", delete(processes::delete_item))
        .route(
            "/{id}/variables",
            get(processes::list_variables).post(processes::create_variables),
        )
        .route(
            "/{id}/variables/{name}",
            axum::routing::put(processes::update_variable).delete(processes::delete_variable),
        )
        .route("/{id}/image", get(processes::get_image))
}
