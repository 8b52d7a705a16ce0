//! Handlers for the processes resource and its tasks, activities, items,
//! variables and image sub-resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use flowgate_core::paging::{PagedList, Pagination};
use flowgate_core::process::StartProcess;
use flowgate_core::variable::VariablePayload;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::query::CollectionParams;
use crate::response::{EntryBody, ListBody};
use crate::state::AppState;

/// One variable object or a batch of them; both shapes are accepted on
/// the variables collection.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum VariablesBody {
    Many(Vec<VariablePayload>),
    One(VariablePayload),
}

/// GET /api/v1/processes
pub async fn list_processes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let clause = params.parse_where()?;
    let order_by = params.parse_order_by()?;
    let page = state.engine.list_processes(
        &auth.ctx,
        clause.as_ref(),
        order_by.as_ref(),
        &params.paging(),
    )?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/processes
pub async fn start_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<StartProcess>,
) -> ApiResult<impl IntoResponse> {
    let process = state.engine.start_process(&auth.ctx, body)?;
    Ok((StatusCode::CREATED, Json(EntryBody { entry: process })))
}

/// GET /api/v1/processes/{id}
pub async fn get_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let process = state.engine.get_process(&auth.ctx, &id)?;
    Ok(Json(EntryBody { entry: process }))
}

/// DELETE /api/v1/processes/{id}
pub async fn delete_process(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_process(&auth.ctx, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/processes/{id}/tasks
pub async fn list_process_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let clause = params.parse_where()?;
    let page =
        state
            .engine
            .list_process_tasks(&auth.ctx, &id, clause.as_ref(), &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/processes/{id}/activities
pub async fn list_activities(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .list_activities(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/processes/{id}/items
pub async fn list_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .list_process_items(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/processes/{id}/items
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<flowgate_core::item::NewItem>,
) -> ApiResult<impl IntoResponse> {
    let item = state.engine.add_process_item(&auth.ctx, &id, &body.id)?;
    Ok((StatusCode::CREATED, Json(EntryBody { entry: item })))
}

/// DELETE /api/v1/processes/{id}/items/{item_id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_process_item(&auth.ctx, &id, &item_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/processes/{id}/variables
pub async fn list_variables(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .list_process_variables(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/processes/{id}/variables
///
/// Accepts one variable object or an array; an array answers with a list
/// envelope, a single object with an entry envelope.
pub async fn create_variables(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VariablesBody>,
) -> ApiResult<Response> {
    match body {
        VariablesBody::One(payload) => {
            let variable = state
                .engine
                .set_process_variable(&auth.ctx, &id, &payload, None)?;
            Ok((StatusCode::CREATED, Json(EntryBody { entry: variable })).into_response())
        }
        VariablesBody::Many(payloads) => {
            let variables = state
                .engine
                .set_process_variables(&auth.ctx, &id, &payloads)?;
            let total = variables.len() as i64;
            let page = PagedList {
                items: variables,
                pagination: Pagination::from_window(total, 0, total),
            };
            Ok((StatusCode::CREATED, Json(ListBody::from(page))).into_response())
        }
    }
}

/// PUT /api/v1/processes/{id}/variables/{name}
pub async fn update_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(payload): Json<VariablePayload>,
) -> ApiResult<impl IntoResponse> {
    let variable = state
        .engine
        .set_process_variable(&auth.ctx, &id, &payload, Some(&name))?;
    Ok(Json(EntryBody { entry: variable }))
}

/// DELETE /api/v1/processes/{id}/variables/{name}
pub async fn delete_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_process_variable(&auth.ctx, &id, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/processes/{id}/image
///
/// Definitions deployed from JSON specs carry no BPMN graphic notation,
/// so there is never a diagram to render.
pub async fn get_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    state.engine.get_process(&auth.ctx, &id)?;
    Err(ApiError::NotFound(format!(
        "Process instance {id} does not have a graphical notation defined"
    )))
}
