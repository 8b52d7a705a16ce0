//! Handlers for the tasks resource: collection queries, selective
//! updates / state transitions, and the candidates, variables, items and
//! task-form-model sub-resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use flowgate_core::paging::{PagedList, Pagination};
use flowgate_core::task::UpdateTask;
use flowgate_core::variable::VariablePayload;

use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::query::{CollectionParams, SelectParams};
use crate::response::{EntryBody, ListBody};
use crate::state::AppState;

use super::processes::VariablesBody;

/// GET /api/v1/tasks
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let clause = params.parse_where()?;
    let order_by = params.parse_order_by()?;
    let page = state.engine.list_tasks(
        &auth.ctx,
        clause.as_ref(),
        order_by.as_ref(),
        &params.paging(),
    )?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let task = state.engine.get_task(&auth.ctx, &id)?;
    Ok(Json(EntryBody { entry: task }))
}

/// PUT /api/v1/tasks/{id}?select=...
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(select): Query<SelectParams>,
    Json(body): Json<UpdateTask>,
) -> ApiResult<impl IntoResponse> {
    let fields = select.fields();
    let task = state
        .engine
        .update_task(&auth.ctx, &id, body, fields.as_deref())?;
    Ok(Json(EntryBody { entry: task }))
}

/// GET /api/v1/tasks/{id}/candidates
pub async fn list_candidates(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .list_task_candidates(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/tasks/{id}/task-form-model
pub async fn get_task_form_model(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .task_form_model(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/tasks/{id}/variables
pub async fn list_variables(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let clause = params.parse_where()?;
    let page = state.engine.list_task_variables(
        &auth.ctx,
        &id,
        clause.as_ref(),
        &params.paging(),
    )?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/tasks/{id}/variables
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
                .set_task_variable(&auth.ctx, &id, &payload, None)?;
            Ok((StatusCode::CREATED, Json(EntryBody { entry: variable })).into_response())
        }
        VariablesBody::Many(payloads) => {
            let variables = state.engine.set_task_variables(&auth.ctx, &id, &payloads)?;
            let total = variables.len() as i64;
            let page = PagedList {
                items: variables,
                pagination: Pagination::from_window(total, 0, total),
            };
            Ok((StatusCode::CREATED, Json(ListBody::from(page))).into_response())
        }
    }
}

/// PUT /api/v1/tasks/{id}/variables/{name}
pub async fn update_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(payload): Json<VariablePayload>,
) -> ApiResult<impl IntoResponse> {
    let variable = state
        .engine
        .set_task_variable(&auth.ctx, &id, &payload, Some(&name))?;
    Ok(Json(EntryBody { entry: variable }))
}

/// DELETE /api/v1/tasks/{id}/variables/{name}
pub async fn delete_variable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_task_variable(&auth.ctx, &id, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tasks/{id}/items
pub async fn list_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .list_task_items(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/tasks/{id}/items
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<flowgate_core::item::NewItem>,
) -> ApiResult<impl IntoResponse> {
    let item = state.engine.add_task_item(&auth.ctx, &id, &body.id)?;
    Ok((StatusCode::CREATED, Json(EntryBody { entry: item })))
}

/// DELETE /api/v1/tasks/{id}/items/{item_id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_task_item(&auth.ctx, &id, &item_id)?;
    Ok(StatusCode::NO_CONTENT)
}
