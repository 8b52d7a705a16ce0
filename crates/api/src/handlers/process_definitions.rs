//! Handlers for the read-only process-definitions resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::query::CollectionParams;
use crate::response::{EntryBody, ListBody};
use crate::state::AppState;

/// GET /api/v1/process-definitions
pub async fn list_process_definitions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let clause = params.parse_where()?;
    let order_by = params.parse_order_by()?;
    let page = state.engine.list_process_definitions(
        &auth.ctx,
        clause.as_ref(),
        order_by.as_ref(),
        &params.paging(),
    )?;
    Ok(Json(ListBody::from(page)))
}

/// GET /api/v1/process-definitions/{id}
pub async fn get_process_definition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let definition = state.engine.get_process_definition(&auth.ctx, &id)?;
    Ok(Json(EntryBody { entry: definition }))
}

/// GET /api/v1/process-definitions/{id}/start-form-model
pub async fn get_start_form_model(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .engine
        .start_form_model(&auth.ctx, &id, &params.paging())?;
    Ok(Json(ListBody::from(page)))
}
