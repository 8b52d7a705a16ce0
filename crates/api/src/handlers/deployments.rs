//! Handlers for the deployments resource (tenant administrators only).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use flowgate_core::deployment::NewDeployment;
use flowgate_core::error::CoreError;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::query::CollectionParams;
use crate::response::{EntryBody, ListBody};
use crate::state::AppState;

/// GET /api/v1/deployments
pub async fn list_deployments(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> ApiResult<impl IntoResponse> {
    if params.where_clause.is_some() {
        return Err(ApiError::Core(CoreError::Validation(
            "Filtering is not supported on deployments".into(),
        )));
    }
    let order_by = params.parse_order_by()?;
    let page = state
        .engine
        .list_deployments(&auth.ctx, order_by.as_ref(), &params.paging())?;
    Ok(Json(ListBody::from(page)))
}

/// POST /api/v1/deployments
pub async fn create_deployment(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<NewDeployment>,
) -> ApiResult<impl IntoResponse> {
    let deployment = state.engine.create_deployment(&auth.ctx, body)?;
    Ok((
        StatusCode::CREATED,
        Json(EntryBody { entry: deployment }),
    ))
}

/// GET /api/v1/deployments/{id}
pub async fn get_deployment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deployment = state.engine.get_deployment(&auth.ctx, &id)?;
    Ok(Json(EntryBody { entry: deployment }))
}

/// DELETE /api/v1/deployments/{id}
pub async fn delete_deployment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.engine.delete_deployment(&auth.ctx, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
