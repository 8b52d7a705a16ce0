//! HTTP Basic authentication extractor for Axum handlers.
//!
//! Usernames are tenant-qualified (`user@tenant`); a bare username lands
//! in the default tenant. Credentials are checked against the engine's
//! directory on every request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use flowgate_core::context::RequestContext;
use flowgate_core::error::CoreError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity extracted from the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> ApiResult<Json<()>> {
///     tracing::info!(tenant = %auth.ctx.tenant, user = %auth.ctx.user, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The tenant/user identity every engine call is scoped by.
    pub ctx: RequestContext,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let encoded = header.strip_prefix("Basic ").ok_or_else(|| {
            ApiError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Basic <credentials>".into(),
            ))
        })?;

        let decoded = BASE64
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| {
                ApiError::Core(CoreError::Unauthorized(
                    "Invalid Basic credentials encoding".into(),
                ))
            })?;

        let (username, password) = decoded.split_once(':').ok_or_else(|| {
            ApiError::Core(CoreError::Unauthorized(
                "Invalid Basic credentials encoding".into(),
            ))
        })?;

        let ctx = state.engine.authenticate(username, password)?;
        Ok(AuthUser { ctx })
    }
}
