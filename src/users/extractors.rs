use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{error, warn};

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::ApiError, state::AppState};

/// The authenticated user, resolved from a `Bearer` token and loaded from the
/// store.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|auth| {
                auth.strip_prefix("Bearer ")
                    .or_else(|| auth.strip_prefix("bearer "))
            })
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized("No autorizado, falta el token"))?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized("No autorizado")
        })?;

        match state.users.find_by_id(claims.id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(user_id = %claims.id, "token for unknown user");
                Err(ApiError::Unauthorized("No autorizado"))
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.id, "find_by_id failed");
                Err(ApiError::Unauthorized("No autorizado"))
            }
        }
    }
}
