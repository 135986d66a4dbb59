use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
    routing::post,
};
use tracing::debug;
use validator::Validate;

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppError,
    services::{auth_service, credentials::Claims},
    state::SharedState,
};

/// Authentication routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential issued", body = LoginResponse),
        (status = 401, description = "Unknown username or wrong password")
    )
)]
/// Authenticate an organizer and return a signed session credential.
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let response = auth_service::login(&state, payload).await?;
    Ok(Json(response))
}

/// Extractor requiring a valid `Authorization: Bearer` session credential.
///
/// Every failure mode (missing header, malformed token, bad signature,
/// expiry) collapses into the same unauthorized response.
pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<SharedState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing bearer credential".into()))?;

        let claims = state.credentials().verify(token).map_err(|err| {
            debug!(error = %err, "rejected session credential");
            AppError::Unauthorized("invalid or expired credential".into())
        })?;

        // The credential must still resolve to a stored user.
        if state.store().find_user(claims.sub).await.is_none() {
            return Err(AppError::Unauthorized("invalid or expired credential".into()));
        }

        Ok(Self(claims))
    }
}
