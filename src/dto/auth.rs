use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Credentials submitted to the `/login` route.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Exact (case-sensitive) username of the organizer account.
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    /// Plaintext password, verified against the stored hash.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Signed session credential returned on successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque token to be sent as `Authorization: Bearer <token>`.
    pub token: String,
}
