use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::info;

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::ServiceError,
    state::SharedState,
};

/// Authenticate an organizer and issue a signed session credential.
///
/// An unknown username and a wrong password produce the same error so the
/// route cannot be used to enumerate accounts.
pub async fn login(state: &SharedState, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
    let user = state
        .store()
        .find_user_by_username(&request.username)
        .await?;

    let Some(user) = user else {
        return Err(unauthorized());
    };

    verify_password(&request.password, &user.password_hash)?;

    let token = state
        .credentials()
        .sign(user.id, &user.username)
        .map_err(|err| ServiceError::Internal(format!("failed to sign credential: {err}")))?;

    info!(username = %user.username, "organizer logged in");
    Ok(LoginResponse { token })
}

/// Hash a password with argon2 for storage.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), ServiceError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| unauthorized())?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| unauthorized())
}

fn unauthorized() -> ServiceError {
    ServiceError::Unauthorized("invalid credentials".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;

    async fn seeded_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        let hash = hash_password("password").unwrap();
        state.store().initialize("admin", &hash).await;
        state
    }

    fn request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_issues_a_verifiable_credential() {
        let state = seeded_state().await;

        let response = login(&state, request("admin", "password")).await.unwrap();
        let claims = state.credentials().verify(&response.token).unwrap();

        assert_eq!(claims.username, "admin");
        let admin = state
            .store()
            .find_user_by_username("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(claims.sub, admin.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let state = seeded_state().await;

        let wrong_password = login(&state, request("admin", "wrong")).await.unwrap_err();
        let unknown_user = login(&state, request("nobody", "x")).await.unwrap_err();

        assert!(matches!(wrong_password, ServiceError::Unauthorized(_)));
        assert!(matches!(unknown_user, ServiceError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn hash_is_salted() {
        let first = hash_password("password").unwrap();
        let second = hash_password("password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("password", &first).is_ok());
        assert!(verify_password("other", &first).is_err());
    }
}
