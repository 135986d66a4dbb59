//! Application-level configuration loaded from the environment.

use std::{env, time::Duration};

use tracing::warn;

/// Environment variable holding the credential signing secret.
const TOKEN_SECRET_ENV: &str = "GAME_SHOW_TOKEN_SECRET";
/// Environment variable overriding the credential lifetime in seconds.
const TOKEN_TTL_ENV: &str = "GAME_SHOW_TOKEN_TTL_SECS";
/// Environment variable overriding the seeded admin username.
const ADMIN_USERNAME_ENV: &str = "GAME_SHOW_ADMIN_USERNAME";
/// Environment variable overriding the seeded admin password.
const ADMIN_PASSWORD_ENV: &str = "GAME_SHOW_ADMIN_PASSWORD";
/// Environment variable overriding the default round duration in seconds.
const ROUND_SECONDS_ENV: &str = "GAME_SHOW_ROUND_SECONDS";

/// Development-only signing secret used when none is configured.
const DEFAULT_TOKEN_SECRET: &str = "secret";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Secret used to sign and verify session credentials.
    pub token_secret: String,
    /// Lifetime of an issued session credential.
    pub token_ttl: Duration,
    /// Username of the seeded administrative account.
    pub admin_username: String,
    /// Default password of the seeded administrative account.
    pub admin_password: String,
    /// Countdown duration used when a round request does not override it.
    pub default_round_seconds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token_secret: DEFAULT_TOKEN_SECRET.into(),
            token_ttl: Duration::from_secs(8 * 60 * 60),
            admin_username: "admin".into(),
            admin_password: "password".into(),
            default_round_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Self::default();

        let token_secret = match env::var(TOKEN_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!(
                    "{TOKEN_SECRET_ENV} not set; using the built-in development secret. \
                     Issued credentials are forgeable until a real secret is configured."
                );
                defaults.token_secret
            }
        };

        let token_ttl = parse_env(TOKEN_TTL_ENV)
            .map(Duration::from_secs)
            .unwrap_or(defaults.token_ttl);

        let admin_username =
            env::var(ADMIN_USERNAME_ENV).unwrap_or(defaults.admin_username);
        let admin_password =
            env::var(ADMIN_PASSWORD_ENV).unwrap_or(defaults.admin_password);

        let default_round_seconds =
            parse_env(ROUND_SECONDS_ENV).unwrap_or(defaults.default_round_seconds);

        Self {
            token_secret,
            token_ttl,
            admin_username,
            admin_password,
            default_round_seconds,
        }
    }
}

/// Parse a numeric environment variable, logging and discarding bad values.
fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(variable = name, %value, "ignoring unparseable configuration value");
            None
        }
    }
}
