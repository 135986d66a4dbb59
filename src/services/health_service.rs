use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload; the store lives in-process, so a
/// serving process is a healthy one.
pub async fn health_status(_state: &SharedState) -> HealthResponse {
    HealthResponse::ok()
}
