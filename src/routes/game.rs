use axum::{Json, Router, extract::State, routing::{get, post}};
use validator::Validate;

use crate::{
    dto::round::{AdjustTimerRequest, RoundSnapshot, StartRoundRequest},
    error::AppError,
    routes::auth::AuthenticatedUser,
    services::round_service,
    state::SharedState,
};

/// Round control routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/round", get(current_round))
        .route("/game/round/start", post(start_round))
        .route("/game/round/finish", post(finish_round))
        .route("/game/round/timer", post(adjust_timer))
}

#[utoipa::path(
    get,
    path = "/game/round",
    tag = "game",
    responses(
        (status = 200, description = "Current round and timer", body = RoundSnapshot),
        (status = 404, description = "No round has been started")
    )
)]
/// Snapshot the round currently presented, including its timer.
pub async fn current_round(
    State(state): State<SharedState>,
) -> Result<Json<RoundSnapshot>, AppError> {
    let snapshot = round_service::current_round(&state).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/game/round/start",
    tag = "game",
    request_body = StartRoundRequest,
    responses(
        (status = 200, description = "Round started", body = RoundSnapshot),
        (status = 401, description = "Missing or invalid session credential"),
        (status = 404, description = "Unknown question or empty bank"),
        (status = 409, description = "A round is already running")
    )
)]
/// Start a round, drawing a question when none is named.
pub async fn start_round(
    State(state): State<SharedState>,
    _session: AuthenticatedUser,
    Json(payload): Json<StartRoundRequest>,
) -> Result<Json<RoundSnapshot>, AppError> {
    payload.validate()?;
    let snapshot = round_service::start_round(&state, payload).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/game/round/timer",
    tag = "game",
    request_body = AdjustTimerRequest,
    responses(
        (status = 200, description = "Timer reset to the new total", body = RoundSnapshot),
        (status = 401, description = "Missing or invalid session credential"),
        (status = 404, description = "No round has been started"),
        (status = 409, description = "Round is not running")
    )
)]
/// Resize the running round's countdown.
pub async fn adjust_timer(
    State(state): State<SharedState>,
    _session: AuthenticatedUser,
    Json(payload): Json<AdjustTimerRequest>,
) -> Result<Json<RoundSnapshot>, AppError> {
    payload.validate()?;
    let snapshot = round_service::resize_timer(&state, payload.seconds).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/game/round/finish",
    tag = "game",
    responses(
        (status = 200, description = "Round finished manually", body = RoundSnapshot),
        (status = 401, description = "Missing or invalid session credential"),
        (status = 404, description = "No round has been started"),
        (status = 409, description = "Round is not running")
    )
)]
/// End the running round before its timer expires.
pub async fn finish_round(
    State(state): State<SharedState>,
    _session: AuthenticatedUser,
) -> Result<Json<RoundSnapshot>, AppError> {
    let snapshot = round_service::force_finish(&state).await?;
    Ok(Json(snapshot))
}
