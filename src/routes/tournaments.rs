use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::tournament::{CreateTournamentRequest, TournamentSummary},
    error::AppError,
    routes::auth::AuthenticatedUser,
    services::tournament_service,
    state::SharedState,
};

/// Tournament routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/tournaments", get(list_tournaments).post(create_tournament))
        .route("/tournaments/{id}", get(get_tournament))
}

#[utoipa::path(
    post,
    path = "/tournaments",
    tag = "tournaments",
    request_body = CreateTournamentRequest,
    responses(
        (status = 201, description = "Tournament created", body = TournamentSummary),
        (status = 401, description = "Missing or invalid session credential")
    )
)]
/// Create a tournament owned by the authenticated organizer.
pub async fn create_tournament(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<TournamentSummary>), AppError> {
    payload.validate()?;
    let summary = tournament_service::create_tournament(&state, claims.sub, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/tournaments",
    tag = "tournaments",
    responses((status = 200, description = "All tournaments in creation order", body = [TournamentSummary]))
)]
/// List every tournament.
pub async fn list_tournaments(State(state): State<SharedState>) -> Json<Vec<TournamentSummary>> {
    Json(tournament_service::list_tournaments(&state).await)
}

#[utoipa::path(
    get,
    path = "/tournaments/{id}",
    tag = "tournaments",
    params(("id" = Uuid, Path, description = "Identifier of the tournament")),
    responses(
        (status = 200, description = "Tournament", body = TournamentSummary),
        (status = 404, description = "Unknown tournament")
    )
)]
/// Look up a tournament by id.
pub async fn get_tournament(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TournamentSummary>, AppError> {
    let summary = tournament_service::get_tournament(&state, id).await?;
    Ok(Json(summary))
}
