use tracing::info;
use uuid::Uuid;

use crate::{
    dto::tournament::{CreateTournamentRequest, TournamentSummary},
    error::ServiceError,
    state::SharedState,
};

/// Create a tournament owned by the authenticated user.
pub async fn create_tournament(
    state: &SharedState,
    owner_user_id: Uuid,
    request: CreateTournamentRequest,
) -> Result<TournamentSummary, ServiceError> {
    let tournament = state
        .store()
        .create_tournament(&request.name, owner_user_id)
        .await?;
    info!(tournament_id = %tournament.id, owner = %owner_user_id, "tournament created");
    Ok(tournament.into())
}

/// All tournaments in creation order.
pub async fn list_tournaments(state: &SharedState) -> Vec<TournamentSummary> {
    state
        .store()
        .list_tournaments()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Look up a tournament by id.
pub async fn get_tournament(
    state: &SharedState,
    id: Uuid,
) -> Result<TournamentSummary, ServiceError> {
    state
        .store()
        .get_tournament(id)
        .await
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("tournament `{id}` not found")))
}
