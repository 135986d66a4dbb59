use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::Tournament;
use crate::dto::format_system_time;

/// Payload used to create a tournament. The owner is taken from the session
/// credential, never from the request body.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTournamentRequest {
    /// Display name of the tournament.
    #[validate(length(min = 1, message = "tournament name must not be empty"))]
    pub name: String,
}

/// Public projection of a stored tournament.
#[derive(Debug, Serialize, ToSchema)]
pub struct TournamentSummary {
    /// Identifier of the tournament.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User owning the tournament; fixed at creation time.
    pub owner_user_id: Uuid,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<Tournament> for TournamentSummary {
    fn from(tournament: Tournament) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name,
            owner_user_id: tournament.owner_user_id,
            created_at: format_system_time(tournament.created_at),
        }
    }
}
