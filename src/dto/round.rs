use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::state::round::{FinishKind, RoundPhase, RoundSession};

/// Payload used to start a new round.
///
/// When `question_id` is omitted the backend draws a random question,
/// restricted to `category` when one is given.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct StartRoundRequest {
    /// Question to present. Mutually exclusive with a random draw.
    #[serde(default)]
    pub question_id: Option<Uuid>,
    /// Category filter applied to the random draw.
    #[serde(default)]
    pub category: Option<String>,
    /// Countdown duration override in seconds; defaults to the configured
    /// round duration.
    #[serde(default)]
    #[validate(range(min = 1, max = 3600, message = "seconds must be between 1 and 3600"))]
    pub seconds: Option<u32>,
}

/// Payload used to resize the running round's countdown.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustTimerRequest {
    /// New countdown total in seconds; the timer restarts from this value.
    #[validate(range(min = 1, max = 3600, message = "seconds must be between 1 and 3600"))]
    pub seconds: u32,
}

/// Wire representation of a round phase.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhaseDto {
    /// Round constructed, timer not yet started.
    Idle,
    /// Timer ticking.
    Running,
    /// Round over; see the finish flag for how it ended.
    Finished,
}

/// Wire representation of how a round finished.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishKindDto {
    /// The countdown ran to zero.
    Expired,
    /// The round was ended manually before expiry.
    Manual,
}

impl From<FinishKind> for FinishKindDto {
    fn from(kind: FinishKind) -> Self {
        match kind {
            FinishKind::Expired => FinishKindDto::Expired,
            FinishKind::Manual => FinishKindDto::Manual,
        }
    }
}

/// Snapshot of the current round and its timer, returned by the round routes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundSnapshot {
    /// Identifier of the round instance.
    pub round_id: Uuid,
    /// Question the round presents.
    pub question_id: Uuid,
    /// Current phase.
    pub phase: RoundPhaseDto,
    /// Present once the round is finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish: Option<FinishKindDto>,
    /// Seconds left on the countdown.
    pub remaining_seconds: u32,
    /// Countdown total the round was started with.
    pub total_seconds: u32,
    /// Remaining time as a percentage of the total, `[0, 100]`.
    pub percent_remaining: f32,
}

impl From<&RoundSession> for RoundSnapshot {
    fn from(session: &RoundSession) -> Self {
        let (phase, finish) = match session.phase() {
            RoundPhase::Idle => (RoundPhaseDto::Idle, None),
            RoundPhase::Running => (RoundPhaseDto::Running, None),
            RoundPhase::Finished(kind) => (RoundPhaseDto::Finished, Some(kind.into())),
        };

        Self {
            round_id: session.id,
            question_id: session.question_id,
            phase,
            finish,
            remaining_seconds: session.countdown.remaining(),
            total_seconds: session.countdown.total_seconds(),
            percent_remaining: session.countdown.percent_remaining(),
        }
    }
}
