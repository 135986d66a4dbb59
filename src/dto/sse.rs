use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::round::FinishKindDto;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a pre-rendered data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a new round begins.
pub struct RoundStartedEvent {
    /// Identifier of the round instance.
    pub round_id: Uuid,
    /// Question the round presents.
    pub question_id: Uuid,
    /// Countdown total in seconds.
    pub total_seconds: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once per countdown tick so clients can mirror the timer.
pub struct TimerUpdateEvent {
    /// Round the tick belongs to.
    pub round_id: Uuid,
    /// Seconds left on the countdown.
    pub remaining_seconds: u32,
    /// Countdown total in seconds.
    pub total_seconds: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a round finishes, naturally or manually.
pub struct RoundFinishedEvent {
    /// Identifier of the finished round.
    pub round_id: Uuid,
    /// Question the round presented.
    pub question_id: Uuid,
    /// Whether the round expired naturally or was ended manually.
    pub finish: FinishKindDto,
}
