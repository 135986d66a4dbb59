use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        round::RoundSnapshot,
        sse::{RoundFinishedEvent, RoundStartedEvent, ServerEvent, TimerUpdateEvent},
    },
    state::{SharedState, round::FinishKind},
};

const EVENT_ROUND_STARTED: &str = "round.started";
const EVENT_TIMER_UPDATE: &str = "timer.update";
const EVENT_ROUND_FINISHED: &str = "round.finished";

/// Broadcast that a new round has begun.
pub fn broadcast_round_started(state: &SharedState, snapshot: &RoundSnapshot) {
    let payload = RoundStartedEvent {
        round_id: snapshot.round_id,
        question_id: snapshot.question_id,
        total_seconds: snapshot.total_seconds,
    };
    send_event(state, EVENT_ROUND_STARTED, &payload);
}

/// Broadcast the countdown value after a tick.
pub fn broadcast_timer_update(
    state: &SharedState,
    round_id: Uuid,
    remaining_seconds: u32,
    total_seconds: u32,
) {
    let payload = TimerUpdateEvent {
        round_id,
        remaining_seconds,
        total_seconds,
    };
    send_event(state, EVENT_TIMER_UPDATE, &payload);
}

/// Broadcast that a round has finished, carrying the finish kind so scoring
/// collaborators can distinguish expiry from a manual stop.
pub fn broadcast_round_finished(
    state: &SharedState,
    round_id: Uuid,
    question_id: Uuid,
    finish: FinishKind,
) {
    let payload = RoundFinishedEvent {
        round_id,
        question_id,
        finish: finish.into(),
    };
    send_event(state, EVENT_ROUND_FINISHED, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.events().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
