use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::Question,
    dto::round::{RoundSnapshot, StartRoundRequest},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        round::{FinishKind, RoundEvent, RoundPhase, RoundSession},
    },
};

/// Start a round for a question, sized to the requested or configured
/// duration.
///
/// Fails with an invalid-state error while another round is running; a
/// finished round is replaced by the new one. The round's countdown starts
/// immediately and its ticks are forwarded to the SSE stream.
pub async fn start_round(
    state: &SharedState,
    request: StartRoundRequest,
) -> Result<RoundSnapshot, ServiceError> {
    let question = resolve_question(state, &request).await?;
    let seconds = request
        .seconds
        .unwrap_or(state.config().default_round_seconds);

    let mut slot = state.current_round().write().await;
    if let Some(session) = slot.as_ref() {
        if session.phase() == RoundPhase::Running {
            return Err(ServiceError::InvalidState(
                "a round is already running; finish it before starting another".into(),
            ));
        }
    }

    let mut session = RoundSession::new(question.id, seconds);
    session.apply(RoundEvent::Start)?;

    let round_id = session.id;
    let remaining_rx = session.countdown.subscribe();

    // The expiry callback fires on the countdown's ticking task; hop onto a
    // fresh task before taking the round slot lock.
    let expire_state = state.clone();
    session.countdown.start(Box::new(move || {
        tokio::spawn(async move {
            expire_round(expire_state, round_id).await;
        });
    }));

    spawn_tick_forwarder(state.clone(), round_id, seconds, remaining_rx);

    let snapshot = RoundSnapshot::from(&session);
    *slot = Some(session);
    drop(slot);

    info!(%round_id, question_id = %question.id, seconds, "round started");
    sse_events::broadcast_round_started(state, &snapshot);
    Ok(snapshot)
}

/// End the running round before its timer expires.
pub async fn force_finish(state: &SharedState) -> Result<RoundSnapshot, ServiceError> {
    let mut slot = state.current_round().write().await;
    let Some(session) = slot.as_mut() else {
        return Err(ServiceError::NotFound("no active round".into()));
    };

    session.apply(RoundEvent::ForceFinish)?;
    session.countdown.stop();

    let snapshot = RoundSnapshot::from(&*session);
    let question_id = session.question_id;
    let round_id = session.id;
    drop(slot);

    info!(%round_id, "round finished manually");
    sse_events::broadcast_round_finished(state, round_id, question_id, FinishKind::Manual);
    Ok(snapshot)
}

/// Resize the running round's countdown, resetting it to the new total.
///
/// Elapsed time is not carried over; the timer restarts its descent from the
/// new value. Subscribed clients pick the change up through the regular
/// timer update events.
pub async fn resize_timer(state: &SharedState, seconds: u32) -> Result<RoundSnapshot, ServiceError> {
    let slot = state.current_round().read().await;
    let Some(session) = slot.as_ref() else {
        return Err(ServiceError::NotFound("no active round".into()));
    };
    if !session.countdown.is_running() {
        return Err(ServiceError::InvalidState(
            "the timer can only be adjusted while the round is running".into(),
        ));
    }

    session.countdown.set_total(seconds);
    let snapshot = RoundSnapshot::from(session);
    let round_id = session.id;
    drop(slot);

    info!(%round_id, seconds, "round timer adjusted");
    Ok(snapshot)
}

/// Snapshot of the round currently occupying the slot.
pub async fn current_round(state: &SharedState) -> Result<RoundSnapshot, ServiceError> {
    let slot = state.current_round().read().await;
    slot.as_ref()
        .map(RoundSnapshot::from)
        .ok_or_else(|| ServiceError::NotFound("no active round".into()))
}

/// Applied when a round's countdown reaches zero.
///
/// The round id is checked against the slot before anything is touched: an
/// expiry raced against a force-finish or a replacement round must not finish
/// the wrong instance.
async fn expire_round(state: SharedState, round_id: Uuid) {
    let mut slot = state.current_round().write().await;
    let Some(session) = slot.as_mut() else {
        return;
    };
    if session.id != round_id {
        debug!(%round_id, "ignoring expiry of a replaced round");
        return;
    }

    let question_id = session.question_id;
    match session.apply(RoundEvent::TimerExpired) {
        Ok(_) => {
            drop(slot);
            info!(%round_id, "round expired");
            sse_events::broadcast_round_finished(&state, round_id, question_id, FinishKind::Expired);
        }
        Err(err) => {
            // The round was force-finished between the tick and this task.
            debug!(%round_id, %err, "ignoring stale expiry");
        }
    }
}

/// Forward countdown ticks to the SSE stream until the run ends.
fn spawn_tick_forwarder(
    state: SharedState,
    round_id: Uuid,
    total_seconds: u32,
    mut remaining_rx: watch::Receiver<u32>,
) {
    tokio::spawn(async move {
        while remaining_rx.changed().await.is_ok() {
            let remaining = *remaining_rx.borrow_and_update();
            sse_events::broadcast_timer_update(&state, round_id, remaining, total_seconds);
            if remaining == 0 {
                break;
            }
        }
    });
}

/// Pick the question for a round: an explicit id, a category draw, or a draw
/// from the whole bank.
async fn resolve_question(
    state: &SharedState,
    request: &StartRoundRequest,
) -> Result<Question, ServiceError> {
    if let Some(id) = request.question_id {
        return state
            .store()
            .get_question(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("question `{id}` not found")));
    }

    let drawn = match &request.category {
        Some(category) => state.store().random_question_in_category(category).await,
        None => state.store().random_question().await,
    };
    drawn.ok_or_else(|| ServiceError::NotFound("question bank is empty".into()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::models::NewQuestion,
        dto::round::{FinishKindDto, RoundPhaseDto},
        state::AppState,
    };

    async fn state_with_question() -> (SharedState, Uuid) {
        let state = AppState::new(AppConfig::default());
        let question = state
            .store()
            .add_question(NewQuestion {
                category: "General".into(),
                text: "What is the capital of France?".into(),
                answer: "Paris".into(),
                choices: vec!["London".into(), "Paris".into()],
                points: 100,
            })
            .await
            .unwrap();
        (state, question.id)
    }

    fn start_request(question_id: Uuid, seconds: u32) -> StartRoundRequest {
        StartRoundRequest {
            question_id: Some(question_id),
            category: None,
            seconds: Some(seconds),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn natural_expiry_finishes_the_round() {
        let (state, question_id) = state_with_question().await;

        let snapshot = start_round(&state, start_request(question_id, 3)).await.unwrap();
        assert_eq!(snapshot.phase, RoundPhaseDto::Running);
        assert_eq!(snapshot.total_seconds, 3);
        assert_eq!(snapshot.question_id, question_id);

        sleep(Duration::from_secs(10)).await;

        let finished = current_round(&state).await.unwrap();
        assert_eq!(finished.phase, RoundPhaseDto::Finished);
        assert_eq!(finished.finish, Some(FinishKindDto::Expired));
        assert_eq!(finished.remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn force_finish_carries_the_manual_flag() {
        let (state, question_id) = state_with_question().await;
        start_round(&state, start_request(question_id, 30)).await.unwrap();

        sleep(Duration::from_millis(1500)).await;
        let finished = force_finish(&state).await.unwrap();
        assert_eq!(finished.phase, RoundPhaseDto::Finished);
        assert_eq!(finished.finish, Some(FinishKindDto::Manual));

        // The stopped countdown must not expire later and flip the flag.
        sleep(Duration::from_secs(60)).await;
        let still = current_round(&state).await.unwrap();
        assert_eq!(still.finish, Some(FinishKindDto::Manual));
    }

    #[tokio::test(start_paused = true)]
    async fn starting_while_running_is_rejected() {
        let (state, question_id) = state_with_question().await;
        start_round(&state, start_request(question_id, 30)).await.unwrap();

        let err = start_round(&state, start_request(question_id, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn finished_round_is_replaced_by_the_next_start() {
        let (state, question_id) = state_with_question().await;

        let first = start_round(&state, start_request(question_id, 2)).await.unwrap();
        sleep(Duration::from_secs(5)).await;

        let second = start_round(&state, start_request(question_id, 2)).await.unwrap();
        assert_ne!(first.round_id, second.round_id);
        assert_eq!(second.phase, RoundPhaseDto::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn resizing_the_timer_resets_the_countdown() {
        let (state, question_id) = state_with_question().await;
        start_round(&state, start_request(question_id, 30)).await.unwrap();

        sleep(Duration::from_millis(2500)).await;
        let snapshot = resize_timer(&state, 5).await.unwrap();
        assert_eq!(snapshot.total_seconds, 5);
        assert_eq!(snapshot.remaining_seconds, 5);

        sleep(Duration::from_secs(10)).await;
        let finished = current_round(&state).await.unwrap();
        assert_eq!(finished.phase, RoundPhaseDto::Finished);
        assert_eq!(finished.finish, Some(FinishKindDto::Expired));
    }

    #[tokio::test(start_paused = true)]
    async fn resizing_a_finished_round_is_rejected() {
        let (state, question_id) = state_with_question().await;
        start_round(&state, start_request(question_id, 10)).await.unwrap();
        force_finish(&state).await.unwrap();

        let err = resize_timer(&state, 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn force_finish_without_a_round_is_not_found() {
        let state = AppState::new(AppConfig::default());
        let err = force_finish(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn force_finish_twice_is_an_invalid_transition() {
        let (state, question_id) = state_with_question().await;
        start_round(&state, start_request(question_id, 30)).await.unwrap();

        force_finish(&state).await.unwrap();
        let err = force_finish(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_question_is_not_found() {
        let state = AppState::new(AppConfig::default());
        let err = start_round(&state, start_request(Uuid::new_v4(), 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn random_draw_falls_back_to_the_bank() {
        let (state, question_id) = state_with_question().await;

        let snapshot = start_round(
            &state,
            StartRoundRequest {
                question_id: None,
                category: Some("Nonexistent".into()),
                seconds: Some(5),
            },
        )
        .await
        .unwrap();
        assert_eq!(snapshot.question_id, question_id);
    }
}
