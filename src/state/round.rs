use thiserror::Error;
use uuid::Uuid;

use crate::state::countdown::Countdown;

/// Phases a round moves through. `Finished` is terminal; a new round is
/// constructed for the next question instead of reusing the old one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoundPhase {
    /// Round is constructed but its timer has not been started.
    #[default]
    Idle,
    /// Timer is ticking and players may answer.
    Running,
    /// Round ended, either by timer expiry or an explicit early finish.
    Finished(FinishKind),
}

/// Distinguishes how a round reached `Finished` for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishKind {
    /// The countdown ran to zero.
    Expired,
    /// The game master ended the round before the timer ran out.
    Manual,
}

/// Events that can be applied to a round's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// Begin the round and start its countdown.
    Start,
    /// The countdown reached zero.
    TimerExpired,
    /// The game master ends the round early.
    ForceFinish,
}

/// Error returned when an event cannot be applied from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the round was in when the invalid event arrived.
    pub from: RoundPhase,
    /// The rejected event.
    pub event: RoundEvent,
}

/// State machine enforcing the `Idle -> Running -> Finished` round lifecycle.
#[derive(Debug, Clone, Default)]
pub struct RoundStateMachine {
    phase: RoundPhase,
}

impl RoundStateMachine {
    /// Create a state machine in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase.clone()
    }

    /// Apply an event, returning the new phase or rejecting the transition.
    ///
    /// Invalid transitions are surfaced to the caller, never silently
    /// corrected: starting twice or finishing an idle round is a caller
    /// ordering bug.
    pub fn apply(&mut self, event: RoundEvent) -> Result<RoundPhase, InvalidTransition> {
        let next = match (self.phase.clone(), event) {
            (RoundPhase::Idle, RoundEvent::Start) => RoundPhase::Running,
            (RoundPhase::Running, RoundEvent::TimerExpired) => {
                RoundPhase::Finished(FinishKind::Expired)
            }
            (RoundPhase::Running, RoundEvent::ForceFinish) => {
                RoundPhase::Finished(FinishKind::Manual)
            }
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next.clone();
        Ok(next)
    }
}

/// One timed question round: the state machine, its owned countdown, and a
/// non-owning reference to the question driving it.
pub struct RoundSession {
    /// Identifier of this round instance; stale timer callbacks are matched
    /// against it before they may finish anything.
    pub id: Uuid,
    /// Question the round presents. The entity store owns the record.
    pub question_id: Uuid,
    machine: RoundStateMachine,
    /// Countdown owned exclusively by this round.
    pub countdown: Countdown,
}

impl RoundSession {
    /// Build a round for `question_id` with a countdown sized to `seconds`.
    pub fn new(question_id: Uuid, seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            machine: RoundStateMachine::new(),
            countdown: Countdown::new(seconds),
        }
    }

    /// Current phase of the round.
    pub fn phase(&self) -> RoundPhase {
        self.machine.phase()
    }

    /// Apply an event to the round's state machine.
    pub fn apply(&mut self, event: RoundEvent) -> Result<RoundPhase, InvalidTransition> {
        self.machine.apply(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_phase_is_idle() {
        let machine = RoundStateMachine::new();
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn natural_expiry_finishes_with_expired_flag() {
        let mut machine = RoundStateMachine::new();
        assert_eq!(machine.apply(RoundEvent::Start).unwrap(), RoundPhase::Running);
        assert_eq!(
            machine.apply(RoundEvent::TimerExpired).unwrap(),
            RoundPhase::Finished(FinishKind::Expired)
        );
    }

    #[test]
    fn force_finish_finishes_with_manual_flag() {
        let mut machine = RoundStateMachine::new();
        machine.apply(RoundEvent::Start).unwrap();
        assert_eq!(
            machine.apply(RoundEvent::ForceFinish).unwrap(),
            RoundPhase::Finished(FinishKind::Manual)
        );
    }

    #[test]
    fn double_start_is_rejected() {
        let mut machine = RoundStateMachine::new();
        machine.apply(RoundEvent::Start).unwrap();

        let err = machine.apply(RoundEvent::Start).unwrap_err();
        assert_eq!(err.from, RoundPhase::Running);
        assert_eq!(err.event, RoundEvent::Start);
        // The failed event must not have disturbed the phase.
        assert_eq!(machine.phase(), RoundPhase::Running);
    }

    #[test]
    fn finished_is_terminal() {
        let mut machine = RoundStateMachine::new();
        machine.apply(RoundEvent::Start).unwrap();
        machine.apply(RoundEvent::TimerExpired).unwrap();

        for event in [RoundEvent::Start, RoundEvent::TimerExpired, RoundEvent::ForceFinish] {
            let err = machine.apply(event).unwrap_err();
            assert_eq!(err.from, RoundPhase::Finished(FinishKind::Expired));
        }
    }

    #[test]
    fn finish_from_idle_is_rejected() {
        let mut machine = RoundStateMachine::new();
        for event in [RoundEvent::TimerExpired, RoundEvent::ForceFinish] {
            let err = machine.apply(event).unwrap_err();
            assert_eq!(err.from, RoundPhase::Idle);
        }
    }
}
