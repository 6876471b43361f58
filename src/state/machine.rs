use super::error::{StateError, StateResult};
use super::{event::PhaseTransition, SessionEvent, SessionPhase};

#[derive(Debug)]
pub struct StateMachine {
    state: SessionPhase,
    transition_history: Vec<PhaseTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionPhase::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionPhase {
        self.state
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SessionEvent) -> Option<SessionPhase> {
        use SessionEvent::*;
        match (self.state, event) {
            (SessionPhase::Idle, BeginAction) => Some(SessionPhase::Acting),
            // A staged crop is abandoned by starting the next gesture.
            (SessionPhase::CropPending, BeginAction) => Some(SessionPhase::Acting),
            (SessionPhase::Acting, UpdateAction) => Some(SessionPhase::Acting),
            (SessionPhase::Acting, FinishAction) => Some(SessionPhase::Idle),
            (SessionPhase::Acting, StageCrop) => Some(SessionPhase::CropPending),
            (SessionPhase::CropPending, ConfirmCrop) => Some(SessionPhase::Idle),
            (SessionPhase::CropPending, CancelCrop) => Some(SessionPhase::Idle),
            (SessionPhase::Idle, Undo | Redo) => Some(SessionPhase::Idle),
            (SessionPhase::CropPending, Undo | Redo) => Some(SessionPhase::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionPhase> {
        tracing::debug!(from = ?self.state, event = ?event, "request phase transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid phase transition requested");
            StateError::InvalidPhaseTransition { from, event }
        })?;

        let record = PhaseTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

#[cfg(test)]
impl StateMachine {
    fn history(&self) -> &[PhaseTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionPhase::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(SessionEvent::BeginAction));
        assert!(machine.can_transition(SessionEvent::Undo));
        assert!(!machine.can_transition(SessionEvent::FinishAction));
        assert!(!machine.can_transition(SessionEvent::ConfirmCrop));

        let _ = machine
            .transition(SessionEvent::BeginAction)
            .expect("idle -> acting should transition");

        assert!(machine.can_transition(SessionEvent::UpdateAction));
        assert!(machine.can_transition(SessionEvent::FinishAction));
        assert!(machine.can_transition(SessionEvent::StageCrop));
        assert!(!machine.can_transition(SessionEvent::BeginAction));
        assert!(!machine.can_transition(SessionEvent::Undo));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(SessionEvent::BeginAction)
            .expect("begin should work");
        let _ = machine
            .transition(SessionEvent::UpdateAction)
            .expect("update should work");
        let _ = machine
            .transition(SessionEvent::StageCrop)
            .expect("stage crop should work");
        let _ = machine
            .transition(SessionEvent::ConfirmCrop)
            .expect("confirm crop should work");

        assert_eq!(machine.state(), SessionPhase::Idle);
        assert_eq!(machine.history().len(), 4);
        assert_eq!(
            machine.history()[0],
            PhaseTransition::new(
                Some(SessionPhase::Idle),
                SessionEvent::BeginAction,
                SessionPhase::Acting
            )
        );
        assert_eq!(
            machine.history()[1],
            PhaseTransition::new(
                Some(SessionPhase::Acting),
                SessionEvent::UpdateAction,
                SessionPhase::Acting
            )
        );
        assert_eq!(
            machine.history()[2],
            PhaseTransition::new(
                Some(SessionPhase::Acting),
                SessionEvent::StageCrop,
                SessionPhase::CropPending
            )
        );
        assert_eq!(
            machine.history()[3],
            PhaseTransition::new(
                Some(SessionPhase::CropPending),
                SessionEvent::ConfirmCrop,
                SessionPhase::Idle
            )
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(SessionEvent::ConfirmCrop)
            .expect_err("idle -> confirm crop should fail");
        assert!(matches!(
            err,
            StateError::InvalidPhaseTransition {
                from: SessionPhase::Idle,
                event: SessionEvent::ConfirmCrop
            }
        ));
        assert_eq!(machine.state(), SessionPhase::Idle);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn begin_is_rejected_while_a_gesture_is_acting() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(SessionEvent::BeginAction)
            .expect("first begin should work");

        let err = machine
            .transition(SessionEvent::BeginAction)
            .expect_err("overlapping begin should fail");
        assert!(matches!(
            err,
            StateError::InvalidPhaseTransition {
                from: SessionPhase::Acting,
                event: SessionEvent::BeginAction
            }
        ));
        assert_eq!(machine.state(), SessionPhase::Acting);
    }

    #[test]
    fn undo_redo_are_rejected_mid_gesture_and_discard_a_staged_crop() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(SessionEvent::BeginAction)
            .expect("begin should work");
        assert!(machine.transition(SessionEvent::Undo).is_err());
        assert!(machine.transition(SessionEvent::Redo).is_err());

        let _ = machine
            .transition(SessionEvent::StageCrop)
            .expect("stage crop should work");
        let state = machine
            .transition(SessionEvent::Undo)
            .expect("undo should leave crop-pending");
        assert_eq!(state, SessionPhase::Idle);
    }

    #[test]
    fn staged_crop_can_be_replaced_by_a_new_gesture() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(SessionEvent::BeginAction)
            .expect("begin should work");
        let _ = machine
            .transition(SessionEvent::StageCrop)
            .expect("stage crop should work");

        let state = machine
            .transition(SessionEvent::BeginAction)
            .expect("new gesture should replace staged crop");
        assert_eq!(state, SessionPhase::Acting);
    }
}
