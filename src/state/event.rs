use super::model::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    BeginAction,
    UpdateAction,
    FinishAction,
    StageCrop,
    ConfirmCrop,
    CancelCrop,
    Undo,
    Redo,
}

/// One applied transition, kept in order by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Option<SessionPhase>,
    pub event: SessionEvent,
    pub to: SessionPhase,
}

impl PhaseTransition {
    pub const fn new(from: Option<SessionPhase>, event: SessionEvent, to: SessionPhase) -> Self {
        Self { from, event, to }
    }
}
