/// Gesture phase of an editing session.
///
/// Exactly one pointer gesture can be in flight at a time; a crop drag that
/// produced a usable box parks in `CropPending` until it is confirmed or
/// cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Acting,
    CropPending,
}
