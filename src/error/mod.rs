use crate::codec::CodecError;
use crate::font::FontError;
use crate::state::StateError;
use thiserror::Error;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Font(#[from] FontError),
}
