//! Editing sessions, tools, history, and the save/cancel flow around them.

pub mod history;
pub mod session;
pub mod tools;

use thiserror::Error;

use crate::codec::ExportFormat;
use crate::error::EditorError;
use crate::output::{OutputError, OutputSink};

pub use history::{HistoryStack, Snapshot};
pub use session::{ActionOutcome, EditorSession};
pub use tools::{
    EditorTools, ShapeMode, TextAlign, ToolKind, ToolOptionVisibility, ToolOptions,
};

/// Session-level commands a host issues once editing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Cancel,
}

/// What an executed action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Saved {
        format: ExportFormat,
        byte_len: usize,
    },
    Cancelled,
}

#[derive(Debug, Error)]
pub enum EditorActionError {
    #[error("export failed while {operation}: {source}")]
    Export {
        operation: &'static str,
        #[source]
        source: EditorError,
    },

    #[error("output failed while {operation}: {source}")]
    Output {
        operation: &'static str,
        #[source]
        source: OutputError,
    },
}

/// Runs a session-level action: `Save` encodes the canvas and hands the
/// bytes to `sink`, `Cancel` drops the edits without touching the sink.
pub fn execute_editor_action<S: OutputSink>(
    session: &EditorSession,
    action: EditorAction,
    sink: &mut S,
) -> Result<EditorEvent, EditorActionError> {
    match action {
        EditorAction::Save => {
            let encoded = session.export().map_err(|err| EditorActionError::Export {
                operation: "save",
                source: err,
            })?;
            sink.deliver(&encoded)
                .map_err(|err| EditorActionError::Output {
                    operation: "save",
                    source: err,
                })?;
            Ok(EditorEvent::Saved {
                format: encoded.format,
                byte_len: encoded.bytes.len(),
            })
        }
        EditorAction::Cancel => Ok(EditorEvent::Cancelled),
    }
}
