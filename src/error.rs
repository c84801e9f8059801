use thiserror::Error;

use crate::editor::EditorId;
use crate::harness::Side;

/// Errors that can occur while wiring editors together
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("mount point for the {side} editor is missing")]
    MountPointMissing { side: Side },

    #[error("cannot relay editor {0} to itself")]
    SameEditor(EditorId),

    #[error("editors {primary} and {secondary} are already connected")]
    AlreadyConnected {
        primary: EditorId,
        secondary: EditorId,
    },
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
