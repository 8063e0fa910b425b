//! Editor surface errors.
//!
//! Mid-keystroke failures degrade silently (no-ops, dropped selections);
//! only lifecycle misuse surfaces as an error.

use thiserror::Error;

/// Errors from the editor lifecycle surface.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// The editor was already disposed.
    #[error("editor has already been disposed")]
    Disposed,
}
