//! vellum-editor-core: host-agnostic editor core logic.
//!
//! This crate provides:
//! - `SnapshotStore` / undo coordination - bounded snapshot stack with
//!   auto-complete coalescing and redo-clearing
//! - `CoreApiTable` - the overridable primitive table all mutations flow
//!   through
//! - `PluginEvent` / `EditorPlugin` - ordered event fan-out with exclusive
//!   handling
//! - Shadow edit - event-suppressed speculative mutation with discard/commit
//! - `MemoryDocument` - arena-backed reference host for headless use
//!
//! The live editable surface (a browser `contentEditable`, or anything else)
//! stays behind the `DocumentModel` trait; the core never touches a DOM.

pub mod api;
pub mod capabilities;
pub mod color;
pub mod core;
pub mod dom;
pub mod editor;
pub mod error;
pub mod events;
pub mod memory;
pub mod metadata;
pub mod plugins;
pub mod snapshots;
pub mod types;
pub mod undo;

pub use api::{CoreApiOverrides, CoreApiTable, EditCallback, InsertOption, InsertPosition};
pub use capabilities::BrowserCapabilities;
pub use color::{
    default_dark_color, parse_color_value, ColorTransformDirection, CoreDarkColorHandler,
    DarkColorHandler, ParsedColor,
};
pub use crate::core::EditorCore;
pub use dom::{DocumentModel, DocumentSelection, NodeHandle, Position};
pub use editor::{Editor, EditorOptions};
pub use error::EditorError;
pub use events::{
    ClipboardData, EditorPlugin, EntityOperation, Key, KeyboardEventData, MouseButton,
    MouseEventData, PluginEvent, PluginEventType,
};
pub use memory::MemoryDocument;
pub use metadata::{embed_metadata, extract_metadata, parse_metadata, strip_metadata};
pub use smol_str::SmolStr;
pub use snapshots::{Snapshot, SnapshotStore, DEFAULT_SNAPSHOT_BUDGET};
pub use types::{
    CellCoord, ChangeSource, ContentMetadata, GetContentMode, NodePath, SelectionMetadata,
};
pub use undo::UndoState;

#[cfg(test)]
mod editor_tests;
