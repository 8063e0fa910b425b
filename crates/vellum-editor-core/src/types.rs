//! Core editor types: selection metadata, node paths, and change sources.
//!
//! These types are host-agnostic. A [`NodePath`] addresses a location in the
//! editable tree by child indexes rather than by live node handles, so it
//! stays valid across a serialize/deserialize round trip of the content.

use smallvec::SmallVec;
use smol_str::SmolStr;

/// A logical path to a position in the content tree.
///
/// All steps but the last are child indexes starting at the container root;
/// the final step is an offset inside the addressed node (a character offset
/// for text nodes, a child index for elements).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodePath(pub SmallVec<[usize; 8]>);

impl NodePath {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn push(&mut self, step: usize) {
        self.0.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Child-index steps, excluding the trailing offset.
    pub fn steps(&self) -> &[usize] {
        if self.0.is_empty() {
            &[]
        } else {
            &self.0[..self.0.len() - 1]
        }
    }

    /// The trailing offset step, if the path is non-empty.
    pub fn offset(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(steps))
    }
}

/// Zero-based cell coordinates within a table (x = column, y = row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Selection state expressed in stable logical terms.
///
/// Unlike a live selection, which holds node handles into the current tree,
/// this form survives the tree being torn down and rebuilt: paths are
/// re-resolved against the new tree, ids are looked up again. Resolution is
/// best-effort; a path or id that no longer resolves falls back to no
/// selection rather than failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionMetadata {
    /// A plain range selection. Collapsed when `start == end`.
    Normal { start: NodePath, end: NodePath },
    /// A rectangular table-cell selection, anchored by element id.
    Table {
        table_id: SmolStr,
        first_cell: CellCoord,
        last_cell: CellCoord,
    },
    /// A single selected image, anchored by element id.
    Image { image_id: SmolStr },
}

impl SelectionMetadata {
    /// Discriminant used by the persisted metadata encoding.
    pub fn type_code(&self) -> u8 {
        match self {
            SelectionMetadata::Normal { .. } => 0,
            SelectionMetadata::Table { .. } => 1,
            SelectionMetadata::Image { .. } => 2,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        match self {
            SelectionMetadata::Normal { start, end } => start == end,
            _ => false,
        }
    }
}

/// Out-of-band state carried alongside serialized content.
///
/// Persisted as a trailing HTML comment by the [`crate::metadata`] codec, so
/// that restoring a content string can also restore the selection it was
/// captured with and reconcile the dark-mode state it was captured in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentMetadata {
    pub is_dark_mode: bool,
    pub selection: SelectionMetadata,
}

/// The originator of a content change, carried on content-changed events.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChangeSource {
    AutoLink,
    CreateLink,
    Cut,
    Drop,
    Format,
    InsertEntity,
    Keyboard,
    Paste,
    SetContent,
    SwitchToDarkMode,
    SwitchToLightMode,
    Undo,
    Redo,
    /// A feature-defined source not covered by the built-in set.
    Other(SmolStr),
}

impl ChangeSource {
    /// Whether this source is an undo/redo restore rather than new input.
    pub fn is_restore(&self) -> bool {
        matches!(self, ChangeSource::Undo | ChangeSource::Redo)
    }
}

impl std::fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChangeSource::AutoLink => "AutoLink",
            ChangeSource::CreateLink => "CreateLink",
            ChangeSource::Cut => "Cut",
            ChangeSource::Drop => "Drop",
            ChangeSource::Format => "Format",
            ChangeSource::InsertEntity => "InsertEntity",
            ChangeSource::Keyboard => "Keyboard",
            ChangeSource::Paste => "Paste",
            ChangeSource::SetContent => "SetContent",
            ChangeSource::SwitchToDarkMode => "SwitchToDarkMode",
            ChangeSource::SwitchToLightMode => "SwitchToLightMode",
            ChangeSource::Undo => "Undo",
            ChangeSource::Redo => "Redo",
            ChangeSource::Other(s) => s.as_str(),
        };
        f.write_str(name)
    }
}

/// How to serialize content when reading it out of the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GetContentMode {
    /// Serialized content with dark-mode colors mapped back to light and no
    /// selection metadata. Safe to persist or send elsewhere.
    #[default]
    CleanHtml,
    /// The raw serialized content, colors as-is, no metadata comment.
    RawHtmlOnly,
    /// Raw serialized content with the selection metadata comment appended.
    RawHtmlWithSelection,
    /// Text content only, all markup dropped.
    PlainText,
}
