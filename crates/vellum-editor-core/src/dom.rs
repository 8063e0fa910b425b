//! Document model abstraction for the editable surface.
//!
//! The editor core never touches a real DOM. Everything structural goes
//! through the [`DocumentModel`] trait: a browser host backs it with the live
//! `contentEditable` element, while [`crate::memory::MemoryDocument`] backs it
//! with an arena tree for headless use and tests.
//!
//! Handles are opaque and only meaningful to the model that issued them. A
//! handle may be invalidated by [`DocumentModel::replace_content`]; the core
//! re-resolves logical paths instead of caching handles across rebuilds.

use smol_str::SmolStr;

use crate::types::{CellCoord, NodePath, SelectionMetadata};

/// Opaque handle to a node owned by a [`DocumentModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// A live position: a node plus an offset inside it.
///
/// For text nodes the offset counts characters; for elements it counts
/// children. Only valid against the tree that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub node: NodeHandle,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeHandle, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A live selection against the current tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSelection {
    /// A plain range. Collapsed when `start == end`.
    Range { start: Position, end: Position },
    /// A rectangular run of table cells.
    Table {
        table: NodeHandle,
        first_cell: CellCoord,
        last_cell: CellCoord,
    },
    /// A single selected image.
    Image { image: NodeHandle },
}

impl DocumentSelection {
    pub fn collapsed(pos: Position) -> Self {
        DocumentSelection::Range {
            start: pos,
            end: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        match self {
            DocumentSelection::Range { start, end } => start == end,
            _ => false,
        }
    }

    /// Start position for range selections.
    pub fn start(&self) -> Option<Position> {
        match self {
            DocumentSelection::Range { start, .. } => Some(*start),
            _ => None,
        }
    }
}

/// The editable-surface seam consumed by the editor core.
///
/// Implementations own the node tree, the live selection, and focus state.
/// Mutation methods return `false` instead of failing when a handle is stale
/// or an operation does not apply; the core treats `false` as "nothing
/// happened".
pub trait DocumentModel {
    // === Structure ===

    /// The content container node. Its children are the editable content.
    fn root(&self) -> NodeHandle;

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle>;

    fn is_text(&self, node: NodeHandle) -> bool;

    /// Void elements (images, line breaks) cannot hold children.
    fn is_void(&self, node: NodeHandle) -> bool;

    fn is_block(&self, node: NodeHandle) -> bool;

    /// Region boundaries (table cells, the container itself) stop ancestor
    /// splitting during region-root insertion.
    fn is_region_boundary(&self, node: NodeHandle) -> bool;

    fn index_in_parent(&self, node: NodeHandle) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|c| *c == node)
    }

    fn contains(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Element descendants of `node` in tree order, optionally including
    /// `node` itself. Text nodes are skipped.
    fn element_descendants(&self, node: NodeHandle, include_self: bool) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = if include_self && !self.is_text(node) {
            vec![node]
        } else {
            self.children(node)
                .into_iter()
                .rev()
                .filter(|c| !self.is_text(*c))
                .collect()
        };
        while let Some(n) = stack.pop() {
            out.push(n);
            let mut children: Vec<_> = self
                .children(n)
                .into_iter()
                .filter(|c| !self.is_text(*c))
                .collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    // === Mutation ===

    fn insert_before(&mut self, node: NodeHandle, reference: NodeHandle) -> bool;

    fn insert_after(&mut self, node: NodeHandle, reference: NodeHandle) -> bool;

    fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) -> bool;

    fn remove(&mut self, node: NodeHandle) -> bool;

    /// Insert a detached node at a position inside the tree, splitting a text
    /// node when the position falls mid-text.
    fn insert_at(&mut self, node: NodeHandle, pos: Position) -> bool;

    /// Insert a detached node as a sibling immediately after the container,
    /// outside the editable area. Returns `false` if the host does not expose
    /// anything beyond the container.
    fn insert_after_container(&mut self, node: NodeHandle) -> bool;

    /// Wrap `node` in a new block element in place, returning the wrapper.
    fn wrap_in_block(&mut self, node: NodeHandle) -> NodeHandle;

    /// Split the parent of `pos.node` at `pos`, so that everything before the
    /// position stays in the original parent and the rest moves to a new
    /// sibling clone. Returns the position between the halves, one level up.
    fn split_at(&mut self, pos: Position) -> Option<Position>;

    /// Deep-clone a subtree into a detached node.
    fn clone_subtree(&mut self, node: NodeHandle) -> NodeHandle;

    // === Content ===

    /// Serialize the container children.
    fn serialize(&self) -> String;

    /// Serialize an arbitrary subtree (used for fragments and clones).
    fn serialize_node(&self, node: NodeHandle) -> String;

    /// Text content of a subtree, markup dropped.
    fn text_content(&self, node: NodeHandle) -> String;

    /// Replace the container children by deserializing `content`. Handles
    /// into the previous tree become stale.
    fn replace_content(&mut self, content: &str);

    /// Parse `html` into a detached fragment node, sanitized by the host.
    /// Returns `None` when nothing usable could be parsed.
    fn create_fragment(&mut self, html: &str) -> Option<NodeHandle>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeHandle;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> NodeHandle;

    // === Selection ===

    fn read_selection(&self) -> Option<DocumentSelection>;

    fn apply_selection(&mut self, selection: &DocumentSelection) -> bool;

    fn collapse_selection_to(&mut self, pos: Position) -> bool {
        self.apply_selection(&DocumentSelection::collapsed(pos))
    }

    /// Remove the content covered by the current range selection, collapsing
    /// it to its start. No-op for collapsed or non-range selections.
    fn delete_selection_contents(&mut self) -> bool;

    /// The position immediately after `node` in its parent.
    fn position_after(&self, node: NodeHandle) -> Option<Position> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        Some(Position::new(parent, index + 1))
    }

    // === Logical paths and ids ===

    fn path_of(&self, pos: Position) -> Option<NodePath> {
        let mut steps = Vec::new();
        let mut current = pos.node;
        while current != self.root() {
            steps.push(self.index_in_parent(current)?);
            current = self.parent(current)?;
        }
        steps.reverse();
        steps.push(pos.offset);
        Some(NodePath::from(steps))
    }

    fn resolve_path(&self, path: &NodePath) -> Option<Position> {
        let offset = path.offset()?;
        let mut node = self.root();
        for step in path.steps() {
            node = self.children(node).get(*step).copied()?;
        }
        let max = if self.is_text(node) {
            self.text_content(node).chars().count()
        } else {
            self.children(node).len()
        };
        if offset > max {
            return None;
        }
        Some(Position::new(node, offset))
    }

    fn element_id(&self, node: NodeHandle) -> Option<SmolStr>;

    fn find_by_id(&self, id: &str) -> Option<NodeHandle>;

    fn get_attribute(&self, node: NodeHandle, name: &str) -> Option<SmolStr>;

    fn set_attribute(&mut self, node: NodeHandle, name: &str, value: Option<&str>) -> bool;

    // === Colors ===

    /// Read the foreground (`background == false`) or background color
    /// declared on an element, if any.
    fn get_color(&self, node: NodeHandle, background: bool) -> Option<SmolStr>;

    fn set_color(&mut self, node: NodeHandle, background: bool, value: &str) -> bool;

    // === Focus ===

    fn focus(&mut self);

    fn blur(&mut self);

    fn has_focus(&self) -> bool;

    // === Fragments (shadow edit) ===

    /// Detach all container children into a fragment node and return it.
    fn detach_children(&mut self) -> NodeHandle;

    /// Clear the container and clone the fragment children into it. The
    /// fragment itself is left untouched for later re-cloning or restore.
    fn mirror_fragment(&mut self, fragment: NodeHandle);

    /// Clear the container and move the fragment children back into it,
    /// consuming the fragment.
    fn restore_fragment(&mut self, fragment: NodeHandle);
}

/// Convert a live selection into stable logical form.
///
/// Returns `None` when the selection cannot be expressed (stale handles, a
/// table or image without an id).
pub fn selection_to_metadata(
    doc: &dyn DocumentModel,
    selection: &DocumentSelection,
) -> Option<SelectionMetadata> {
    match selection {
        DocumentSelection::Range { start, end } => Some(SelectionMetadata::Normal {
            start: doc.path_of(*start)?,
            end: doc.path_of(*end)?,
        }),
        DocumentSelection::Table {
            table,
            first_cell,
            last_cell,
        } => Some(SelectionMetadata::Table {
            table_id: doc.element_id(*table)?,
            first_cell: *first_cell,
            last_cell: *last_cell,
        }),
        DocumentSelection::Image { image } => Some(SelectionMetadata::Image {
            image_id: doc.element_id(*image)?,
        }),
    }
}

/// Re-resolve logical selection metadata against the current tree.
pub fn resolve_metadata(
    doc: &dyn DocumentModel,
    metadata: &SelectionMetadata,
) -> Option<DocumentSelection> {
    match metadata {
        SelectionMetadata::Normal { start, end } => Some(DocumentSelection::Range {
            start: doc.resolve_path(start)?,
            end: doc.resolve_path(end)?,
        }),
        SelectionMetadata::Table {
            table_id,
            first_cell,
            last_cell,
        } => Some(DocumentSelection::Table {
            table: doc.find_by_id(table_id)?,
            first_cell: *first_cell,
            last_cell: *last_cell,
        }),
        SelectionMetadata::Image { image_id } => Some(DocumentSelection::Image {
            image: doc.find_by_id(image_id)?,
        }),
    }
}
