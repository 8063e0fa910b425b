//! Node insertion with positional semantics.
//!
//! `insert_node` is the most composed primitive: it moves focus, wraps its
//! mutation in a dark-mode color transform, and resolves the insertion point
//! from block boundaries, the live selection, or an explicit range, all
//! through the API table, so overriding any of those primitives affects
//! insertion too.

use std::cell::Cell;
use std::rc::Rc;

use crate::color::ColorTransformDirection;
use crate::core::EditorCore;
use crate::dom::{DocumentSelection, NodeHandle, Position};

/// Where to insert relative to existing content.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InsertPosition {
    /// Adjacent to the boundary of the first block element.
    Begin,
    /// Adjacent to the boundary of the last block element.
    End,
    /// As the very last child of the container.
    DomEnd,
    /// As a sibling after the container, outside the editable area.
    Outside,
    /// At the start of the current selection.
    #[default]
    SelectionStart,
    /// At the start of an explicit range.
    Range(DocumentSelection),
}

/// Options for `insert_node`.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertOption {
    pub position: InsertPosition,
    /// Focus first and leave the caret after the inserted node.
    pub update_cursor: bool,
    /// Delete a non-collapsed selection before inserting.
    pub replace_selection: bool,
    /// Keep the inserted content on its own line, wrapping it in a block
    /// when it is not one.
    pub insert_on_new_line: bool,
    /// With `insert_on_new_line`: split ancestors up to the nearest region
    /// boundary (table cell or container) and insert between the halves.
    pub insert_to_region_root: bool,
}

impl Default for InsertOption {
    fn default() -> Self {
        Self {
            position: InsertPosition::SelectionStart,
            update_cursor: true,
            replace_selection: true,
            insert_on_new_line: false,
            insert_to_region_root: false,
        }
    }
}

/// Standard `insert_node`. Returns whether anything was inserted; invalid
/// options degrade to the default rather than failing.
pub fn insert_node(core: &mut EditorCore, node: NodeHandle, option: Option<InsertOption>) -> bool {
    let option = option.unwrap_or_default();

    if option.update_cursor {
        let focus = core.api.focus.clone();
        focus(core);
    }

    if option.position == InsertPosition::Outside {
        return core.document.insert_after_container(node);
    }

    // The mutation runs inside a transform pass so inserted content picks up
    // dark-mode colors along with everything else it drags into the tree.
    let inserted = Rc::new(Cell::new(false));
    let flag = inserted.clone();
    let transform = core.api.transform_color.clone();
    transform(
        core,
        Some(node),
        true,
        Some(Box::new(move |core: &mut EditorCore| {
            flag.set(insert_at_position(core, node, &option));
        })),
        ColorTransformDirection::LightToDark,
        false,
    );
    inserted.get()
}

fn insert_at_position(core: &mut EditorCore, node: NodeHandle, option: &InsertOption) -> bool {
    let root = core.document.root();
    let ok = match &option.position {
        InsertPosition::Begin => insert_at_edge(core, node, option, true),
        InsertPosition::End => insert_at_edge(core, node, option, false),
        InsertPosition::DomEnd => core.document.append_child(root, node),
        // Handled before the transform pass; nothing to do here.
        InsertPosition::Outside => false,
        InsertPosition::SelectionStart => insert_at_selection(core, node, option, None),
        InsertPosition::Range(range) => insert_at_selection(core, node, option, Some(*range)),
    };

    if ok && option.insert_on_new_line && !core.document.is_block(node) {
        core.document.wrap_in_block(node);
    }
    ok
}

/// Begin/End insertion: find the first/last block child and insert adjacent
/// to its boundary node. An empty container falls back to a plain append.
fn insert_at_edge(core: &mut EditorCore, node: NodeHandle, option: &InsertOption, begin: bool) -> bool {
    let doc = &mut core.document;
    let root = doc.root();
    let children = doc.children(root);

    let block = if begin {
        children.iter().copied().find(|c| doc.is_block(*c))
    } else {
        children.iter().rev().copied().find(|c| doc.is_block(*c))
    };

    let Some(block) = block else {
        // No block-level child: fall back to the container edge.
        return match children.first().filter(|_| begin) {
            Some(first) => doc.insert_before(node, *first),
            None => doc.append_child(root, node),
        };
    };

    if option.insert_on_new_line {
        // On its own line: outside the block entirely.
        return if begin {
            doc.insert_before(node, block)
        } else {
            doc.insert_after(node, block)
        };
    }

    let boundary = if begin {
        doc.children(block).first().copied()
    } else {
        doc.children(block).last().copied()
    };
    match boundary {
        None => doc.append_child(block, node),
        // Text and void boundaries cannot host children: insert as sibling.
        Some(b) if doc.is_text(b) || doc.is_void(b) => {
            if begin {
                doc.insert_before(node, b)
            } else {
                doc.insert_after(node, b)
            }
        }
        Some(b) => {
            if begin {
                match doc.children(b).first().copied() {
                    Some(inner) => doc.insert_before(node, inner),
                    None => doc.append_child(b, node),
                }
            } else {
                doc.append_child(b, node)
            }
        }
    }
}

fn insert_at_selection(
    core: &mut EditorCore,
    node: NodeHandle,
    option: &InsertOption,
    explicit: Option<DocumentSelection>,
) -> bool {
    let selection = match explicit {
        Some(range) => {
            if !core.document.apply_selection(&range) {
                return false;
            }
            Some(range)
        }
        None => {
            let get_selection = core.api.get_selection.clone();
            get_selection(core, true)
        }
    };
    let Some(DocumentSelection::Range { start, end }) = selection else {
        return false;
    };

    if option.replace_selection && start != end {
        core.document.delete_selection_contents();
    }

    let mut pos = start;
    if option.insert_on_new_line {
        pos = if option.insert_to_region_root {
            split_to_region_root(core, pos)
        } else {
            after_enclosing_block(core, pos)
        };
    }

    if !core.document.insert_at(node, pos) {
        return false;
    }

    if option.update_cursor {
        if let Some(after) = core.document.position_after(node) {
            core.document.collapse_selection_to(after);
            core.dom_event.selection_cache = Some(DocumentSelection::collapsed(after));
        }
    }
    true
}

/// Walk up from `pos`, splitting each ancestor at the position, until the
/// node holding the position is a region boundary (table cell or container).
fn split_to_region_root(core: &mut EditorCore, pos: Position) -> Position {
    let mut pos = pos;
    while !core.document.is_region_boundary(pos.node) {
        if core.document.parent(pos.node).is_none() {
            break;
        }
        match core.document.split_at(pos) {
            Some(next) => pos = next,
            None => break,
        }
    }
    pos
}

/// The position just after the block enclosing `pos`, so the insertion lands
/// on a fresh line below it.
fn after_enclosing_block(core: &mut EditorCore, pos: Position) -> Position {
    let mut node = pos.node;
    while let Some(parent) = core.document.parent(node) {
        if core.document.is_block(node) {
            break;
        }
        if parent == core.document.root() {
            break;
        }
        node = parent;
    }
    core.document.position_after(node).unwrap_or(pos)
}
