//! Arena-backed in-memory document model.
//!
//! [`MemoryDocument`] is a complete [`DocumentModel`] over a simple node
//! arena with a canonical markup serialization. It is the headless
//! counterpart to a browser-backed model: the test suites run on it, and
//! embedders can use it to drive the editor without any UI.
//!
//! The markup is a strict subset of HTML (lowercase tags, double-quoted
//! attributes, `<tag />` self-closing voids) and round-trips through
//! [`MemoryDocument::serialize`] byte-for-byte.

use std::collections::{BTreeMap, HashMap};

use smol_str::SmolStr;

use crate::dom::{DocumentModel, DocumentSelection, NodeHandle, Position};

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "table", "thead", "tbody",
    "tr", "td", "th", "blockquote", "pre",
];
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input"];
const FRAGMENT_TAG: &str = "#fragment";

#[derive(Clone, Debug)]
enum NodeKind {
    Element { tag: SmolStr },
    Text { text: String },
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    attrs: BTreeMap<SmolStr, SmolStr>,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl NodeData {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: SmolStr::new(tag),
            },
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_string(),
            },
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Text { .. } => None,
        }
    }
}

/// In-memory editable document.
pub struct MemoryDocument {
    nodes: HashMap<u64, NodeData>,
    next_id: u64,
    /// Parent of the container, standing in for the host page.
    host: NodeHandle,
    root: NodeHandle,
    selection: Option<DocumentSelection>,
    focused: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            next_id: 0,
            host: NodeHandle(0),
            root: NodeHandle(0),
            selection: None,
            focused: false,
        };
        doc.host = doc.alloc(NodeData::element("body"));
        doc.root = doc.alloc(NodeData::element("div"));
        doc.nodes.get_mut(&doc.root.0).unwrap().parent = Some(doc.host);
        doc.nodes.get_mut(&doc.host.0).unwrap().children.push(doc.root);
        doc
    }

    pub fn from_content(content: &str) -> Self {
        let mut doc = Self::new();
        doc.replace_content(content);
        doc
    }

    fn alloc(&mut self, data: NodeData) -> NodeHandle {
        self.next_id += 1;
        let handle = NodeHandle(self.next_id);
        self.nodes.insert(handle.0, data);
        handle
    }

    fn data(&self, node: NodeHandle) -> Option<&NodeData> {
        self.nodes.get(&node.0)
    }

    fn data_mut(&mut self, node: NodeHandle) -> Option<&mut NodeData> {
        self.nodes.get_mut(&node.0)
    }

    /// Create a detached element with an id attribute.
    pub fn create_element_with_id(&mut self, tag: &str, id: &str) -> NodeHandle {
        let node = self.create_element(tag);
        self.set_attribute(node, "id", Some(id));
        node
    }

    fn detach(&mut self, node: NodeHandle) {
        let Some(parent) = self.data(node).and_then(|d| d.parent) else {
            return;
        };
        if let Some(parent_data) = self.data_mut(parent) {
            parent_data.children.retain(|c| *c != node);
        }
        if let Some(data) = self.data_mut(node) {
            data.parent = None;
        }
    }

    fn drop_subtree(&mut self, node: NodeHandle) {
        let children = self.children(node);
        for child in children {
            self.drop_subtree(child);
        }
        self.nodes.remove(&node.0);
    }

    fn insert_into(&mut self, parent: NodeHandle, node: NodeHandle, index: usize) -> bool {
        if self.data(parent).is_none() || self.data(node).is_none() {
            return false;
        }
        self.detach(node);
        let Some(parent_data) = self.data_mut(parent) else {
            return false;
        };
        let index = index.min(parent_data.children.len());
        parent_data.children.insert(index, node);
        self.data_mut(node).unwrap().parent = Some(parent);
        true
    }

    fn clear_children(&mut self, node: NodeHandle) {
        for child in self.children(node) {
            self.drop_subtree(child);
        }
        if let Some(data) = self.data_mut(node) {
            data.children.clear();
        }
    }

    fn selection_is_valid(&self, selection: &DocumentSelection) -> bool {
        let position_ok = |pos: &Position| match self.data(pos.node) {
            Some(data) => match &data.kind {
                NodeKind::Text { text } => pos.offset <= text.chars().count(),
                NodeKind::Element { .. } => pos.offset <= data.children.len(),
            },
            None => false,
        };
        match selection {
            DocumentSelection::Range { start, end } => position_ok(start) && position_ok(end),
            DocumentSelection::Table { table, .. } => self.data(*table).is_some(),
            DocumentSelection::Image { image } => self.data(*image).is_some(),
        }
    }

    fn serialize_into(&self, node: NodeHandle, out: &mut String) {
        let Some(data) = self.data(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text { text } => out.push_str(&escape_text(text)),
            NodeKind::Element { tag } => {
                if tag.starts_with('#') {
                    for child in &data.children {
                        self.serialize_into(*child, out);
                    }
                    return;
                }
                out.push('<');
                out.push_str(tag);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                if VOID_TAGS.contains(&tag.as_str()) && data.children.is_empty() {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in &data.children {
                    self.serialize_into(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn parse_into(&mut self, parent: NodeHandle, input: &str) {
        let mut stack = vec![parent];
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let Some(lt) = rest.find('<') else {
                self.push_text(*stack.last().unwrap(), &rest[..]);
                break;
            };
            if lt > 0 {
                self.push_text(*stack.last().unwrap(), &rest[..lt]);
            }
            pos += lt;
            let rest = &input[pos..];

            if rest.starts_with("<!--") {
                pos = match rest.find("-->") {
                    Some(end) => pos + end + 3,
                    None => input.len(),
                };
                continue;
            }

            if rest.starts_with("</") {
                let Some(end) = rest.find('>') else {
                    break;
                };
                pos += end + 1;
                if stack.len() > 1 {
                    stack.pop();
                }
                continue;
            }

            let Some(end) = rest.find('>') else {
                break;
            };
            let tag_body = &rest[1..end];
            pos += end + 1;

            let self_closing = tag_body.ends_with('/');
            let tag_body = tag_body.trim_end_matches('/').trim();
            let (name, attr_text) = match tag_body.find(char::is_whitespace) {
                Some(split) => (&tag_body[..split], tag_body[split..].trim()),
                None => (tag_body, ""),
            };
            if name.is_empty() {
                continue;
            }

            let element = self.create_element(name);
            for (attr, value) in parse_attributes(attr_text) {
                self.set_attribute(element, &attr, Some(&value));
            }
            let top = *stack.last().unwrap();
            self.append_child(top, element);

            if !self_closing && !VOID_TAGS.contains(&name) {
                stack.push(element);
            }
        }
    }

    fn push_text(&mut self, parent: NodeHandle, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = self.alloc(NodeData::text(&unescape_text(raw)));
        self.insert_into(parent, text, usize::MAX);
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn unescape_text(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn parse_attributes(mut input: &str) -> Vec<(SmolStr, SmolStr)> {
    let mut attrs = Vec::new();
    loop {
        input = input.trim_start();
        if input.is_empty() {
            break;
        }
        let Some(eq) = input.find('=') else {
            break;
        };
        let name = input[..eq].trim();
        let rest = input[eq + 1..].trim_start();
        let Some(rest) = rest.strip_prefix('"') else {
            break;
        };
        let Some(close) = rest.find('"') else {
            break;
        };
        attrs.push((SmolStr::new(name), SmolStr::new(unescape_text(&rest[..close]))));
        input = &rest[close + 1..];
    }
    attrs
}

impl DocumentModel for MemoryDocument {
    fn root(&self) -> NodeHandle {
        self.root
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.data(node).and_then(|d| d.parent)
    }

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        self.data(node).map(|d| d.children.clone()).unwrap_or_default()
    }

    fn is_text(&self, node: NodeHandle) -> bool {
        matches!(self.data(node), Some(d) if matches!(d.kind, NodeKind::Text { .. }))
    }

    fn is_void(&self, node: NodeHandle) -> bool {
        self.data(node)
            .and_then(|d| d.tag())
            .is_some_and(|t| VOID_TAGS.contains(&t))
    }

    fn is_block(&self, node: NodeHandle) -> bool {
        self.data(node)
            .and_then(|d| d.tag())
            .is_some_and(|t| BLOCK_TAGS.contains(&t))
    }

    fn is_region_boundary(&self, node: NodeHandle) -> bool {
        if node == self.root {
            return true;
        }
        self.data(node)
            .and_then(|d| d.tag())
            .is_some_and(|t| t == "td" || t == "th")
    }

    fn insert_before(&mut self, node: NodeHandle, reference: NodeHandle) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        let Some(index) = self.index_in_parent(reference) else {
            return false;
        };
        self.insert_into(parent, node, index)
    }

    fn insert_after(&mut self, node: NodeHandle, reference: NodeHandle) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        let Some(index) = self.index_in_parent(reference) else {
            return false;
        };
        self.insert_into(parent, node, index + 1)
    }

    fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) -> bool {
        self.insert_into(parent, child, usize::MAX)
    }

    fn remove(&mut self, node: NodeHandle) -> bool {
        if self.data(node).is_none() || node == self.root || node == self.host {
            return false;
        }
        self.detach(node);
        self.drop_subtree(node);
        true
    }

    fn insert_at(&mut self, node: NodeHandle, pos: Position) -> bool {
        let Some(data) = self.data(pos.node) else {
            return false;
        };
        match &data.kind {
            NodeKind::Element { .. } => self.insert_into(pos.node, node, pos.offset),
            NodeKind::Text { text } => {
                let char_count = text.chars().count();
                if pos.offset == 0 {
                    self.insert_before(node, pos.node)
                } else if pos.offset >= char_count {
                    self.insert_after(node, pos.node)
                } else {
                    // Split the text node and drop the new node in between.
                    let byte = text
                        .char_indices()
                        .nth(pos.offset)
                        .map(|(i, _)| i)
                        .unwrap_or(text.len());
                    let tail_text = text[byte..].to_string();
                    if let Some(NodeKind::Text { text }) =
                        self.data_mut(pos.node).map(|d| &mut d.kind)
                    {
                        text.truncate(byte);
                    }
                    let tail = self.alloc(NodeData::text(&tail_text));
                    self.insert_after(tail, pos.node)
                        && self.insert_before(node, tail)
                }
            }
        }
    }

    fn insert_after_container(&mut self, node: NodeHandle) -> bool {
        let root = self.root;
        self.insert_after(node, root)
    }

    fn wrap_in_block(&mut self, node: NodeHandle) -> NodeHandle {
        let wrapper = self.create_element("div");
        if self.parent(node).is_some() {
            self.insert_before(wrapper, node);
        }
        self.append_child(wrapper, node);
        wrapper
    }

    fn split_at(&mut self, pos: Position) -> Option<Position> {
        let parent = self.parent(pos.node)?;
        let index = self.index_in_parent(pos.node)?;
        let data = self.data(pos.node)?;

        let sibling_data = match &data.kind {
            NodeKind::Text { text } => {
                let byte = text
                    .char_indices()
                    .nth(pos.offset)
                    .map(|(i, _)| i)
                    .unwrap_or(text.len());
                let tail = text[byte..].to_string();
                if let Some(NodeKind::Text { text }) = self.data_mut(pos.node).map(|d| &mut d.kind)
                {
                    text.truncate(byte);
                }
                NodeData::text(&tail)
            }
            NodeKind::Element { tag } => {
                let mut clone = NodeData::element(tag.as_str());
                clone.attrs = data.attrs.clone();
                // The id stays with the first half.
                clone.attrs.remove("id");
                clone
            }
        };
        let sibling = self.alloc(sibling_data);

        // For elements, move the children after the split point across.
        let moved: Vec<NodeHandle> = self
            .data(pos.node)
            .map(|d| d.children.iter().skip(pos.offset).copied().collect())
            .unwrap_or_default();
        for child in moved {
            self.detach(child);
            self.append_child(sibling, child);
        }

        self.insert_into(parent, sibling, index + 1);
        Some(Position::new(parent, index + 1))
    }

    fn clone_subtree(&mut self, node: NodeHandle) -> NodeHandle {
        let data = match self.data(node) {
            Some(d) => d.clone(),
            None => return NodeHandle(0),
        };
        let mut clone_data = data.clone();
        clone_data.parent = None;
        clone_data.children = Vec::new();
        let clone = self.alloc(clone_data);
        for child in data.children {
            let child_clone = self.clone_subtree(child);
            self.append_child(clone, child_clone);
        }
        clone
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root) {
            self.serialize_into(child, &mut out);
        }
        out
    }

    fn serialize_node(&self, node: NodeHandle) -> String {
        let mut out = String::new();
        self.serialize_into(node, &mut out);
        out
    }

    fn text_content(&self, node: NodeHandle) -> String {
        let Some(data) = self.data(node) else {
            return String::new();
        };
        match &data.kind {
            NodeKind::Text { text } => text.clone(),
            NodeKind::Element { .. } => data
                .children
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    fn replace_content(&mut self, content: &str) {
        let root = self.root;
        self.clear_children(root);
        self.selection = None;
        self.parse_into(root, content);
    }

    fn create_fragment(&mut self, html: &str) -> Option<NodeHandle> {
        let fragment = self.create_element(FRAGMENT_TAG);
        self.parse_into(fragment, html);
        if self.children(fragment).is_empty() {
            self.nodes.remove(&fragment.0);
            return None;
        }
        Some(fragment)
    }

    fn create_element(&mut self, tag: &str) -> NodeHandle {
        self.alloc(NodeData::element(tag))
    }

    fn create_text(&mut self, text: &str) -> NodeHandle {
        self.alloc(NodeData::text(text))
    }

    fn read_selection(&self) -> Option<DocumentSelection> {
        self.selection
            .filter(|selection| self.selection_is_valid(selection))
    }

    fn apply_selection(&mut self, selection: &DocumentSelection) -> bool {
        if !self.selection_is_valid(selection) {
            return false;
        }
        self.selection = Some(*selection);
        true
    }

    fn delete_selection_contents(&mut self) -> bool {
        let Some(DocumentSelection::Range { start, end }) = self.read_selection() else {
            return false;
        };
        if start == end {
            return false;
        }
        if start.node != end.node {
            // Cross-node deletion is host territory; degrade to a no-op.
            return false;
        }
        let node = start.node;
        let (from, to) = (start.offset.min(end.offset), start.offset.max(end.offset));
        let Some(data) = self.data(node) else {
            return false;
        };
        match &data.kind {
            NodeKind::Text { text } => {
                let chars: Vec<char> = text.chars().collect();
                let to = to.min(chars.len());
                let new_text: String = chars[..from].iter().chain(chars[to..].iter()).collect();
                if let Some(NodeKind::Text { text }) = self.data_mut(node).map(|d| &mut d.kind) {
                    *text = new_text;
                }
            }
            NodeKind::Element { .. } => {
                let doomed: Vec<NodeHandle> = data
                    .children
                    .iter()
                    .skip(from)
                    .take(to - from)
                    .copied()
                    .collect();
                for child in doomed {
                    self.remove(child);
                }
            }
        }
        self.selection = Some(DocumentSelection::collapsed(Position::new(node, from)));
        true
    }

    fn element_id(&self, node: NodeHandle) -> Option<SmolStr> {
        self.data(node).and_then(|d| d.attrs.get("id").cloned())
    }

    fn find_by_id(&self, id: &str) -> Option<NodeHandle> {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.element_id(node).is_some_and(|i| i == id) {
                return Some(node);
            }
            stack.extend(self.children(node));
        }
        None
    }

    fn get_attribute(&self, node: NodeHandle, name: &str) -> Option<SmolStr> {
        self.data(node).and_then(|d| d.attrs.get(name).cloned())
    }

    fn set_attribute(&mut self, node: NodeHandle, name: &str, value: Option<&str>) -> bool {
        let Some(data) = self.data_mut(node) else {
            return false;
        };
        match value {
            Some(value) => {
                data.attrs.insert(SmolStr::new(name), SmolStr::new(value));
            }
            None => {
                data.attrs.remove(name);
            }
        }
        true
    }

    fn get_color(&self, node: NodeHandle, background: bool) -> Option<SmolStr> {
        let name = if background { "background-color" } else { "color" };
        self.get_attribute(node, name)
    }

    fn set_color(&mut self, node: NodeHandle, background: bool, value: &str) -> bool {
        let name = if background { "background-color" } else { "color" };
        self.set_attribute(node, name, Some(value))
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn detach_children(&mut self) -> NodeHandle {
        let fragment = self.create_element(FRAGMENT_TAG);
        for child in self.children(self.root) {
            self.detach(child);
            self.append_child(fragment, child);
        }
        self.selection = None;
        fragment
    }

    fn mirror_fragment(&mut self, fragment: NodeHandle) {
        let root = self.root;
        self.clear_children(root);
        for child in self.children(fragment) {
            let clone = self.clone_subtree(child);
            self.append_child(root, clone);
        }
    }

    fn restore_fragment(&mut self, fragment: NodeHandle) {
        let root = self.root;
        self.clear_children(root);
        for child in self.children(fragment) {
            self.detach(child);
            self.append_child(root, child);
        }
        self.nodes.remove(&fragment.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodePath;

    #[test]
    fn test_serialize_round_trip() {
        let content = "<p>hello <b>world</b></p><img id=\"i1\" />";
        let doc = MemoryDocument::from_content(content);
        assert_eq!(doc.serialize(), content);
    }

    #[test]
    fn test_text_escaping_round_trip() {
        let doc = MemoryDocument::from_content("<p>a &lt;b&gt; &amp; c</p>");
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.text_content(p), "a <b> & c");
        assert_eq!(doc.serialize(), "<p>a &lt;b&gt; &amp; c</p>");
    }

    #[test]
    fn test_comments_are_dropped() {
        let doc = MemoryDocument::from_content("<p>x</p><!--ignored-->");
        assert_eq!(doc.serialize(), "<p>x</p>");
    }

    #[test]
    fn test_path_round_trip() {
        let doc = MemoryDocument::from_content("<p>hi</p><div><b>there</b></div>");
        let div = doc.children(doc.root())[1];
        let b = doc.children(div)[0];
        let text = doc.children(b)[0];

        let pos = Position::new(text, 2);
        let path = doc.path_of(pos).unwrap();
        assert_eq!(path, NodePath::from(vec![1, 0, 0, 2]));
        assert_eq!(doc.resolve_path(&path), Some(pos));
    }

    #[test]
    fn test_resolve_stale_path_fails() {
        let doc = MemoryDocument::from_content("<p>hi</p>");
        assert!(doc.resolve_path(&NodePath::from(vec![3, 0])).is_none());
        // Offset past the end of the text node.
        assert!(doc.resolve_path(&NodePath::from(vec![0, 0, 99])).is_none());
    }

    #[test]
    fn test_insert_at_splits_text() {
        let mut doc = MemoryDocument::from_content("<p>helloworld</p>");
        let p = doc.children(doc.root())[0];
        let text = doc.children(p)[0];

        let br = doc.create_element("br");
        assert!(doc.insert_at(br, Position::new(text, 5)));
        assert_eq!(doc.serialize(), "<p>hello<br />world</p>");
    }

    #[test]
    fn test_split_at_element() {
        let mut doc = MemoryDocument::from_content("<div id=\"d\"><p>a</p><p>b</p></div>");
        let div = doc.children(doc.root())[0];

        let pos = doc.split_at(Position::new(div, 1)).unwrap();
        assert_eq!(pos, Position::new(doc.root(), 1));
        // The id stays on the first half.
        assert_eq!(doc.serialize(), "<div id=\"d\"><p>a</p></div><div><p>b</p></div>");
    }

    #[test]
    fn test_delete_selection_in_text() {
        let mut doc = MemoryDocument::from_content("<p>hello world</p>");
        let p = doc.children(doc.root())[0];
        let text = doc.children(p)[0];

        doc.apply_selection(&DocumentSelection::Range {
            start: Position::new(text, 5),
            end: Position::new(text, 11),
        });
        assert!(doc.delete_selection_contents());
        assert_eq!(doc.serialize(), "<p>hello</p>");
        assert!(doc.read_selection().unwrap().is_collapsed());
    }

    #[test]
    fn test_selection_invalidated_by_replace() {
        let mut doc = MemoryDocument::from_content("<p>hello</p>");
        let p = doc.children(doc.root())[0];
        doc.apply_selection(&DocumentSelection::collapsed(Position::new(p, 0)));
        assert!(doc.read_selection().is_some());

        doc.replace_content("<p>other</p>");
        assert!(doc.read_selection().is_none());
    }

    #[test]
    fn test_fragment_detach_mirror_restore() {
        let mut doc = MemoryDocument::from_content("<p>keep</p>");
        let original = doc.serialize();

        let fragment = doc.detach_children();
        assert_eq!(doc.serialize(), "");

        doc.mirror_fragment(fragment);
        assert_eq!(doc.serialize(), original);

        // Mutate the mirror, then restore the original.
        let p = doc.children(doc.root())[0];
        doc.remove(p);
        doc.mirror_fragment(fragment);
        assert_eq!(doc.serialize(), original);

        doc.restore_fragment(fragment);
        assert_eq!(doc.serialize(), original);
    }

    #[test]
    fn test_find_by_id() {
        let doc =
            MemoryDocument::from_content("<table id=\"t1\"><tr><td>x</td></tr></table>");
        assert!(doc.find_by_id("t1").is_some());
        assert!(doc.find_by_id("missing").is_none());
    }

    #[test]
    fn test_wrap_in_block() {
        let mut doc = MemoryDocument::from_content("<p>a</p>");
        let root = doc.root();
        let span = doc.create_element("span");
        doc.append_child(root, span);

        let wrapper = doc.wrap_in_block(span);
        assert!(doc.is_block(wrapper));
        assert_eq!(doc.parent(span), Some(wrapper));
        assert_eq!(doc.serialize(), "<p>a</p><div><span></span></div>");
    }
}
