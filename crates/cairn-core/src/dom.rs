//! In-memory element tree implementing [`Document`].
//!
//! `Dom` keeps every element in a `slotmap` arena. Parent/child links live
//! in secondary maps so removal is O(subtree size) and lookup is O(1).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::layout::Rect;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::document::Document;

new_key_type! {
    /// Unique identifier for an element. Copy, lightweight (u64).
    pub struct NodeId;
}

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique element id such as `"tablist-3"`.
pub fn generate_element_id(prefix: &str) -> String {
    let n = NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}

/// Data associated with a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Attributes, including `id`, `role` and every `aria-*` / `data-*` one.
    pub attrs: BTreeMap<String, String>,
    /// CSS classes.
    pub classes: Vec<String>,
    /// Text owned by this element.
    pub text: String,
    /// Layout rectangle in viewport coordinates.
    pub rect: Rect,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `role` attribute (builder).
    pub fn role(self, role: &str) -> Self {
        self.attr("role", role)
    }

    /// Set the `id` attribute (builder).
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set an arbitrary attribute (builder).
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Add a CSS class (builder). Duplicates are ignored.
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_owned());
        }
        self
    }

    /// Set the element's own text (builder).
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    /// Set the layout rectangle (builder).
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

/// The element tree, backed by a slotmap arena.
#[derive(Default)]
pub struct Dom {
    nodes: SlotMap<NodeId, Element>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    viewport: Rect,
    focused: Option<NodeId>,
    scrolled: Vec<NodeId>,
}

impl Dom {
    /// Create an empty tree with a zero-sized viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given viewport.
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// The first root-level element inserted.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a root-level element (no parent).
    pub fn insert(&mut self, element: Element) -> NodeId {
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Append an element as the last child of `parent`.
    ///
    /// Falls back to a root-level insert when `parent` is not in the tree.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        if !self.nodes.contains_key(parent) {
            return self.insert(element);
        }
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        id
    }

    /// Remove an element and all its descendants.
    ///
    /// Returns the removed element, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<Element> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut stack = vec![id];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.remove(current) {
                stack.extend(kids);
            }
            self.parent.remove(current);
            if self.focused == Some(current) {
                self.focused = None;
            }
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Direct children of `node`.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Borrow an element.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node)
    }

    /// Replace the layout rectangle of `node`.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.rect = rect;
        }
    }

    /// Replace the element's own text.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.text = text.to_owned();
        }
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Move focus away from every element.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Every element that was asked to scroll into view, oldest first.
    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Forget the scroll history.
    pub fn clear_scrolled(&mut self) {
        self.scrolled.clear();
    }
}

impl Document for Dom {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent.get(node).copied()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node)?.attrs.get(name).map(String::as_str)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.attrs.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        let Some(el) = self.nodes.get_mut(node) else {
            return;
        };
        let present = el.classes.iter().any(|c| c == class);
        if on && !present {
            el.classes.push(class.to_owned());
        } else if !on && present {
            el.classes.retain(|c| c != class);
        }
    }

    fn own_text(&self, node: NodeId) -> &str {
        self.nodes.get(node).map_or("", |el| el.text.as_str())
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.nodes.get(node).map(|el| el.rect).unwrap_or_default()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.nodes
            .iter()
            .find(|(_, el)| el.attrs.get("id").is_some_and(|v| v == id))
            .map(|(key, _)| key)
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) {
        if self.nodes.contains_key(node) {
            self.focused = Some(node);
        }
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if self.nodes.contains_key(node) {
            self.scrolled.push(node);
        }
    }
}
