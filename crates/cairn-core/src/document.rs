//! The container snapshot interface controllers depend on.
//!
//! Group and popup controllers never cache member state. Every query goes
//! back through a [`Document`], so an attribute changed by the host between
//! two inputs is seen on the next one. [`Dom`](crate::dom::Dom) is the
//! in-memory implementation; a host embedding cairn in another tree only has
//! to implement the required methods.

use crate::dom::NodeId;
use ratatui::layout::Rect;

/// Read/write access to a live element tree.
///
/// All methods must tolerate unknown or removed node ids: reads return
/// `None`, empty collections or defaults, writes do nothing.
pub trait Document {
    /// Whether `node` is currently part of the tree.
    fn contains(&self, node: NodeId) -> bool;

    /// The parent element, if any.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// All descendants of `node` in document order, excluding `node` itself.
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    /// Attribute value.
    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Set an attribute, creating it if needed.
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attr(&mut self, node: NodeId, name: &str);

    /// Whether `node` carries the CSS class `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add (`on == true`) or remove a CSS class.
    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    /// Text directly owned by `node` (not its descendants).
    fn own_text(&self, node: NodeId) -> &str;

    /// Layout rectangle of `node`, in viewport coordinates.
    fn rect(&self, node: NodeId) -> Rect;

    /// The visible viewport rectangle.
    fn viewport(&self) -> Rect;

    /// Look up an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// The element holding input focus.
    fn focused(&self) -> Option<NodeId>;

    /// Move input focus to `node`.
    fn focus(&mut self, node: NodeId);

    /// Ask the host to bring `node` into view.
    fn scroll_into_view(&mut self, node: NodeId);

    /// The `role` attribute.
    fn role(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "role")
    }

    /// Whether the attribute reads exactly `"true"`.
    fn is_true(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name) == Some("true")
    }

    /// The nearest inclusive ancestor of `node` satisfying `pred`.
    fn closest<F>(&self, node: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
        Self: Sized,
    {
        let mut current = Some(node).filter(|n| self.contains(*n));
        while let Some(n) = current {
            if pred(n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool
    where
        Self: Sized,
    {
        self.closest(node, |n| n == ancestor).is_some()
    }

    /// Concatenated text of `node` and all of its descendants.
    fn text_content(&self, node: NodeId) -> String {
        let mut text = self.own_text(node).to_owned();
        for child in self.descendants(node) {
            text.push_str(self.own_text(child));
        }
        text
    }

    /// Parsed `tabindex` attribute.
    fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.attr(node, "tabindex").and_then(|v| v.trim().parse().ok())
    }

    /// Set the `tabindex` attribute.
    fn set_tab_index(&mut self, node: NodeId, index: i32) {
        self.set_attr(node, "tabindex", &index.to_string());
    }
}
