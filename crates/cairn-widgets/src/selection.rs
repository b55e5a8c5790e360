//! Live member queries over a composite-widget container.
//!
//! `SelectionModel` caches nothing but the container and its role. Every
//! query walks the [`Document`] again, so members added, removed, disabled
//! or reselected by the host between two inputs are always seen.

use cairn_core::document::Document;
use cairn_core::dom::NodeId;

use crate::role::{Orientation, Role, RoleProfile};

/// Role-driven, side-effect-free queries over one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionModel {
    container: NodeId,
    role: Option<Role>,
}

impl SelectionModel {
    /// Resolve the container's role once. An unknown or missing role gives
    /// a model whose member queries are always empty.
    pub fn new<D: Document>(doc: &D, container: NodeId) -> Self {
        let role = doc.role(container).and_then(|r| r.parse().ok());
        Self { container, role }
    }

    /// The container element.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The resolved role, if it has a profile.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// The role's static profile.
    pub fn profile(&self) -> Option<&'static RoleProfile> {
        self.role.map(Role::profile)
    }

    /// Whether `node` carries one of the role's member roles.
    pub fn is_member<D: Document>(&self, doc: &D, node: NodeId) -> bool {
        match (self.profile(), doc.role(node)) {
            (Some(profile), Some(role)) => profile.member_roles.iter().any(|r| *r == role),
            _ => false,
        }
    }

    /// Every member in document order.
    pub fn all_members<D: Document>(&self, doc: &D) -> Vec<NodeId> {
        if self.role.is_none() {
            return Vec::new();
        }
        doc.descendants(self.container)
            .into_iter()
            .filter(|&n| self.is_member(doc, n))
            .collect()
    }

    /// Members that are neither disabled nor hidden.
    pub fn active_members<D: Document>(&self, doc: &D) -> Vec<NodeId> {
        self.all_members(doc)
            .into_iter()
            .filter(|&n| !is_inactive(doc, n))
            .collect()
    }

    /// Whether `node` reads as selected under this role's selection attribute.
    pub fn is_selected<D: Document>(&self, doc: &D, node: NodeId) -> bool {
        self.profile()
            .is_some_and(|p| doc.is_true(node, p.selection_attr.name()))
    }

    /// The first active member marked selected.
    pub fn selected<D: Document>(&self, doc: &D) -> Option<NodeId> {
        self.active_members(doc)
            .into_iter()
            .find(|&n| self.is_selected(doc, n))
    }

    /// Whether the container is `aria-multiselectable`.
    pub fn is_multi<D: Document>(&self, doc: &D) -> bool {
        doc.is_true(self.container, "aria-multiselectable")
    }

    /// Whether the container is `aria-disabled`.
    pub fn is_disabled<D: Document>(&self, doc: &D) -> bool {
        doc.is_true(self.container, "aria-disabled")
    }

    /// Whether the container is `aria-readonly`.
    pub fn is_readonly<D: Document>(&self, doc: &D) -> bool {
        doc.is_true(self.container, "aria-readonly")
    }

    /// Grids, and listboxes carrying the `grid` class, navigate in two
    /// dimensions.
    pub fn is_grid<D: Document>(&self, doc: &D) -> bool {
        match self.role {
            Some(Role::Grid) => true,
            Some(Role::Listbox) => doc.has_class(self.container, "grid"),
            _ => false,
        }
    }

    /// Navigation direction: horizontal in grid mode, else the container's
    /// valid `aria-orientation`, else the role default.
    pub fn orientation<D: Document>(&self, doc: &D) -> Orientation {
        if self.is_grid(doc) {
            return Orientation::Horizontal;
        }
        doc.attr(self.container, "aria-orientation")
            .and_then(|o| o.parse().ok())
            .or_else(|| self.profile().map(|p| p.orientation))
            .unwrap_or(Orientation::Vertical)
    }

    /// How many members fit on one grid row: the container width divided
    /// by the first active member's width. `None` when there is no member
    /// or it has no width.
    pub fn grid_columns<D: Document>(&self, doc: &D) -> Option<usize> {
        let first = *self.active_members(doc).first()?;
        let member_width = doc.rect(first).width;
        if member_width == 0 {
            return None;
        }
        Some(usize::from(doc.rect(self.container).width / member_width))
    }
}

/// Whether a member is `aria-disabled` or `aria-hidden`.
pub fn is_inactive<D: Document>(doc: &D, node: NodeId) -> bool {
    doc.is_true(node, "aria-disabled") || doc.is_true(node, "aria-hidden")
}

/// One step of linear navigation over `count` items, wrapping at both ends.
///
/// With no current item, forward lands on the first item and backward goes
/// nowhere.
pub fn step_wrapping(current: Option<usize>, count: usize, forward: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => None,
        (Some(i), true) => Some(if i + 1 >= count { 0 } else { i + 1 }),
        (Some(i), false) => Some(if i == 0 { count - 1 } else { i - 1 }),
    }
}

/// One step of grid navigation over `count` items laid out `columns` wide.
///
/// `delta_rows`/`delta_cols` are -1, 0 or 1. Moves never wrap; a move that
/// leaves `0..count` returns `None`.
pub fn step_grid(
    current: Option<usize>,
    count: usize,
    columns: Option<usize>,
    delta_rows: i64,
    delta_cols: i64,
) -> Option<usize> {
    let index = current.map_or(-1, |i| i as i64);
    let last = count as i64 - 1;
    if (delta_rows < 0 || delta_cols < 0) && index <= 0 {
        return None;
    }
    if (delta_rows > 0 || delta_cols > 0) && index >= last {
        return None;
    }
    let offset = if delta_rows != 0 {
        delta_rows * columns? as i64
    } else {
        delta_cols
    };
    let next = index + offset;
    (0..=last).contains(&next).then_some(next as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::dom::{Dom, Element};
    use ratatui::layout::Rect;

    fn listbox() -> (Dom, NodeId, Vec<NodeId>) {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("listbox"));
        let a = dom.append(root, Element::new().role("option").text("a"));
        let b = dom.append(
            root,
            Element::new()
                .role("option")
                .attr("aria-selected", "true")
                .text("b"),
        );
        let group = dom.append(root, Element::new().role("group"));
        let c = dom.append(group, Element::new().role("option").text("c"));
        dom.append(root, Element::new().role("separator"));
        (dom, root, vec![a, b, c])
    }

    #[test]
    fn members_include_nested_in_document_order() {
        let (dom, root, opts) = listbox();
        let model = SelectionModel::new(&dom, root);
        assert_eq!(model.all_members(&dom), opts);
    }

    #[test]
    fn inactive_members_are_excluded() {
        let (mut dom, root, opts) = listbox();
        let model = SelectionModel::new(&dom, root);
        dom.set_attr(opts[0], "aria-disabled", "true");
        dom.set_attr(opts[2], "aria-hidden", "true");
        assert_eq!(model.active_members(&dom), vec![opts[1]]);
        assert_eq!(model.all_members(&dom).len(), 3);
    }

    #[test]
    fn selected_ignores_hidden_members() {
        let (mut dom, root, opts) = listbox();
        let model = SelectionModel::new(&dom, root);
        assert_eq!(model.selected(&dom), Some(opts[1]));
        dom.set_attr(opts[1], "aria-hidden", "true");
        assert_eq!(model.selected(&dom), None);
    }

    #[test]
    fn unknown_role_has_no_members() {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("toolbar"));
        dom.append(root, Element::new().role("button"));
        let model = SelectionModel::new(&dom, root);
        assert_eq!(model.role(), None);
        assert!(model.all_members(&dom).is_empty());
        assert_eq!(model.orientation(&dom), Orientation::Vertical);
    }

    #[test]
    fn grid_mode_and_orientation() {
        let (mut dom, root, _) = listbox();
        let model = SelectionModel::new(&dom, root);
        assert!(!model.is_grid(&dom));
        assert_eq!(model.orientation(&dom), Orientation::Vertical);

        dom.set_attr(root, "aria-orientation", "horizontal");
        assert_eq!(model.orientation(&dom), Orientation::Horizontal);

        dom.set_attr(root, "aria-orientation", "vertical");
        dom.set_class(root, "grid", true);
        assert!(model.is_grid(&dom));
        assert_eq!(model.orientation(&dom), Orientation::Horizontal);
    }

    #[test]
    fn invalid_orientation_falls_back_to_role_default() {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("tablist").attr("aria-orientation", "up"));
        let model = SelectionModel::new(&dom, root);
        assert_eq!(model.orientation(&dom), Orientation::Horizontal);
    }

    #[test]
    fn grid_columns_from_widths() {
        let (mut dom, root, opts) = listbox();
        let model = SelectionModel::new(&dom, root);
        assert_eq!(model.grid_columns(&dom), None);
        dom.set_rect(root, Rect::new(0, 0, 40, 10));
        for &o in &opts {
            dom.set_rect(o, Rect::new(0, 0, 12, 3));
        }
        assert_eq!(model.grid_columns(&dom), Some(3));
    }

    #[test]
    fn container_flags() {
        let (mut dom, root, _) = listbox();
        let model = SelectionModel::new(&dom, root);
        assert!(!model.is_multi(&dom));
        dom.set_attr(root, "aria-multiselectable", "true");
        dom.set_attr(root, "aria-readonly", "true");
        assert!(model.is_multi(&dom));
        assert!(model.is_readonly(&dom));
        assert!(!model.is_disabled(&dom));
    }

    #[test]
    fn wrapping_steps() {
        assert_eq!(step_wrapping(Some(2), 3, true), Some(0));
        assert_eq!(step_wrapping(Some(0), 3, false), Some(2));
        assert_eq!(step_wrapping(Some(1), 3, true), Some(2));
        assert_eq!(step_wrapping(None, 3, true), Some(0));
        assert_eq!(step_wrapping(None, 3, false), None);
        assert_eq!(step_wrapping(None, 0, true), None);
    }

    #[test]
    fn grid_steps_never_wrap() {
        // 3 columns, 8 items
        assert_eq!(step_grid(Some(4), 8, Some(3), 1, 0), Some(7));
        assert_eq!(step_grid(Some(5), 8, Some(3), 1, 0), None);
        assert_eq!(step_grid(Some(1), 8, Some(3), -1, 0), None);
        assert_eq!(step_grid(Some(4), 8, Some(3), -1, 0), Some(1));
        assert_eq!(step_grid(Some(0), 8, Some(3), 0, -1), None);
        assert_eq!(step_grid(Some(7), 8, Some(3), 0, 1), None);
        assert_eq!(step_grid(Some(3), 8, Some(3), 0, 1), Some(4));
        assert_eq!(step_grid(Some(3), 8, None, 1, 0), None);
    }
}
