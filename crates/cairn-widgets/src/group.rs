//! Keyboard and pointer interaction for composite widgets.
//!
//! A [`Group`] is attached to a container whose `role` is one of the
//! supported [`Role`](crate::role::Role)s (grid, listbox, menu, menubar,
//! radiogroup, tablist). It keeps member selection, tab order, companion
//! panels and `aria-activedescendant` consistent as key presses and clicks
//! come in, and reports what happened through its [`Message`]
//! notifications.
//!
//! The controller owns no copy of member state; it reads and writes the
//! [`Document`] it is handed on every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use cairn_widgets::group::{self, Group, GroupOptions};
//!
//! let (mut tabs, cmd) = Group::new(&dom, tablist, GroupOptions::default());
//! // route `cmd` through the host, then forward input:
//! let cmd = tabs.update(&mut dom, group::Message::Key(right_arrow));
//! ```

use std::time::Duration;

use cairn_core::command::Command;
use cairn_core::document::Document;
use cairn_core::dom::{generate_element_id, NodeId};
use cairn_core::event::{has_modifier, is_release, Click, Trigger};
use cairn_core::scheduler::{OwnerId, TaskKey};
use crossterm::event::{KeyCode, KeyEvent};

use crate::role::{Orientation, Role};
use crate::selection::{is_inactive, step_grid, step_wrapping, SelectionModel};

const ACTIVATE: &str = "activate";
const FOCUS: &str = "focus";
const SCROLL_MEMBER: &str = "scroll-member";
const SCROLL_COMPANION: &str = "scroll-companion";

/// Messages for the group controller.
///
/// The first block is input: the host forwards key presses, clicks and
/// search terms, and routes deferred tasks back. The second block is
/// notifications the group emits for its host; the group ignores them if
/// they are routed back.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Deferred activation, scheduled by [`Group::new`].
    Activate,
    /// A key press while the container (or one of its members) has focus.
    Key(KeyEvent),
    /// A click on an element inside the container.
    Click(Click),
    /// New free-text filter terms.
    SearchTerms(String),
    /// Deferred focus move onto a member.
    FocusMember(NodeId),
    /// Deferred scroll-into-view of a member or its companion.
    ScrollIntoView(NodeId),

    /// Emitted when the group is created, before activation.
    Initializing,
    /// Emitted once every member has been set up.
    Initialized,
    /// Aggregate change after a selection pass, carrying the target's
    /// `value` and `name` attributes.
    Changed {
        value: Option<String>,
        name: Option<String>,
    },
    /// A member's selection attribute flipped. `prop` is `"selected"` or
    /// `"checked"`.
    MemberChanged {
        member: NodeId,
        prop: &'static str,
        selected: bool,
    },
    /// A member became selected.
    Selected(NodeId),
    /// A member became the current target.
    Focused(NodeId),
    /// Filtering showed or hid a member.
    Toggled { member: NodeId, hidden: bool },
    /// Filtering finished.
    Filtered { matched: usize, total: usize },
}

/// Configuration for a [`Group`].
#[derive(Debug, Clone)]
pub struct GroupOptions {
    /// Whether clicking a member selects it (default: true).
    pub click_to_select: bool,
    /// Wait before activating, so companions can mount (default: 100 ms).
    pub activation_delay: Duration,
    /// Wait before scrolling a new target or companion into view, so
    /// transitions settle (default: 300 ms).
    pub scroll_delay: Duration,
    /// Wait before moving input focus onto a new target (default: one
    /// 16 ms frame).
    pub focus_delay: Duration,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            click_to_select: true,
            activation_delay: Duration::from_millis(100),
            scroll_delay: Duration::from_millis(300),
            focus_delay: Duration::from_millis(16),
        }
    }
}

/// Interaction controller for one composite-widget container.
pub struct Group {
    owner: OwnerId,
    id: String,
    model: SelectionModel,
    options: GroupOptions,
    activated: bool,
    destroyed: bool,
    default_prevented: bool,
}

impl Group {
    /// Create a group for `container`.
    ///
    /// Returns the `Initializing` notification and the deferred activation.
    /// Input is ignored until activation runs.
    pub fn new<D: Document>(
        doc: &D,
        container: NodeId,
        options: GroupOptions,
    ) -> (Self, Command<Message>) {
        let model = SelectionModel::new(doc, container);
        let prefix = doc.role(container).unwrap_or("group");
        let group = Self {
            owner: OwnerId::next(),
            id: generate_element_id(prefix),
            model,
            activated: false,
            destroyed: false,
            default_prevented: false,
            options,
        };
        if model.role().is_none() {
            tracing::debug!(id = %group.id, "container role has no profile, group is inert");
        }
        let cmd = Command::batch([
            Command::message(Message::Initializing),
            Command::defer(group.key(ACTIVATE), group.options.activation_delay, Message::Activate),
        ]);
        (group, cmd)
    }

    /// The generated group id, used as the prefix of member ids.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The container element.
    pub fn container(&self) -> NodeId {
        self.model.container()
    }

    /// The container's role, if it has a profile.
    pub fn role(&self) -> Option<Role> {
        self.model.role()
    }

    /// Live member queries for this container.
    pub fn model(&self) -> &SelectionModel {
        &self.model
    }

    /// The owner id under which deferred tasks are scheduled.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Whether activation has run.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether the group has been torn down.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the most recent key press or click was consumed, so the host
    /// should skip its own default handling.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The currently selected member.
    pub fn selected<D: Document>(&self, doc: &D) -> Option<NodeId> {
        self.model.selected(doc)
    }

    /// Stop reacting to input and drop every pending deferred task.
    pub fn teardown(&mut self) -> Command<Message> {
        tracing::debug!(id = %self.id, "group torn down");
        self.destroyed = true;
        Command::cancel(self.owner)
    }

    /// Process one message against the live document.
    pub fn update<D: Document>(&mut self, doc: &mut D, msg: Message) -> Command<Message> {
        if self.destroyed {
            return Command::none();
        }
        match msg {
            Message::Activate => self.activate(doc),
            Message::Key(key) => {
                self.default_prevented = false;
                if !self.activated || is_release(&key) {
                    return Command::none();
                }
                self.on_key(doc, key)
            }
            Message::Click(click) => {
                self.default_prevented = false;
                if !self.activated {
                    return Command::none();
                }
                self.on_click(doc, click)
            }
            Message::SearchTerms(terms) => self.filter(doc, &terms),
            Message::FocusMember(member) => {
                // superseded by a later selection
                if !doc.is_within(member, self.container()) || doc.tab_index(member) != Some(0) {
                    return Command::none();
                }
                doc.focus(member);
                Command::message(Message::Focused(member))
            }
            Message::ScrollIntoView(node) => {
                doc.scroll_into_view(node);
                Command::none()
            }
            Message::Initializing
            | Message::Initialized
            | Message::Changed { .. }
            | Message::MemberChanged { .. }
            | Message::Selected(_)
            | Message::Focused(_)
            | Message::Toggled { .. }
            | Message::Filtered { .. } => Command::none(),
        }
    }

    fn key(&self, slot: &'static str) -> TaskKey {
        TaskKey::new(self.owner, slot)
    }

    fn companion<D: Document>(&self, doc: &D, member: NodeId) -> Option<NodeId> {
        doc.attr(member, "aria-controls")
            .and_then(|id| doc.element_by_id(id))
    }

    fn activate<D: Document>(&mut self, doc: &mut D) -> Command<Message> {
        if self.activated {
            return Command::none();
        }
        self.activated = true;

        let Some(profile) = self.model.profile() else {
            return Command::message(Message::Initialized);
        };
        let attr = profile.selection_attr.name();
        let multi = self.model.is_multi(doc) || self.role().is_some_and(Role::is_menu_like);
        let default_selected = self.model.selected(doc);
        let members = self.model.all_members(doc);

        let mut cmds = Vec::new();
        let mut reachable = None;
        for (index, &member) in members.iter().enumerate() {
            let is_selected = if multi {
                doc.is_true(member, attr)
            } else if let Some(selected) = default_selected {
                member == selected
            } else {
                profile.select_first && index == 0
            };

            if doc.attr(member, "id").is_none_or(str::is_empty) {
                doc.set_attr(member, "id", &format!("{}-item-{}", self.id, index + 1));
            }
            doc.set_attr(member, attr, bool_str(is_selected));

            if profile.focus_moves_to_member {
                if reachable.is_none() && (is_selected || multi) {
                    reachable = Some(member);
                }
            } else {
                doc.set_class(member, "focused", is_selected && !multi);
            }

            if let Some(companion) = self.companion(doc, member) {
                set_inert(doc, companion, !is_selected);
                if let Some(id) = doc.attr(member, "id").map(str::to_owned) {
                    doc.set_attr(companion, "aria-labelledby", &id);
                }
                doc.set_attr(companion, "aria-hidden", bool_str(!is_selected));
                if is_selected {
                    cmds.push(Command::defer(
                        self.key(SCROLL_COMPANION),
                        self.options.scroll_delay,
                        Message::ScrollIntoView(companion),
                    ));
                }
            }
        }

        if profile.focus_moves_to_member {
            let reachable = reachable.or_else(|| members.first().copied());
            for &member in &members {
                doc.set_tab_index(member, if Some(member) == reachable { 0 } else { -1 });
            }
        } else {
            for &member in &members {
                doc.set_tab_index(member, -1);
            }
        }

        tracing::debug!(
            id = %self.id,
            role = ?self.role(),
            members = members.len(),
            "group activated"
        );
        cmds.push(Command::message(Message::Initialized));
        Command::batch(cmds)
    }

    /// Select (and move focus to) `new_target`, updating every in-scope
    /// member, then emit one aggregate [`Message::Changed`].
    ///
    /// Does nothing, but consumes the input, when the container is disabled
    /// or read-only.
    pub fn select_target<D: Document>(
        &mut self,
        doc: &mut D,
        trigger: Trigger,
        new_target: NodeId,
    ) -> Command<Message> {
        if self.model.is_disabled(doc) || self.model.is_readonly(doc) {
            self.default_prevented = true;
            return Command::none();
        }
        let Some(profile) = self.model.profile() else {
            return Command::none();
        };
        let attr = profile.selection_attr;
        let container_multi = self.model.is_multi(doc);
        let target_role = doc.role(new_target).map(str::to_owned);
        let target_scope = self.scope_of(doc, new_target);
        let activation = trigger.is_activation();

        tracing::trace!(id = %self.id, ?trigger, "select target");

        let mut cmds = Vec::new();
        for member in self.model.active_members(doc) {
            let role = doc.role(member).map(str::to_owned);
            let is_checkbox = role.as_deref() == Some("menuitemcheckbox");
            let is_radio = role.as_deref() == Some("menuitemradio");

            let is_target = member == new_target;

            // checkable items outside the target's scope keep their state
            if (is_checkbox || is_radio)
                && (role != target_role || self.scope_of(doc, member) != target_scope)
            {
                if profile.focus_moves_to_member {
                    doc.set_tab_index(member, -1);
                } else {
                    doc.set_class(member, "focused", false);
                }
                continue;
            }

            let multi_select = is_checkbox || container_multi;
            let single_select = is_radio || !multi_select;
            let is_selected = doc.is_true(member, attr.name());

            if multi_select && is_target && activation {
                doc.set_attr(member, attr.name(), bool_str(!is_selected));
                cmds.push(Command::message(Message::MemberChanged {
                    member,
                    prop: attr.prop(),
                    selected: !is_selected,
                }));
                if !is_selected {
                    cmds.push(Command::message(Message::Selected(member)));
                }
            }

            if single_select && is_selected != is_target && (!is_radio || activation) {
                doc.set_attr(member, attr.name(), bool_str(is_target));
                cmds.push(Command::message(Message::MemberChanged {
                    member,
                    prop: attr.prop(),
                    selected: is_target,
                }));
                if is_target {
                    cmds.push(Command::message(Message::Selected(member)));
                }
            }

            if profile.focus_moves_to_member {
                doc.set_tab_index(member, if is_target { 0 } else { -1 });
                if is_target && doc.focused() != Some(member) {
                    cmds.push(Command::defer(
                        self.key(FOCUS),
                        self.options.focus_delay,
                        Message::FocusMember(member),
                    ));
                }
            } else {
                doc.set_class(member, "focused", is_target);
                if is_target {
                    cmds.push(Command::message(Message::Focused(member)));
                }
            }

            if let Some(companion) = self.companion(doc, member) {
                set_inert(doc, companion, !is_target);
                doc.set_attr(companion, "aria-hidden", bool_str(!is_target));
                if is_target {
                    cmds.push(Command::defer(
                        self.key(SCROLL_COMPANION),
                        self.options.scroll_delay,
                        Message::ScrollIntoView(companion),
                    ));
                }
            }

            if is_target {
                if let Some(id) = doc.attr(member, "id").map(str::to_owned) {
                    doc.set_attr(self.container(), "aria-activedescendant", &id);
                }
                cmds.push(Command::defer(
                    self.key(SCROLL_MEMBER),
                    self.options.scroll_delay,
                    Message::ScrollIntoView(member),
                ));
            }
        }

        cmds.push(Command::message(Message::Changed {
            value: doc.attr(new_target, "value").map(str::to_owned),
            name: doc.attr(new_target, "name").map(str::to_owned),
        }));
        Command::batch(cmds)
    }

    /// The nearest enclosing `group`, or the container itself.
    fn scope_of<D: Document>(&self, doc: &D, node: NodeId) -> Option<NodeId> {
        let role = self.role().map(Role::as_str);
        doc.closest(node, |n| {
            let r = doc.role(n);
            r == Some("group") || (r.is_some() && r == role)
        })
    }

    fn on_click<D: Document>(&mut self, doc: &mut D, click: Click) -> Command<Message> {
        let view: &D = doc;
        let container = self.container();
        let Some(target) = view
            .closest(click.target, |n| self.model.is_member(view, n))
            .filter(|&n| view.is_within(n, container))
        else {
            return Command::none();
        };
        if !click.is_primary() || !self.options.click_to_select || is_inactive(view, target) {
            return Command::none();
        }
        self.select_target(doc, Trigger::Click, target)
    }

    fn current_target<D: Document>(&self, doc: &D) -> Option<NodeId> {
        let focus_moves = self.model.profile()?.focus_moves_to_member;
        if !focus_moves {
            return self
                .model
                .active_members(doc)
                .into_iter()
                .find(|&m| doc.has_class(m, "focused"));
        }
        doc.focused()
            .filter(|&f| self.model.is_member(doc, f) && doc.is_within(f, self.container()))
    }

    fn on_key<D: Document>(&mut self, doc: &mut D, key: KeyEvent) -> Command<Message> {
        if has_modifier(&key) {
            return Command::none();
        }
        let current = self.current_target(doc);

        let handled = matches!(
            key.code,
            KeyCode::Enter
                | KeyCode::Char(' ')
                | KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
        );
        if !handled {
            return Command::none();
        }
        self.default_prevented = current.is_some();

        match key.code {
            KeyCode::Enter => current.map_or_else(Command::none, |target| {
                Command::message(Message::Click(Click::primary(target)))
            }),
            KeyCode::Char(' ') => match current {
                Some(target) => self.select_target(doc, Trigger::Key(key.code), target),
                None => Command::none(),
            },
            code => match self.navigate(doc, current, code) {
                Some(next) if Some(next) != current => {
                    self.select_target(doc, Trigger::Key(code), next)
                }
                _ => Command::none(),
            },
        }
    }

    /// Resolve an arrow key to the member it moves to.
    fn navigate<D: Document>(
        &self,
        doc: &D,
        current: Option<NodeId>,
        code: KeyCode,
    ) -> Option<NodeId> {
        if self.model.is_grid(doc) {
            let all = self.model.all_members(doc);
            let index = current.and_then(|c| all.iter().position(|&m| m == c));
            let (rows, cols) = match code {
                KeyCode::Up => (-1, 0),
                KeyCode::Down => (1, 0),
                KeyCode::Left => (0, -1),
                KeyCode::Right => (0, 1),
                _ => return None,
            };
            let columns = self.model.grid_columns(doc);
            let next = step_grid(index, all.len(), columns, rows, cols).map(|i| all[i])?;
            return (!is_inactive(doc, next)).then_some(next);
        }

        let active = self.model.active_members(doc);
        let index = current.and_then(|c| active.iter().position(|&m| m == c));
        let (backward, forward) = match self.model.orientation(doc) {
            Orientation::Horizontal => (KeyCode::Left, KeyCode::Right),
            Orientation::Vertical => (KeyCode::Up, KeyCode::Down),
        };
        let forward = if code == forward {
            true
        } else if code == backward {
            false
        } else {
            return None;
        };
        step_wrapping(index, active.len(), forward).map(|i| active[i])
    }

    /// Hide members whose search text does not contain every term.
    ///
    /// The search text is `data-search-value`, else `data-label`, else the
    /// text of the first `.label` descendant, else the member's text.
    /// Matching is case-insensitive. Selection is left alone.
    pub fn filter<D: Document>(&mut self, doc: &mut D, terms: &str) -> Command<Message> {
        let terms = terms.trim().to_lowercase();
        let terms: Vec<&str> = terms.split_whitespace().collect();
        let members = self.model.all_members(doc);

        let mut cmds = Vec::with_capacity(members.len() + 1);
        let mut matched = 0;
        for &member in &members {
            let haystack = search_value(doc, member).to_lowercase();
            let hidden = !terms.iter().all(|t| haystack.contains(t));
            if !hidden {
                matched += 1;
            }
            doc.set_attr(member, "aria-hidden", bool_str(hidden));
            cmds.push(Command::message(Message::Toggled { member, hidden }));
        }

        tracing::trace!(id = %self.id, matched, total = members.len(), "filtered");
        cmds.push(Command::message(Message::Filtered {
            matched,
            total: members.len(),
        }));
        Command::batch(cmds)
    }
}

fn search_value<D: Document>(doc: &D, member: NodeId) -> String {
    if let Some(v) = doc
        .attr(member, "data-search-value")
        .or_else(|| doc.attr(member, "data-label"))
    {
        return v.to_owned();
    }
    doc.descendants(member)
        .into_iter()
        .find(|&n| doc.has_class(n, "label"))
        .map(|label| doc.text_content(label))
        .unwrap_or_else(|| doc.text_content(member))
}

fn set_inert<D: Document>(doc: &mut D, node: NodeId, inert: bool) {
    if inert {
        doc.set_attr(node, "inert", "");
    } else {
        doc.remove_attr(node, "inert");
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::dom::{Dom, Element};
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers, MouseButton};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn listbox(n: usize) -> (Dom, NodeId, Vec<NodeId>) {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("listbox"));
        let opts = (0..n)
            .map(|i| {
                dom.append(
                    root,
                    Element::new()
                        .role("option")
                        .attr("value", &format!("v{i}"))
                        .text(&format!("Option {i}")),
                )
            })
            .collect();
        (dom, root, opts)
    }

    fn activated(dom: &mut Dom, root: NodeId) -> Group {
        let (mut group, _) = Group::new(&*dom, root, GroupOptions::default());
        let cmd = group.update(dom, Message::Activate);
        assert_eq!(cmd.into_messages().last(), Some(&Message::Initialized));
        group
    }

    #[test]
    fn new_emits_initializing_and_waits() {
        let (mut dom, root, opts) = listbox(2);
        let (mut group, cmd) = Group::new(&dom, root, GroupOptions::default());
        assert_eq!(cmd.into_messages(), vec![Message::Initializing]);
        assert!(!group.is_activated());

        // input before activation is ignored
        let cmd = group.update(&mut dom, Message::Click(Click::primary(opts[1])));
        assert!(cmd.is_none());
        assert_eq!(dom.attr(opts[1], "aria-selected"), None);
    }

    #[test]
    fn activation_assigns_ids_and_selection() {
        let (mut dom, root, opts) = listbox(3);
        dom.set_attr(opts[1], "aria-selected", "true");
        dom.set_attr(opts[2], "id", "keep-me");
        let group = activated(&mut dom, root);

        assert_eq!(
            dom.attr(opts[0], "id"),
            Some(format!("{}-item-1", group.id()).as_str())
        );
        assert_eq!(dom.attr(opts[2], "id"), Some("keep-me"));
        assert_eq!(dom.attr(opts[0], "aria-selected"), Some("false"));
        assert_eq!(dom.attr(opts[1], "aria-selected"), Some("true"));
        assert!(dom.has_class(opts[1], "focused"));
        assert!(group.id().starts_with("listbox-"));
    }

    #[test]
    fn click_selects_single_member() {
        let (mut dom, root, opts) = listbox(3);
        let mut group = activated(&mut dom, root);

        let msgs = group
            .update(&mut dom, Message::Click(Click::primary(opts[2])))
            .into_messages();
        assert_eq!(dom.attr(opts[2], "aria-selected"), Some("true"));
        assert_eq!(group.selected(&dom), Some(opts[2]));
        assert!(dom.has_class(opts[2], "focused"));
        assert_eq!(
            msgs,
            vec![
                Message::MemberChanged {
                    member: opts[2],
                    prop: "selected",
                    selected: true
                },
                Message::Selected(opts[2]),
                Message::Focused(opts[2]),
                Message::Changed {
                    value: Some("v2".into()),
                    name: None
                },
            ]
        );
        assert_eq!(
            dom.attr(root, "aria-activedescendant"),
            dom.attr(opts[2], "id")
        );
    }

    #[test]
    fn click_on_descendant_bubbles_to_member() {
        let (mut dom, root, opts) = listbox(2);
        let inner = dom.append(opts[1], Element::new().class("label").text("x"));
        let mut group = activated(&mut dom, root);
        group.update(&mut dom, Message::Click(Click::primary(inner)));
        assert_eq!(group.selected(&dom), Some(opts[1]));
    }

    #[test]
    fn secondary_button_and_click_to_select_off_are_ignored() {
        let (mut dom, root, opts) = listbox(2);
        let mut group = activated(&mut dom, root);
        let click = Click {
            target: opts[0],
            button: MouseButton::Right,
        };
        assert!(group.update(&mut dom, Message::Click(click)).is_none());

        let (mut other, _) = Group::new(
            &dom,
            root,
            GroupOptions {
                click_to_select: false,
                ..GroupOptions::default()
            },
        );
        other.update(&mut dom, Message::Activate);
        assert!(other
            .update(&mut dom, Message::Click(Click::primary(opts[0])))
            .is_none());
    }

    #[test]
    fn clicking_a_disabled_member_does_nothing() {
        let (mut dom, root, opts) = listbox(2);
        let mut group = activated(&mut dom, root);
        dom.set_attr(opts[1], "aria-disabled", "true");
        assert!(group
            .update(&mut dom, Message::Click(Click::primary(opts[1])))
            .is_none());
        assert_eq!(dom.attr(opts[1], "aria-selected"), Some("false"));
    }

    #[test]
    fn readonly_container_consumes_input_without_change() {
        let (mut dom, root, opts) = listbox(2);
        let mut group = activated(&mut dom, root);
        dom.set_attr(root, "aria-readonly", "true");
        let cmd = group.update(&mut dom, Message::Click(Click::primary(opts[0])));
        assert!(cmd.is_none());
        assert!(group.default_prevented());
        assert_eq!(dom.attr(opts[0], "aria-selected"), Some("false"));
    }

    #[test]
    fn listbox_arrows_move_focused_marker_and_wrap() {
        let (mut dom, root, opts) = listbox(3);
        let mut group = activated(&mut dom, root);

        // no focused member yet: Down lands on the first
        group.update(&mut dom, Message::Key(key(KeyCode::Down)));
        assert!(dom.has_class(opts[0], "focused"));
        assert!(!group.default_prevented());

        group.update(&mut dom, Message::Key(key(KeyCode::Up)));
        assert!(dom.has_class(opts[2], "focused"));
        assert!(!dom.has_class(opts[0], "focused"));
        assert!(group.default_prevented());
        assert_eq!(group.selected(&dom), Some(opts[2]));

        group.update(&mut dom, Message::Key(key(KeyCode::Down)));
        assert_eq!(group.selected(&dom), Some(opts[0]));
    }

    #[test]
    fn horizontal_keys_do_nothing_in_vertical_list() {
        let (mut dom, root, opts) = listbox(3);
        let mut group = activated(&mut dom, root);
        group.update(&mut dom, Message::Click(Click::primary(opts[0])));
        let cmd = group.update(&mut dom, Message::Key(key(KeyCode::Right)));
        assert!(cmd.is_none());
        assert_eq!(group.selected(&dom), Some(opts[0]));
    }

    #[test]
    fn modified_keys_are_ignored() {
        let (mut dom, root, opts) = listbox(3);
        let mut group = activated(&mut dom, root);
        group.update(&mut dom, Message::Click(Click::primary(opts[0])));
        let mut k = key(KeyCode::Down);
        k.modifiers = KeyModifiers::SHIFT;
        assert!(group.update(&mut dom, Message::Key(k)).is_none());
        assert_eq!(group.selected(&dom), Some(opts[0]));
    }

    #[test]
    fn enter_emits_synthetic_click() {
        let (mut dom, root, opts) = listbox(2);
        let mut group = activated(&mut dom, root);
        group.update(&mut dom, Message::Click(Click::primary(opts[1])));
        let msgs = group
            .update(&mut dom, Message::Key(key(KeyCode::Enter)))
            .into_messages();
        assert_eq!(msgs, vec![Message::Click(Click::primary(opts[1]))]);
    }

    #[test]
    fn navigation_skips_inactive_members() {
        let (mut dom, root, opts) = listbox(3);
        let mut group = activated(&mut dom, root);
        group.update(&mut dom, Message::Click(Click::primary(opts[0])));
        dom.set_attr(opts[1], "aria-disabled", "true");
        group.update(&mut dom, Message::Key(key(KeyCode::Down)));
        assert_eq!(group.selected(&dom), Some(opts[2]));
    }

    #[test]
    fn filter_hides_non_matching_members() {
        let (mut dom, root, opts) = listbox(3);
        dom.set_attr(opts[0], "data-search-value", "Red Apple");
        dom.set_attr(opts[1], "data-label", "Green apple");
        dom.append(opts[2], Element::new().class("label").text("Banana"));
        let mut group = activated(&mut dom, root);

        let msgs = group
            .update(&mut dom, Message::SearchTerms("  APPLE  ".into()))
            .into_messages();
        assert_eq!(
            msgs.last(),
            Some(&Message::Filtered {
                matched: 2,
                total: 3
            })
        );
        assert!(msgs.contains(&Message::Toggled {
            member: opts[2],
            hidden: true
        }));
        assert_eq!(dom.attr(opts[2], "aria-hidden"), Some("true"));

        group.update(&mut dom, Message::SearchTerms("red apple".into()));
        assert_eq!(dom.attr(opts[0], "aria-hidden"), Some("false"));
        assert_eq!(dom.attr(opts[1], "aria-hidden"), Some("true"));

        let msgs = group
            .update(&mut dom, Message::SearchTerms(String::new()))
            .into_messages();
        assert_eq!(
            msgs.last(),
            Some(&Message::Filtered {
                matched: 3,
                total: 3
            })
        );
    }

    #[test]
    fn teardown_cancels_and_silences() {
        let (mut dom, root, opts) = listbox(2);
        let mut group = activated(&mut dom, root);
        let cmd = group.teardown();
        assert!(!cmd.is_none());
        assert!(group.is_destroyed());
        assert!(group
            .update(&mut dom, Message::Click(Click::primary(opts[0])))
            .is_none());
    }

    #[test]
    fn unknown_role_is_inert() {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("toolbar"));
        let button = dom.append(root, Element::new().role("button"));
        let (mut group, _) = Group::new(&dom, root, GroupOptions::default());
        let msgs = group.update(&mut dom, Message::Activate).into_messages();
        assert_eq!(msgs, vec![Message::Initialized]);
        assert!(group
            .update(&mut dom, Message::Click(Click::primary(button)))
            .is_none());
        assert!(group
            .update(&mut dom, Message::Key(key(KeyCode::Down)))
            .is_none());
    }

    #[test]
    fn superseded_focus_move_is_dropped() {
        let mut dom = Dom::new();
        let root = dom.insert(Element::new().role("tablist"));
        let tabs: Vec<_> = (0..3)
            .map(|_| dom.append(root, Element::new().role("tab")))
            .collect();
        let mut group = activated(&mut dom, root);
        dom.focus(tabs[0]);

        group.update(&mut dom, Message::Key(key(KeyCode::Right)));
        assert_eq!(dom.tab_index(tabs[1]), Some(0));
        // clicking the already focused tab needs no focus move
        let cmd = group.update(&mut dom, Message::Click(Click::primary(tabs[0])));
        assert!(cmd.into_messages().contains(&Message::Selected(tabs[0])));

        assert!(group
            .update(&mut dom, Message::FocusMember(tabs[1]))
            .is_none());
        assert_eq!(dom.focused(), Some(tabs[0]));
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut dom, root, _) = listbox(2);
        let mut group = activated(&mut dom, root);
        let mut k = key(KeyCode::Down);
        k.kind = KeyEventKind::Release;
        assert!(group.update(&mut dom, Message::Key(k)).is_none());
    }
}
