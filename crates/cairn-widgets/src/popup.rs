//! Open/close lifecycle and continuous positioning of one popup.
//!
//! A [`Popup`] ties an anchor (the trigger) to a content element. It opens
//! and closes on clicks and keys, keeps the anchor's `aria-expanded` in
//! step, and re-runs [`resolve`] whenever the layout observers report that
//! the anchor or its positioning base moved or resized. New styles are
//! emitted as [`Message::StyleChanged`] only when they differ from the last
//! one.
//!
//! The popup holds its observer registrations as [`Observation`] guards,
//! so dropping or [disposing](Popup::dispose) it stops observation.
//!
//! # Example
//!
//! ```rust,ignore
//! use cairn_widgets::popup::{self, Popup, PopupOptions};
//! use cairn_widgets::geometry::Placement;
//!
//! let (mut menu, cmd) = Popup::new(
//!     &mut dom,
//!     &mut observers,
//!     button,
//!     dialog,
//!     Placement::BottomLeft,
//!     None,
//!     PopupOptions::default(),
//! );
//! // after each layout pass:
//! for record in observers.collect(&dom) {
//!     let cmd = menu.update(&mut dom, popup::Message::Observed(record));
//! }
//! ```

use std::time::Duration;

use cairn_core::command::Command;
use cairn_core::document::Document;
use cairn_core::dom::{generate_element_id, NodeId};
use cairn_core::event::{has_modifier, is_release, Click};
use cairn_core::observer::{intersect, IntersectionEntry, Observation, ObserverRecord, ObserverSet};
use cairn_core::scheduler::{OwnerId, TaskKey};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Size;

use crate::geometry::{resolve, Placement, PopupStyle, Resolved};

const RESTORE: &str = "restore";

/// Messages for the popup controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A click anywhere; the popup reacts to clicks on its anchor and
    /// inside its content.
    Click(Click),
    /// A key press; the popup reacts when focus is on the anchor or inside
    /// the content.
    Key(KeyEvent),
    /// A record from the [`ObserverSet`] the popup registered with.
    Observed(ObserverRecord),
    /// The anchor started a CSS-style transition.
    TransitionStart,
    /// Open or close from the host.
    SetOpen(bool),
    /// Deferred end of a forced hide.
    Restore,

    /// The popup opened.
    Opened,
    /// The popup closed.
    Closed,
    /// A new style should be applied to the content.
    StyleChanged(PopupStyle),
}

/// Configuration for a [`Popup`].
#[derive(Debug, Clone)]
pub struct PopupOptions {
    /// Gap kept between the content and the viewport edges (default: 8).
    pub margin: u16,
    /// Stacking order emitted with every style (default: 1000).
    pub z_index: u32,
    /// How long content stays hidden after a forced close (default: 50 ms).
    pub hide_interval: Duration,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            margin: 8,
            z_index: 1000,
            hide_interval: Duration::from_millis(50),
        }
    }
}

/// Controller for one anchor/content pair.
pub struct Popup {
    owner: OwnerId,
    id: String,
    anchor: NodeId,
    content: NodeId,
    base: NodeId,
    placement: Placement,
    options: PopupOptions,
    open: bool,
    resolved: Option<Resolved>,
    visibility: Observation,
    position: Observation,
    base_size: Observation,
}

impl Popup {
    /// Register a popup.
    ///
    /// Gives the content a `popup-{n}` id, points the anchor's
    /// `aria-controls` at it, sets `aria-expanded="false"`, and registers
    /// the visibility, position and size observations with `observers`.
    /// `base` defaults to the anchor.
    pub fn new<D: Document>(
        doc: &mut D,
        observers: &mut ObserverSet,
        anchor: NodeId,
        content: NodeId,
        placement: Placement,
        base: Option<NodeId>,
        options: PopupOptions,
    ) -> (Self, Command<Message>) {
        let base = base.unwrap_or(anchor);
        let id = generate_element_id("popup");

        doc.set_attr(content, "id", &id);
        doc.set_attr(anchor, "aria-controls", &id);
        doc.set_attr(anchor, "aria-expanded", "false");

        let popup = Self {
            owner: OwnerId::next(),
            id,
            anchor,
            content,
            base,
            placement,
            options,
            open: false,
            resolved: None,
            visibility: observers.observe_intersection(anchor),
            position: observers.observe_intersection(base),
            base_size: observers.observe_resize(base),
        };
        tracing::debug!(id = %popup.id, %placement, "popup registered");
        (popup, Command::none())
    }

    /// The content element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The trigger element.
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// The floating content element.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// The element whose geometry drives placement.
    pub fn base(&self) -> NodeId {
        self.base
    }

    /// Whether the popup is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The last computed style. `None` while closed.
    pub fn style(&self) -> Option<PopupStyle> {
        self.resolved.map(|r| r.style)
    }

    /// The placement in effect: the preferred one, or the corrected one
    /// while open.
    pub fn placement(&self) -> Placement {
        self.resolved.map_or(self.placement, |r| r.placement)
    }

    /// The owner id under which deferred tasks are scheduled.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Drop every observation and pending deferred task.
    pub fn dispose(self) -> Command<Message> {
        tracing::debug!(id = %self.id, "popup disposed");
        Command::cancel(self.owner)
    }

    /// Process one message against the live document.
    pub fn update<D: Document>(&mut self, doc: &mut D, msg: Message) -> Command<Message> {
        match msg {
            Message::Click(click) => self.on_click(doc, click),
            Message::Key(key) => self.on_key(doc, key),
            Message::Observed(record) => self.on_observed(doc, record),
            Message::TransitionStart if is_hiding(&*doc, self.anchor) => self.hide_immediately(doc),
            Message::TransitionStart => Command::none(),
            Message::SetOpen(open) => self.set_open(doc, open),
            Message::Restore => {
                doc.remove_attr(self.content, "hidden");
                Command::none()
            }
            Message::Opened | Message::Closed | Message::StyleChanged(_) => Command::none(),
        }
    }

    /// Open or close.
    pub fn set_open<D: Document>(&mut self, doc: &mut D, open: bool) -> Command<Message> {
        if open == self.open {
            return Command::none();
        }
        self.open = open;

        if open {
            tracing::debug!(id = %self.id, "popup opened");
            doc.set_attr(self.anchor, "aria-controls", &self.id);
            doc.set_attr(self.anchor, "aria-expanded", "true");
            let style = self.check_position(doc);
            Command::batch([Command::message(Message::Opened), style])
        } else {
            tracing::debug!(id = %self.id, "popup closed");
            if doc.is_true(self.anchor, "aria-expanded") {
                doc.focus(self.anchor);
                doc.remove_attr(self.anchor, "aria-controls");
            }
            doc.set_attr(self.anchor, "aria-expanded", "false");
            self.resolved = None;
            Command::message(Message::Closed)
        }
    }

    /// Flip between open and closed.
    pub fn toggle<D: Document>(&mut self, doc: &mut D) -> Command<Message> {
        self.set_open(doc, !self.open)
    }

    /// Close without any closing transition: the content is marked
    /// `hidden` for one hide interval, then restored.
    pub fn hide_immediately<D: Document>(&mut self, doc: &mut D) -> Command<Message> {
        tracing::debug!(id = %self.id, "popup force-hidden");
        doc.set_attr(self.content, "hidden", "");
        let closed = self.set_open(doc, false);
        Command::batch([
            closed,
            Command::defer(
                TaskKey::new(self.owner, RESTORE),
                self.options.hide_interval,
                Message::Restore,
            ),
        ])
    }

    fn is_inert<D: Document>(&self, doc: &D) -> bool {
        doc.is_true(self.anchor, "aria-disabled") || doc.is_true(self.anchor, "aria-readonly")
    }

    fn on_click<D: Document>(&mut self, doc: &mut D, click: Click) -> Command<Message> {
        if !click.is_primary() {
            return Command::none();
        }
        if doc.is_within(click.target, self.anchor) {
            if self.is_inert(doc) {
                return Command::none();
            }
            return self.toggle(doc);
        }
        if !self.open || !doc.is_within(click.target, self.content) {
            return Command::none();
        }
        let content = self.content;
        let view: &D = doc;
        let dismisses = click.target == content
            || view
                .closest(click.target, |n| is_dismissive(view, n))
                .is_some_and(|n| view.is_within(n, content));
        if dismisses {
            self.set_open(doc, false)
        } else {
            Command::none()
        }
    }

    fn on_key<D: Document>(&mut self, doc: &mut D, key: KeyEvent) -> Command<Message> {
        if is_release(&key) || has_modifier(&key) {
            return Command::none();
        }
        let Some(focused) = doc.focused() else {
            return Command::none();
        };
        let on_anchor = doc.is_within(focused, self.anchor);
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if on_anchor && !self.is_inert(doc) => {
                self.toggle(doc)
            }
            KeyCode::Esc if on_anchor || doc.is_within(focused, self.content) => {
                self.set_open(doc, false)
            }
            _ => Command::none(),
        }
    }

    fn on_observed<D: Document>(&mut self, doc: &mut D, record: ObserverRecord) -> Command<Message> {
        let id = record.id();
        match record {
            ObserverRecord::Intersection { entry, .. } if id == self.visibility.id() => {
                if !entry.is_intersecting && self.open {
                    self.hide_immediately(doc)
                } else {
                    Command::none()
                }
            }
            ObserverRecord::Intersection { entry, .. } if id == self.position.id() => {
                self.apply(doc, entry)
            }
            ObserverRecord::Resize { .. } if id == self.base_size.id() => self.check_position(doc),
            _ => Command::none(),
        }
    }

    /// Recompute placement from the positioning base's current geometry.
    fn check_position<D: Document>(&mut self, doc: &D) -> Command<Message> {
        if !doc.contains(self.base) {
            return Command::none();
        }
        let entry = intersect(self.base, doc.rect(self.base), doc.viewport());
        self.apply(doc, entry)
    }

    fn apply<D: Document>(&mut self, doc: &D, entry: IntersectionEntry) -> Command<Message> {
        if !self.open {
            return Command::none();
        }
        let resolved = resolve(
            entry.intersection_rect,
            entry.root_bounds,
            self.content_size(doc),
            self.placement,
            self.options.margin,
            self.options.z_index,
        );
        let changed = self.resolved.map(|r| r.style) != Some(resolved.style);
        self.resolved = Some(resolved);
        if changed {
            tracing::trace!(id = %self.id, placement = %resolved.placement, "popup repositioned");
            Command::message(Message::StyleChanged(resolved.style))
        } else {
            Command::none()
        }
    }

    /// Natural size of the `.content` child, or of the content element.
    fn content_size<D: Document>(&self, doc: &D) -> Size {
        let inner = doc
            .descendants(self.content)
            .into_iter()
            .find(|&n| doc.has_class(n, "content"))
            .unwrap_or(self.content);
        let rect = doc.rect(inner);
        Size::new(rect.width, rect.height)
    }
}

/// Whether `node` sits inside an element that is being hidden.
fn is_hiding<D: Document>(doc: &D, node: NodeId) -> bool {
    doc.closest(node, |n| {
        doc.has_class(n, "hiding") || doc.has_class(n, "hidden") || doc.attr(n, "hidden").is_some()
    })
    .is_some()
}

/// Menu items and options close the popup they sit in.
fn is_dismissive<D: Document>(doc: &D, node: NodeId) -> bool {
    doc.role(node)
        .is_some_and(|r| r.starts_with("menuitem") || r == "option")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Length;
    use cairn_core::dom::{Dom, Element};
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    struct Fixture {
        dom: Dom,
        observers: ObserverSet,
        popup: Popup,
        anchor: NodeId,
        content: NodeId,
        item: NodeId,
        other: NodeId,
    }

    fn fixture() -> Fixture {
        let mut dom = Dom::with_viewport(Rect::new(0, 0, 80, 24));
        let root = dom.insert(Element::new());
        let anchor = dom.append(root, Element::new().role("button").rect(Rect::new(10, 2, 12, 1)));
        let content = dom.append(root, Element::new().role("dialog"));
        let inner = dom.append(
            content,
            Element::new().class("content").rect(Rect::new(0, 0, 20, 6)),
        );
        let menu = dom.append(inner, Element::new().role("menu"));
        let item = dom.append(menu, Element::new().role("menuitem").text("Copy"));
        let other = dom.append(inner, Element::new().role("searchbox"));
        let mut observers = ObserverSet::new();
        let (popup, _) = Popup::new(
            &mut dom,
            &mut observers,
            anchor,
            content,
            Placement::BottomLeft,
            None,
            PopupOptions::default(),
        );
        Fixture {
            dom,
            observers,
            popup,
            anchor,
            content,
            item,
            other,
        }
    }

    #[test]
    fn registration_wires_aria() {
        let f = fixture();
        assert!(f.popup.id().starts_with("popup-"));
        assert_eq!(f.dom.attr(f.content, "id"), Some(f.popup.id()));
        assert_eq!(f.dom.attr(f.anchor, "aria-controls"), Some(f.popup.id()));
        assert_eq!(f.dom.attr(f.anchor, "aria-expanded"), Some("false"));
        assert_eq!(f.observers.len(), 3);
    }

    #[test]
    fn anchor_click_toggles_and_positions() {
        let mut f = fixture();
        let msgs = f
            .popup
            .update(&mut f.dom, Message::Click(Click::primary(f.anchor)))
            .into_messages();
        assert!(f.popup.is_open());
        assert_eq!(f.dom.attr(f.anchor, "aria-expanded"), Some("true"));
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0], Message::Opened);
        let Message::StyleChanged(style) = msgs[1] else {
            panic!("expected a style");
        };
        assert_eq!(style.inset.top, Length::Fixed(3));
        assert_eq!(style.inset.left, Length::Fixed(10));
        assert_eq!(style.min_width, 12);

        f.popup
            .update(&mut f.dom, Message::Click(Click::primary(f.anchor)));
        assert!(!f.popup.is_open());
        assert_eq!(f.popup.style(), None);
    }

    #[test]
    fn disabled_anchor_does_not_open() {
        let mut f = fixture();
        f.dom.set_attr(f.anchor, "aria-disabled", "true");
        let cmd = f
            .popup
            .update(&mut f.dom, Message::Click(Click::primary(f.anchor)));
        assert!(cmd.is_none());
        f.dom.focus(f.anchor);
        assert!(f.popup.update(&mut f.dom, Message::Key(key(KeyCode::Enter))).is_none());
        assert!(!f.popup.is_open());
    }

    #[test]
    fn keys_on_focused_anchor() {
        let mut f = fixture();
        f.dom.focus(f.anchor);
        f.popup.update(&mut f.dom, Message::Key(key(KeyCode::Char(' '))));
        assert!(f.popup.is_open());
        f.popup.update(&mut f.dom, Message::Key(key(KeyCode::Enter)));
        assert!(!f.popup.is_open());
    }

    #[test]
    fn escape_in_content_closes_and_refocuses_anchor() {
        let mut f = fixture();
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        f.dom.focus(f.item);
        let msgs = f
            .popup
            .update(&mut f.dom, Message::Key(key(KeyCode::Esc)))
            .into_messages();
        assert_eq!(msgs, vec![Message::Closed]);
        assert_eq!(f.dom.focused(), Some(f.anchor));
        assert_eq!(f.dom.attr(f.anchor, "aria-controls"), None);
        assert_eq!(f.dom.attr(f.anchor, "aria-expanded"), Some("false"));

        // reopening restores the reference
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        assert_eq!(f.dom.attr(f.anchor, "aria-controls"), Some(f.popup.id()));
    }

    #[test]
    fn only_dismissive_content_clicks_close() {
        let mut f = fixture();
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        f.popup
            .update(&mut f.dom, Message::Click(Click::primary(f.other)));
        assert!(f.popup.is_open());
        f.popup
            .update(&mut f.dom, Message::Click(Click::primary(f.item)));
        assert!(!f.popup.is_open());

        f.popup.update(&mut f.dom, Message::SetOpen(true));
        f.popup
            .update(&mut f.dom, Message::Click(Click::primary(f.content)));
        assert!(!f.popup.is_open());
    }

    #[test]
    fn observers_drive_repositioning() {
        let mut f = fixture();
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        // first collection reports everything, but nothing moved
        for record in f.observers.collect(&f.dom) {
            let cmd = f.popup.update(&mut f.dom, Message::Observed(record));
            assert!(cmd.is_none());
        }

        f.dom.set_rect(f.anchor, Rect::new(10, 20, 12, 1));
        let msgs: Vec<_> = f
            .observers
            .collect(&f.dom)
            .into_iter()
            .flat_map(|r| {
                f.popup
                    .update(&mut f.dom, Message::Observed(r))
                    .into_messages()
            })
            .collect();
        assert_eq!(msgs.len(), 1);
        assert_eq!(f.popup.placement(), Placement::TopLeft);
        assert_eq!(
            msgs[0],
            Message::StyleChanged(f.popup.style().unwrap_or_default())
        );
    }

    #[test]
    fn anchor_leaving_viewport_forces_hide() {
        let mut f = fixture();
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        f.observers.collect(&f.dom);

        f.dom.set_rect(f.anchor, Rect::new(10, 40, 12, 1));
        let records = f.observers.collect(&f.dom);
        let mut cmds = Vec::new();
        for r in records {
            cmds.push(f.popup.update(&mut f.dom, Message::Observed(r)));
        }
        assert!(!f.popup.is_open());
        assert_eq!(f.dom.attr(f.content, "hidden"), Some(""));
        let msgs: Vec<_> = cmds.into_iter().flat_map(Command::into_messages).collect();
        assert!(msgs.contains(&Message::Closed));

        f.popup.update(&mut f.dom, Message::Restore);
        assert_eq!(f.dom.attr(f.content, "hidden"), None);
    }

    #[test]
    fn transition_under_hiding_ancestor() {
        let mut f = fixture();
        f.popup.update(&mut f.dom, Message::SetOpen(true));
        assert!(f.popup.update(&mut f.dom, Message::TransitionStart).into_messages().is_empty());
        assert!(f.popup.is_open());

        let parent = f.dom.parent(f.anchor).unwrap_or(f.anchor);
        f.dom.set_class(parent, "hiding", true);
        f.popup.update(&mut f.dom, Message::TransitionStart);
        assert!(!f.popup.is_open());
    }

    #[test]
    fn dispose_releases_observations() {
        let mut f = fixture();
        assert_eq!(f.observers.len(), 3);
        let cmd = f.popup.dispose();
        assert!(!cmd.is_none());
        assert_eq!(f.observers.len(), 0);
        assert!(f.observers.collect(&f.dom).is_empty());
    }
}
