use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton};

use crate::dom::NodeId;

/// A pointer click delivered to an element.
///
/// Hosts translate their own pointer events (terminal mouse reports, a GUI
/// toolkit's hit testing) into a `Click` on the element under the pointer.
///
/// # Example
///
/// ```rust,ignore
/// use cairn_core::event::Click;
///
/// let click = Click::primary(option);
/// group.update(&mut dom, group::Message::Click(click));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    /// The element under the pointer.
    pub target: NodeId,
    /// The button that was pressed.
    pub button: MouseButton,
}

impl Click {
    /// A primary-button click, also used for synthetic activation.
    pub fn primary(target: NodeId) -> Self {
        Self {
            target,
            button: MouseButton::Left,
        }
    }

    /// Whether the primary button was used.
    pub fn is_primary(&self) -> bool {
        self.button == MouseButton::Left
    }
}

/// The input that caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A pointer click (or a synthetic click from Enter).
    Click,
    /// A key press.
    Key(KeyCode),
    /// A host-initiated change with no user input behind it.
    Programmatic,
}

impl Trigger {
    /// Whether this input explicitly activates a member: a click or Space.
    pub fn is_activation(&self) -> bool {
        matches!(self, Trigger::Click | Trigger::Key(KeyCode::Char(' ')))
    }
}

/// Whether any of Shift, Ctrl, Alt, Super, Hyper or Meta is held.
pub fn has_modifier(key: &KeyEvent) -> bool {
    key.modifiers.intersects(
        KeyModifiers::SHIFT
            | KeyModifiers::CONTROL
            | KeyModifiers::ALT
            | KeyModifiers::SUPER
            | KeyModifiers::HYPER
            | KeyModifiers::META,
    )
}

/// Whether the event is a key release, which controllers ignore.
pub fn is_release(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Release
}
