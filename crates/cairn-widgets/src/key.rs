//! Keyboard shortcuts in `aria-keyshortcuts` notation.
//!
//! A [`Shortcut`] is parsed from strings such as `"Ctrl+S"` or
//! `"Accel+Shift+P Alt+F4"` (alternatives separated by whitespace).
//! [`KeyShortcuts`] binds one to an element: it advertises the shortcut on
//! the element and, when a matching key arrives, hands the element back so
//! the host can focus and click it.

use std::fmt;
use std::str::FromStr;

use cairn_core::document::Document;
use cairn_core::dom::NodeId;
use cairn_core::event::is_release;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::Error;
use crate::selection::is_inactive;

/// The platform's primary command modifier: Super on macOS, Ctrl elsewhere.
pub const ACCEL: KeyModifiers = if cfg!(target_os = "macos") {
    KeyModifiers::SUPER
} else {
    KeyModifiers::CONTROL
};

const MATCHED_MODIFIERS: KeyModifiers = KeyModifiers::SHIFT
    .union(KeyModifiers::CONTROL)
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::META)
    .union(KeyModifiers::HYPER);

/// A single key press with an exact set of modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key. Letters are stored lowercase.
    pub code: KeyCode,
    /// Modifiers that must be held. No others may be.
    pub modifiers: KeyModifiers,
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::NONE)
    }

    /// A key with Ctrl held.
    pub fn ctrl(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::CONTROL)
    }

    /// A key with the platform accelerator held.
    pub fn accel(code: KeyCode) -> Self {
        Self::with_modifiers(code, ACCEL)
    }

    /// A key with an explicit set of modifiers.
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code: normalize(code),
            modifiers: modifiers & MATCHED_MODIFIERS,
        }
    }

    /// Whether `event` is this key with exactly these modifiers.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        normalize(event.code) == self.code && event.modifiers & MATCHED_MODIFIERS == self.modifiers
    }
}

impl FromStr for KeyCombination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidShortcut(s.to_owned());
        let mut parts: Vec<&str> = s.split('+').collect();
        // "Ctrl++" binds the plus key
        if s.ends_with("++") {
            parts.truncate(parts.len() - 2);
            parts.push("+");
        }
        let (key, mods) = parts.split_last().ok_or_else(invalid)?;

        let mut modifiers = KeyModifiers::NONE;
        for name in mods {
            modifiers |= match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "option" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "meta" | "cmd" | "command" | "super" => KeyModifiers::SUPER,
                "accel" => ACCEL,
                _ => return Err(invalid()),
            };
        }
        let code = key_code(key).ok_or_else(invalid)?;
        Ok(Self::with_modifiers(code, modifiers))
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Control"),
            (KeyModifiers::ALT, "Alt"),
            (KeyModifiers::SHIFT, "Shift"),
            (KeyModifiers::SUPER, "Meta"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Escape"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Insert => f.write_str("Insert"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            KeyCode::Up => f.write_str("ArrowUp"),
            KeyCode::Down => f.write_str("ArrowDown"),
            KeyCode::Left => f.write_str("ArrowLeft"),
            KeyCode::Right => f.write_str("ArrowRight"),
            other => write!(f, "{other:?}"),
        }
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::BackTab => KeyCode::Tab,
        other => other,
    }
}

fn key_code(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "space" | "spacebar" => KeyCode::Char(' '),
        "plus" => KeyCode::Char('+'),
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "arrowup" | "up" => KeyCode::Up,
        "arrowdown" | "down" => KeyCode::Down,
        "arrowleft" | "left" => KeyCode::Left,
        "arrowright" | "right" => KeyCode::Right,
        other => {
            let n = other.strip_prefix('f')?.parse().ok()?;
            return (1..=24).contains(&n).then_some(KeyCode::F(n));
        }
    };
    Some(code)
}

/// One or more alternative key combinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    keys: Vec<KeyCombination>,
}

impl Shortcut {
    /// A shortcut triggered by any of `keys`.
    pub fn new(keys: Vec<KeyCombination>) -> Self {
        Self { keys }
    }

    /// The alternatives, in declaration order.
    pub fn keys(&self) -> &[KeyCombination] {
        &self.keys
    }

    /// Whether `event` matches any alternative.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        !is_release(event) && self.keys.iter().any(|k| k.matches(event))
    }
}

impl FromStr for Shortcut {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let keys = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if keys.is_empty() {
            return Err(Error::InvalidShortcut(s.to_owned()));
        }
        Ok(Self { keys })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// A shortcut bound to an element.
#[derive(Debug)]
pub struct KeyShortcuts {
    element: NodeId,
    shortcut: Shortcut,
}

impl KeyShortcuts {
    /// Parse `shortcut`, bind it to `element` and advertise it through
    /// `aria-keyshortcuts`.
    pub fn attach<D: Document>(doc: &mut D, element: NodeId, shortcut: &str) -> crate::Result<Self> {
        let shortcut: Shortcut = shortcut.parse()?;
        doc.set_attr(element, "aria-keyshortcuts", &shortcut.to_string());
        tracing::debug!(%shortcut, "key shortcut attached");
        Ok(Self { element, shortcut })
    }

    /// The bound element.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The bound shortcut.
    pub fn shortcut(&self) -> &Shortcut {
        &self.shortcut
    }

    /// Replace the shortcut. On a parse error the old one stays bound.
    pub fn update<D: Document>(&mut self, doc: &mut D, shortcut: &str) -> crate::Result<()> {
        self.shortcut = shortcut.parse()?;
        doc.set_attr(self.element, "aria-keyshortcuts", &self.shortcut.to_string());
        Ok(())
    }

    /// Unbind and remove the advertised attribute.
    pub fn detach<D: Document>(self, doc: &mut D) {
        doc.remove_attr(self.element, "aria-keyshortcuts");
    }

    /// Focus and return the element when `key` triggers the shortcut.
    ///
    /// The host is expected to follow up with a click on the returned
    /// element. Disabled or hidden elements never trigger.
    pub fn handle<D: Document>(&self, doc: &mut D, key: &KeyEvent) -> Option<NodeId> {
        if !doc.contains(self.element) || !self.shortcut.matches(key) || is_inactive(doc, self.element)
        {
            return None;
        }
        tracing::trace!(shortcut = %self.shortcut, "key shortcut triggered");
        doc.focus(self.element);
        Some(self.element)
    }
}
