//! Container roles and their interaction profiles.
//!
//! Every composite widget is driven by the `role` attribute of its
//! container. The role is resolved once, when a [`Group`](crate::group::Group)
//! is created, into a static [`RoleProfile`].

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Layout direction used by linear arrow-key navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left/Right navigate.
    Horizontal,
    /// Up/Down navigate.
    Vertical,
}

impl Orientation {
    /// The `aria-orientation` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(Error::UnknownOrientation(other.to_owned())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The attribute that marks a member as selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAttr {
    /// `aria-selected`
    Selected,
    /// `aria-checked`
    Checked,
}

impl SelectionAttr {
    /// Attribute name, e.g. `aria-checked`.
    pub fn name(self) -> &'static str {
        match self {
            SelectionAttr::Selected => "aria-selected",
            SelectionAttr::Checked => "aria-checked",
        }
    }

    /// The name without the `aria-` prefix, used as the key of per-member
    /// change notifications.
    pub fn prop(self) -> &'static str {
        match self {
            SelectionAttr::Selected => "selected",
            SelectionAttr::Checked => "checked",
        }
    }
}

/// Static interaction profile of a container role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleProfile {
    /// Default navigation direction.
    pub orientation: Orientation,
    /// Roles that make an element a member of the container.
    pub member_roles: &'static [&'static str],
    /// Attribute carrying member selection.
    pub selection_attr: SelectionAttr,
    /// Whether input focus moves onto members. When false the container
    /// keeps focus and a `focused` class marks the current member.
    pub focus_moves_to_member: bool,
    /// Whether the first member is selected when nothing else is.
    pub select_first: bool,
}

const MENU_ITEMS: &[&str] = &["menuitem", "menuitemcheckbox", "menuitemradio"];

const GRID: RoleProfile = RoleProfile {
    orientation: Orientation::Vertical,
    member_roles: &["row"],
    selection_attr: SelectionAttr::Selected,
    focus_moves_to_member: true,
    select_first: false,
};

const LISTBOX: RoleProfile = RoleProfile {
    orientation: Orientation::Vertical,
    member_roles: &["option"],
    selection_attr: SelectionAttr::Selected,
    focus_moves_to_member: false,
    select_first: false,
};

const MENU: RoleProfile = RoleProfile {
    orientation: Orientation::Vertical,
    member_roles: MENU_ITEMS,
    selection_attr: SelectionAttr::Checked,
    focus_moves_to_member: true,
    select_first: false,
};

const MENUBAR: RoleProfile = RoleProfile {
    orientation: Orientation::Horizontal,
    ..MENU
};

const RADIOGROUP: RoleProfile = RoleProfile {
    orientation: Orientation::Horizontal,
    member_roles: &["radio"],
    selection_attr: SelectionAttr::Checked,
    focus_moves_to_member: true,
    select_first: false,
};

const TABLIST: RoleProfile = RoleProfile {
    orientation: Orientation::Horizontal,
    member_roles: &["tab"],
    selection_attr: SelectionAttr::Selected,
    focus_moves_to_member: true,
    select_first: true,
};

/// A container role with a known interaction profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Grid,
    Listbox,
    Menu,
    Menubar,
    Radiogroup,
    Tablist,
}

impl Role {
    /// Every supported role.
    pub const ALL: [Role; 6] = [
        Role::Grid,
        Role::Listbox,
        Role::Menu,
        Role::Menubar,
        Role::Radiogroup,
        Role::Tablist,
    ];

    /// The `role` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Grid => "grid",
            Role::Listbox => "listbox",
            Role::Menu => "menu",
            Role::Menubar => "menubar",
            Role::Radiogroup => "radiogroup",
            Role::Tablist => "tablist",
        }
    }

    /// The role's static profile.
    pub fn profile(self) -> &'static RoleProfile {
        match self {
            Role::Grid => &GRID,
            Role::Listbox => &LISTBOX,
            Role::Menu => &MENU,
            Role::Menubar => &MENUBAR,
            Role::Radiogroup => &RADIOGROUP,
            Role::Tablist => &TABLIST,
        }
    }

    /// Menus keep each member's own checked state instead of enforcing a
    /// single selection on activation.
    pub fn is_menu_like(self) -> bool {
        matches!(self, Role::Menu | Role::Menubar)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_owned()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
