//! Composite widgets and anchored popups for **cairn**.
//!
//! The controllers in this crate are plain structs driven by a host
//! [`cairn_core::Model`]. Each takes the live [`cairn_core::Document`] on
//! every update, mutates ARIA state in place and reports what happened as
//! notification variants of its own `Message` enum, which the host
//! intercepts.
//!
//! # Controllers
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`group`] | Selection, focus and keyboard navigation for grid, listbox, menu, menubar, radiogroup and tablist containers |
//! | [`popup`] | Open/close lifecycle and observer-driven positioning of anchored content |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`role`] | Container roles and their static interaction profiles |
//! | [`selection`] | Live member queries and navigation steps |
//! | [`geometry`] | Pure placement resolver for popups |
//! | [`overlay`] | Rendering a resolved popup with `ratatui` |
//! | [`key`] | `aria-keyshortcuts` parsing and matching |
//! | [`detail`] | Typed `data-*` payload of a selected member |

pub mod detail;
pub mod error;
pub mod geometry;
pub mod group;
pub mod key;
pub mod overlay;
pub mod popup;
pub mod role;
pub mod selection;

pub use detail::{selected_item_detail, DetailValue, SelectedItemDetail};
pub use error::{Error, Result};
pub use geometry::{resolve, Inset, Length, Placement, PopupStyle, Resolved, Side};
pub use group::{Group, GroupOptions};
pub use key::{KeyCombination, KeyShortcuts, Shortcut};
pub use popup::{Popup, PopupOptions};
pub use role::{Orientation, Role, RoleProfile, SelectionAttr};
pub use selection::SelectionModel;
