//! **cairn** -- accessible composite widgets and anchored popups, headless
//! and keyboard-first.
//!
//! This is the umbrella crate that re-exports everything you need to build a
//! cairn host from a single dependency:
//!
//! ```toml
//! [dependencies]
//! cairn = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`cairn_core`] are available at the crate root
//!   ([`Model`], [`Command`], [`Document`], [`Dom`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`cairn_widgets`]
//!   ([`Group`](widgets::Group), [`Popup`](widgets::Popup), the geometry
//!   resolver and the shortcut helpers).
//! * [`logging::init`] sends `tracing` output to a file.
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use cairn::widgets::{group, Group, GroupOptions};
//! use cairn::{Command, Dom, Element, Model};
//!
//! struct Tabs {
//!     dom: Dom,
//!     tabs: Group,
//! }
//!
//! impl Model for Tabs {
//!     type Message = group::Message;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<group::Message>) {
//!         let mut dom = Dom::new();
//!         let list = dom.insert(Element::new().role("tablist"));
//!         for _ in 0..3 {
//!             dom.append(list, Element::new().role("tab"));
//!         }
//!         let (tabs, cmd) = Group::new(&dom, list, GroupOptions::default());
//!         (Tabs { dom, tabs }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: group::Message) -> Command<group::Message> {
//!         self.tabs.update(&mut self.dom, msg)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     cairn::run::<Tabs>(()).await.unwrap();
//! }
//! ```

pub use cairn_core::*;
pub mod logging;
pub mod widgets {
    pub use cairn_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
