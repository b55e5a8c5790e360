//! Core runtime for the **cairn** widget-interaction engine.
//!
//! `cairn-core` provides the document model, the command and scheduling
//! types and the runtime that drive cairn's controllers. The design follows
//! the [Elm Architecture]: controllers never block or call back into their
//! host; they mutate the document they are handed and describe every other
//! side effect as a [`Command`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Snapshot/mutation interface to a tree of elements |
//! | [`Dom`] | Arena-backed [`Document`] used by hosts and tests |
//! | [`Command`] | A side effect: a notification, a deferred task, a cancellation |
//! | [`Scheduler`] | Deferred tasks keyed by owner and slot, on a virtual clock |
//! | [`ObserverSet`] | Intersection and resize observation with drop-guard disposal |
//! | [`Model`] | Host application trait (init / update) |
//! | [`Program`] | Async tokio event loop for a [`Model`] |
//! | [`TestProgram`](testing::TestProgram) | Headless, virtual-time harness for a [`Model`] |
//!
//! # Architecture
//!
//! 1. **init** -- [`Model::init`] builds the document, attaches controllers
//!    and returns their startup commands.
//! 2. **input** -- Key presses, clicks and observer records arrive as
//!    messages, through a [`ProgramHandle`] or directly in tests.
//! 3. **update** -- [`Model::update`] routes each message to a controller and
//!    maps the controller's [`Command`] back into the host's message type.
//! 4. **defer** -- Deferred tasks wait in the [`Scheduler`] and come back as
//!    messages when due. Scheduling under a key that is already pending
//!    replaces the older task.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod document;
pub mod dom;
pub mod event;
pub mod model;
pub mod observer;
pub mod runtime;
pub mod scheduler;
pub mod testing;

pub use command::{Action, Command};
pub use document::Document;
pub use dom::{generate_element_id, Dom, Element, NodeId};
pub use event::{has_modifier, is_release, Click, Trigger};
pub use model::Model;
pub use observer::{
    intersect, IntersectionEntry, Observation, ObservationId, ObservationKind, ObserverRecord,
    ObserverSet,
};
pub use runtime::{log_to_file, Program, ProgramError, ProgramHandle, ProgramOptions};
pub use scheduler::{OwnerId, Scheduler, TaskKey};

/// Run a cairn host with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags).run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options).run().await
}
