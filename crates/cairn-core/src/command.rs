use crate::scheduler::{OwnerId, TaskKey};
use std::time::Duration;

/// A side effect returned from [`Model::update`](crate::Model::update) or from
/// a controller's `update`.
///
/// Controllers never sleep, focus on a timer or call back into their host
/// directly. They describe what should happen next as a `Command`, and the
/// runtime (or the [`TestProgram`](crate::testing::TestProgram) harness)
/// carries it out.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Deliver a notification to the host right after this update:
/// let cmd = Command::message(Msg::Initialized);
///
/// // Fire a message after 300ms, replacing any pending task in the same slot:
/// let cmd = Command::defer(TaskKey::new(owner, "scroll"), Duration::from_millis(300), Msg::Scroll);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Batch(Vec<Command<Msg>>),
    /// Deliver `msg` once `delay` has elapsed, unless cancelled or replaced.
    Defer {
        key: TaskKey,
        delay: Duration,
        msg: Msg,
    },
    /// Drop every pending deferred task belonging to `owner`.
    Cancel(OwnerId),
}

/// Internal action variants handled synchronously by the runtime.
pub enum Action<Msg> {
    /// Send a message immediately (no delay).
    Message(Msg),
    /// Quit the program.
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Run multiple commands. Messages are still delivered in list order.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Deliver `msg` after `delay`.
    ///
    /// A task already pending under the same `key` is replaced, so only the
    /// most recent request for a slot ever fires.
    pub fn defer(key: TaskKey, delay: Duration, msg: Msg) -> Self {
        Command {
            inner: CommandInner::Defer { key, delay, msg },
        }
    }

    /// Cancel every pending deferred task scheduled by `owner`.
    pub fn cancel(owner: OwnerId) -> Self {
        Command {
            inner: CommandInner::Cancel(owner),
        }
    }

    /// Transform the message type (for controller composition).
    pub fn map<NewMsg: Send + 'static>(self, f: impl Fn(Msg) -> NewMsg) -> Command<NewMsg> {
        self.map_with(&f)
    }

    fn map_with<NewMsg: Send + 'static>(self, f: &dyn Fn(Msg) -> NewMsg) -> Command<NewMsg> {
        let inner = match self.inner {
            CommandInner::None => CommandInner::None,
            CommandInner::Action(Action::Message(msg)) => {
                CommandInner::Action(Action::Message(f(msg)))
            }
            CommandInner::Action(Action::Quit) => CommandInner::Action(Action::Quit),
            CommandInner::Batch(cmds) => {
                CommandInner::Batch(cmds.into_iter().map(|cmd| cmd.map_with(f)).collect())
            }
            CommandInner::Defer { key, delay, msg } => CommandInner::Defer {
                key,
                delay,
                msg: f(msg),
            },
            CommandInner::Cancel(owner) => CommandInner::Cancel(owner),
        };
        Command { inner }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// Collect every immediate message in delivery order, discarding deferred
    /// tasks, cancellations and quit requests.
    pub fn into_messages(self) -> Vec<Msg> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages(self, out: &mut Vec<Msg>) {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => out.push(msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_messages(out);
                }
            }
            _ => {}
        }
    }
}
