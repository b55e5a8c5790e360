use std::collections::VecDeque;
use std::time::Duration;

use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::scheduler::Scheduler;

/// A headless test harness that drives a [`Model`] without a runtime.
///
/// `TestProgram` lets you exercise every part of the init/update cycle in a
/// plain `#[test]` function -- no tokio runtime required. Immediate messages
/// are queued and flushed with [`drain_messages`](TestProgram::drain_messages);
/// deferred tasks wait on a virtual clock moved by
/// [`advance`](TestProgram::advance).
///
/// # Example
///
/// ```rust,ignore
/// use cairn_core::testing::TestProgram;
/// use std::time::Duration;
///
/// let mut prog = TestProgram::<App>::new(flags);   // calls App::init(flags)
/// prog.advance(Duration::from_millis(100));        // group activation fires
/// prog.send(Msg::Key(down));
/// prog.drain_messages();
/// assert_eq!(prog.model().selected(), Some(tab_1));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: VecDeque<M::Message>,
    scheduler: Scheduler<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Immediate messages produced by `init` are queued, not processed; call
    /// [`drain_messages`](TestProgram::drain_messages) to handle them.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: VecDeque::new(),
            scheduler: Scheduler::new(),
            quit: false,
        };
        program.apply(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Any immediate messages returned by `update` are enqueued; deferred
    /// tasks go to the virtual clock.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.apply(cmd);
    }

    /// Process all pending immediate messages, including the ones they
    /// produce, until the queue is empty.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            let cmd = self.model.update(msg);
            self.apply(cmd);
        }
    }

    /// Move the virtual clock forward by `by`.
    ///
    /// Pending messages are drained first. Then every deferred task due
    /// within the window runs in deadline order, each followed by a full
    /// drain, so tasks scheduled by earlier tasks also fire if they fall
    /// inside the window.
    pub fn advance(&mut self, by: Duration) {
        self.drain_messages();
        let target = self.scheduler.now() + by;
        while let Some(msg) = self.scheduler.pop_due(target) {
            let cmd = self.model.update(msg);
            self.apply(cmd);
            self.drain_messages();
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of deferred tasks still waiting.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Number of immediate messages waiting to be drained.
    pub fn pending_messages(&self) -> usize {
        self.pending_messages.len()
    }

    /// Whether the model requested [`Command::quit`].
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    ///
    /// This bypasses the message-driven update cycle, which is how tests
    /// simulate the host mutating the document between inputs.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    fn apply(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push_back(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.apply(cmd);
                }
            }
            CommandInner::Defer { key, delay, msg } => self.scheduler.schedule(key, delay, msg),
            CommandInner::Cancel(owner) => {
                self.scheduler.cancel_owner(owner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{OwnerId, TaskKey};

    // A minimal model that records what it sees and can schedule work.
    struct Recorder {
        owner: OwnerId,
        seen: Vec<String>,
    }

    #[derive(Debug)]
    enum Msg {
        Say(&'static str),
        Later(&'static str, u64),
        Chain,
        Stop,
        Quit,
    }

    impl Model for Recorder {
        type Message = Msg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<Msg>) {
            let owner = OwnerId::next();
            (
                Recorder {
                    owner,
                    seen: vec![],
                },
                Command::message(Msg::Say("init")),
            )
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Say(s) => {
                    self.seen.push(s.to_string());
                    Command::none()
                }
                Msg::Later(s, ms) => Command::defer(
                    TaskKey::new(self.owner, s),
                    Duration::from_millis(ms),
                    Msg::Say(s),
                ),
                Msg::Chain => Command::batch(vec![
                    Command::message(Msg::Say("a")),
                    Command::message(Msg::Say("b")),
                ]),
                Msg::Stop => Command::cancel(self.owner),
                Msg::Quit => Command::quit(),
            }
        }
    }

    #[test]
    fn init_messages_wait_for_drain() {
        let mut prog = TestProgram::<Recorder>::new(());
        assert!(prog.model().seen.is_empty());
        assert_eq!(prog.pending_messages(), 1);
        prog.drain_messages();
        assert_eq!(prog.model().seen, vec!["init"]);
    }

    #[test]
    fn chained_messages_keep_order() {
        let mut prog = TestProgram::<Recorder>::new(());
        prog.send(Msg::Chain);
        prog.drain_messages();
        assert_eq!(prog.model().seen, vec!["init", "a", "b"]);
    }

    #[test]
    fn deferred_tasks_fire_on_advance() {
        let mut prog = TestProgram::<Recorder>::new(());
        prog.send(Msg::Later("slow", 300));
        prog.send(Msg::Later("fast", 16));
        prog.advance(Duration::from_millis(100));
        assert_eq!(prog.model().seen, vec!["init", "fast"]);
        assert_eq!(prog.pending_tasks(), 1);
        prog.advance(Duration::from_millis(200));
        assert_eq!(prog.model().seen, vec!["init", "fast", "slow"]);
        assert_eq!(prog.now(), Duration::from_millis(300));
    }

    #[test]
    fn cancel_drops_pending_tasks() {
        let mut prog = TestProgram::<Recorder>::new(());
        prog.send(Msg::Later("never", 50));
        prog.send(Msg::Stop);
        prog.advance(Duration::from_secs(1));
        assert_eq!(prog.model().seen, vec!["init"]);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Recorder>::new(());
        assert!(!prog.has_quit());
        prog.send(Msg::Quit);
        assert!(prog.has_quit());
    }
}
