use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::scheduler::Scheduler;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

/// Errors that can occur while running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The program was stopped through [`ProgramHandle::kill`].
    #[error("program was killed")]
    Killed,
}

/// Configuration options for a [`Program`].
///
/// Use struct update syntax to override only the options you need:
///
/// ```rust,ignore
/// use cairn_core::ProgramOptions;
///
/// let opts = ProgramOptions {
///     exit_when_idle: false,
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Return from [`Program::run`] once every [`ProgramHandle`] has been
    /// dropped, no message is queued and no deferred task is pending
    /// (default: true).
    ///
    /// With this off the program only stops on quit or kill.
    pub exit_when_idle: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            exit_when_idle: true,
        }
    }
}

/// A cloneable handle to a running [`Program`] for external control.
///
/// * [`send`](ProgramHandle::send) -- inject a message (a key press, a
///   click, an observer record) into the event loop from outside.
/// * [`kill`](ProgramHandle::kill) -- force the program to exit.
///
/// Obtain a handle by calling [`Program::handle`] before entering the run
/// loop.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Send a message to the running program.
    ///
    /// Returns silently if the program has already exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force-kill the program.
    ///
    /// The event loop exits at the next opportunity without processing
    /// remaining messages or deferred tasks, and [`Program::run`] returns
    /// [`ProgramError::Killed`].
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// The async runtime for a [`Model`].
///
/// `Program` owns the model, an unbounded message channel and the deferred
/// task [`Scheduler`]. Deferred tasks are timed against tokio's clock, so
/// tests using `#[tokio::test(start_paused = true)]` run them instantly.
///
/// # Example
///
/// ```rust,ignore
/// use cairn_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let program = Program::<App>::new(flags);
///     let handle = program.handle();
///     // feed input through `handle.send(..)` from another task
///     let app = program.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    runner: Runner<M>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
}

/// Event loop state. Holds no sender, so the channel closes once every
/// [`ProgramHandle`] is gone.
struct Runner<M: Model> {
    model: M,
    scheduler: Scheduler<M::Message>,
    queue: VecDeque<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    should_quit: bool,
    killed: Arc<AtomicBool>,
    wake: Arc<Notify>,
    start: Instant,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Self {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// The scheduler clock starts here, so deferrals returned by
    /// [`Model::init`] are timed from construction.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let (model, init_cmd) = M::init(flags);

        let mut runner = Runner {
            model,
            scheduler: Scheduler::new(),
            queue: VecDeque::new(),
            msg_rx,
            options,
            should_quit: false,
            killed: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            start,
        };

        tracing::debug!("program initialized");
        runner.execute_command(init_cmd);
        Self { runner, msg_tx }
    }

    /// Get a handle for external control (send messages, force-kill).
    ///
    /// With [`ProgramOptions::exit_when_idle`], the program keeps running
    /// while any handle is alive.
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.runner.killed.clone(),
            wake: self.runner.wake.clone(),
        }
    }

    /// Run the program until it quits, goes idle, or is killed.
    ///
    /// Returns the final model.
    pub async fn run(self) -> Result<M, ProgramError> {
        let Program { mut runner, msg_tx } = self;
        drop(msg_tx);
        runner.event_loop().await?;
        tracing::debug!(pending = runner.scheduler.len(), "shutting down");
        Ok(runner.model)
    }
}

impl<M: Model> Runner<M> {
    fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        let start = self.start;
        let wake = Arc::clone(&self.wake);
        let mut connected = true;

        loop {
            if self.is_killed() {
                return Err(ProgramError::Killed);
            }

            loop {
                match self.msg_rx.try_recv() {
                    Ok(msg) => self.queue.push_back(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        connected = false;
                        break;
                    }
                }
            }

            while let Some(msg) = self.queue.pop_front() {
                self.process_message(msg);
                if self.should_quit || self.is_killed() {
                    break;
                }
            }
            if self.is_killed() {
                return Err(ProgramError::Killed);
            }
            if self.should_quit {
                return Ok(());
            }

            if let Some(msg) = self.scheduler.pop_due(start.elapsed()) {
                self.process_message(msg);
                continue;
            }

            if self.options.exit_when_idle && self.scheduler.is_empty() && !connected {
                tracing::debug!("idle with no handles left, exiting");
                return Ok(());
            }

            let deadline = self.scheduler.next_deadline();
            let timer = async move {
                match deadline {
                    Some(due) => tokio::time::sleep_until(start + due).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;

                _ = wake.notified() => {}

                msg = self.msg_rx.recv(), if connected => match msg {
                    Some(msg) => self.queue.push_back(msg),
                    None => connected = false,
                },

                _ = timer => {}
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        // Deferrals produced below are timed from now, not from the last
        // task that fired.
        self.scheduler.advance_to(self.start.elapsed());
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.queue.push_back(msg),
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
            CommandInner::Defer { key, delay, msg } => {
                self.scheduler.schedule(key, delay, msg);
            }
            CommandInner::Cancel(owner) => {
                self.scheduler.cancel_owner(owner);
            }
        }
    }
}

/// Open a log file in append mode, creating it if needed.
///
/// # Example
///
/// ```rust,ignore
/// use cairn_core::runtime::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("debug.log").unwrap();
/// writeln!(f, "debug message").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<std::path::Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
