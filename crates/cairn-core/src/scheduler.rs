//! Deferred-task queue with replace-by-key and per-owner cancellation.
//!
//! Controllers schedule short deferrals (waiting for companions to mount,
//! moving focus on the next frame, scrolling once a transition settles) by
//! returning [`Command::defer`](crate::Command::defer). The runtime feeds
//! those into a [`Scheduler`], which runs on a virtual clock so the same queue
//! serves the async [`Program`](crate::Program) and the synchronous
//! [`TestProgram`](crate::testing::TestProgram).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identity of one controller instance that schedules deferred tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocate a process-unique owner id.
    pub fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

/// One deferred-action slot of an owner, e.g. `(group, "focus")`.
///
/// At most one task is pending per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    /// The controller that scheduled the task.
    pub owner: OwnerId,
    /// Which of the owner's deferred actions this is.
    pub slot: &'static str,
}

impl TaskKey {
    /// Create a key for `owner`'s `slot`.
    pub const fn new(owner: OwnerId, slot: &'static str) -> Self {
        Self { owner, slot }
    }
}

struct Pending<Msg> {
    key: TaskKey,
    due: Duration,
    seq: u64,
    msg: Msg,
}

/// A queue of messages waiting for their deadline.
///
/// Time is measured as a [`Duration`] since the scheduler was created. The
/// clock only moves forward, through [`pop_due`](Scheduler::pop_due) or
/// [`advance_to`](Scheduler::advance_to).
pub struct Scheduler<Msg> {
    now: Duration,
    seq: u64,
    pending: Vec<Pending<Msg>>,
}

impl<Msg> Scheduler<Msg> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `now` without running anything.
    ///
    /// Hosts call this before scheduling from an input that arrived after
    /// an idle wait. Earlier times are ignored.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a task is pending under `key`.
    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    /// Schedule `msg` to fire `delay` from now, replacing any task pending
    /// under the same key.
    pub fn schedule(&mut self, key: TaskKey, delay: Duration, msg: Msg) {
        let replaced = self.cancel(key);
        if replaced {
            tracing::trace!(owner = ?key.owner, slot = key.slot, "replaced pending task");
        }
        self.seq += 1;
        self.pending.push(Pending {
            key,
            due: self.now + delay,
            seq: self.seq,
            msg,
        });
    }

    /// Cancel the task pending under `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != key);
        before != self.pending.len()
    }

    /// Cancel every task scheduled by `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: OwnerId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.key.owner != owner);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::debug!(?owner, dropped, "cancelled pending tasks");
        }
        dropped
    }

    /// The earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest task due at or before `now`.
    ///
    /// Ties are broken by scheduling order. The clock advances to the task's
    /// deadline, or to `now` when nothing is due.
    pub fn pop_due(&mut self, now: Duration) -> Option<Msg> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i);

        match index {
            Some(i) => {
                let task = self.pending.remove(i);
                self.now = self.now.max(task.due);
                Some(task.msg)
            }
            None => {
                self.now = self.now.max(now);
                None
            }
        }
    }
}

impl<Msg> Default for Scheduler<Msg> {
    fn default() -> Self {
        Self::new()
    }
}
