//! Task state and its atomic transition word
//!
//! Only the following transitions are legal under normal operation:
//!
//! ```text
//! Created      -> Pushed
//! Pushed       -> PushedGhost        (detach)
//! Pushed       -> Running            (worker pickup)
//! PushedGhost  -> RunningGhost       (worker pickup)
//! Running      -> RunningGhost       (detach)
//! Running      -> Completed          (worker done)
//! RunningGhost -> Joined             (worker frees a detached, finished task)
//! Completed    -> Joined             (join / detach)
//! Joined       -> Pushed             (repush, driven by the caller)
//! ```
//!
//! The directed graph formed by these states and transitions is acyclic
//! (aside from the explicit `Joined -> Pushed` recycle), which is what lets
//! every transition be implemented as a single compare-and-swap with no
//! lock: a task can never be observed going "backwards".

use crate::wait::{self, WaitOutcome};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// One state in the task lifecycle lattice.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Newly constructed; not yet in a pool.
    Created = 0,
    /// In the ready queue, not yet picked up.
    Pushed = 1,
    /// Detached while in the queue; the pool now owns destruction.
    PushedGhost = 2,
    /// Executing on a worker.
    Running = 3,
    /// Detached while running; the worker must free it on completion.
    RunningGhost = 4,
    /// Function returned, result stored, not yet joined.
    Completed = 5,
    /// A joiner has observed completion and consumed the result.
    Joined = 6,
}

impl TaskState {
    #[inline]
    const fn from_u32(v: u32) -> Self {
        match v {
            0 => TaskState::Created,
            1 => TaskState::Pushed,
            2 => TaskState::PushedGhost,
            3 => TaskState::Running,
            4 => TaskState::RunningGhost,
            5 => TaskState::Completed,
            6 => TaskState::Joined,
            _ => unreachable!("task state word holds a value outside the TaskState lattice"),
        }
    }
}

/// An `AtomicU32` holding a [`TaskState`], doubling as the wait-address
/// joiners block on.
///
/// Every successful transition publishes a wakeup to all current waiters,
/// satisfying invariant I6 (wake on every transition) without the caller
/// having to remember to do so.
pub struct TaskStateWord(AtomicU32);

impl TaskStateWord {
    /// Construct in `Created` state. No wakeup is issued: construction can't
    /// have any waiters yet.
    pub fn new(initial: TaskState) -> Self {
        Self(AtomicU32::new(initial as u32))
    }

    /// Read the current state with acquire ordering.
    ///
    /// Acquire is what lets a caller that observes `Completed` also see the
    /// result write that happened-before the `Running -> Completed` commit.
    #[inline]
    pub fn load(&self) -> TaskState {
        TaskState::from_u32(self.0.load(Ordering::Acquire))
    }

    /// Read the current state with relaxed ordering.
    ///
    /// Only safe to use where a false negative just delays subscription to a
    /// later, stronger check (see `join`'s `Created` precheck).
    #[inline]
    pub fn load_relaxed(&self) -> TaskState {
        TaskState::from_u32(self.0.load(Ordering::Relaxed))
    }

    /// Attempt `from -> to`. On success, wakes every waiter blocked on this
    /// word and returns `true`. Failure is reported with relaxed ordering:
    /// the unexpected prior state is never acted upon, only retried against.
    pub fn transition(&self, from: TaskState, to: TaskState) -> bool {
        let ok = self
            .0
            .compare_exchange(from as u32, to as u32, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok();
        if ok {
            wait::wake_all(&self.0);
        }
        ok
    }

    /// Block until this word equals `want`, or `timeout` elapses.
    #[inline]
    pub fn wait_for(&self, want: TaskState, timeout: Option<Duration>) -> WaitOutcome {
        wait::wait_for_value(&self.0, want as u32, timeout)
    }
}
