//! The generic, joinable task handle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskpool_core::state::TaskState;
use taskpool_core::{Job, PoolError, PoolResult, TaskStateWord, WaitOutcome};

/// A unit of work: an argument, a function over it, and a result slot,
/// all gated by the task's own state word.
///
/// `Task` is always held behind an `Arc` (see [`Task::new`]) since both the
/// caller and the pool's ready queue need a reference to the same instance.
/// `argument` and `result` sit behind ordinary mutexes rather than the
/// lock-free transition machinery in [`taskpool_core::state`]: the state
/// word already serializes every writer against every reader of each field
/// (only the worker that just won the pickup CAS calls `function`, and only
/// a joiner that has observed `Completed` reads `result`), so the mutexes
/// are never contended in practice — they exist to avoid `unsafe` rather
/// than to provide synchronization the state machine doesn't already give.
pub struct Task<A, T> {
    state: TaskStateWord,
    function: Box<dyn Fn(&A) -> T + Send + Sync>,
    argument: Mutex<A>,
    result: Mutex<Option<T>>,
}

impl<A, T> Task<A, T>
where
    A: Send + 'static,
    T: Send + 'static,
{
    /// Create a new, unpushed task wrapping `function` over `argument`.
    pub fn new<F>(function: F, argument: A) -> Arc<Self>
    where
        F: Fn(&A) -> T + Send + Sync + 'static,
    {
        Arc::new(Self {
            state: TaskStateWord::new(TaskState::Created),
            function: Box::new(function),
            argument: Mutex::new(argument),
            result: Mutex::new(None),
        })
    }

    /// `true` once the function has returned and a result is waiting to be joined.
    pub fn is_finished(&self) -> bool {
        self.state.load() == TaskState::Completed
    }

    /// `true` while a worker is executing this task's function.
    ///
    /// Only `Running` is reported; calling this on a detached task
    /// (`RunningGhost`) is undefined by design, since no one but the pool
    /// itself should still be asking.
    pub fn is_running(&self) -> bool {
        self.state.load() == TaskState::Running
    }

    /// Read-modify access to the argument.
    ///
    /// Only meaningful between a join and the next push: mutating it while
    /// the task is queued or running races the worker's read.
    pub fn argument(&self) -> std::sync::MutexGuard<'_, A> {
        self.argument.lock().unwrap()
    }

    /// Block until the task completes, then consume and return its result.
    ///
    /// Returns [`PoolError::TaskNotPushed`] if the task has never been
    /// pushed to a pool.
    pub fn join(&self) -> PoolResult<T> {
        if self.state.load_relaxed() == TaskState::Created {
            return Err(PoolError::TaskNotPushed);
        }
        self.state.wait_for(TaskState::Completed, None);
        let transitioned = self.state.transition(TaskState::Completed, TaskState::Joined);
        debug_assert!(transitioned, "task left Completed before its sole joiner arrived");
        Ok(self.take_result())
    }

    /// Like [`Task::join`], but gives up after `timeout` without consuming
    /// the result. The task may still be joined normally afterwards.
    #[cfg(feature = "timed-join")]
    pub fn timed_join(&self, timeout: Duration) -> PoolResult<T> {
        if self.state.load_relaxed() == TaskState::Created {
            return Err(PoolError::TaskNotPushed);
        }
        match self.state.wait_for(TaskState::Completed, Some(timeout)) {
            WaitOutcome::TimedOut => return Err(PoolError::Timeout),
            WaitOutcome::Woken => {}
        }
        let transitioned = self.state.transition(TaskState::Completed, TaskState::Joined);
        debug_assert!(transitioned, "task left Completed between our wait and our join transition");
        Ok(self.take_result())
    }

    /// Detach the task: no joiner will ever read its result, and the pool
    /// takes over freeing it once its function returns (or immediately, if
    /// it has already returned).
    #[cfg(feature = "detach")]
    pub fn detach(&self) -> PoolResult<()> {
        if self.state.load() == TaskState::Created {
            return Err(PoolError::TaskNotPushed);
        }
        if self.state.transition(TaskState::Pushed, TaskState::PushedGhost) {
            return Ok(());
        }
        if self.state.transition(TaskState::Running, TaskState::RunningGhost) {
            return Ok(());
        }
        if self.state.transition(TaskState::Completed, TaskState::Joined) {
            let _ = self.take_result();
            return Ok(());
        }
        Err(PoolError::TaskInPool)
    }

    fn take_result(&self) -> T {
        self.result.lock().unwrap().take().expect("Completed task has no stored result")
    }

    /// Consume the last handle to a task that is no longer owned by any
    /// pool (`Created`, never pushed, or `Joined`, already collected).
    ///
    /// On success the task is dropped (and, if this was its last `Arc`,
    /// freed) when the returned value goes out of scope. If the task is
    /// still pushed, running, or completed-but-unjoined, ownership is
    /// handed back to the caller alongside [`PoolError::TaskInPool`].
    pub fn delete(self: Arc<Self>) -> Result<(), (Arc<Self>, PoolError)> {
        match self.state.load() {
            TaskState::Created | TaskState::Joined => Ok(()),
            _ => Err((self, PoolError::TaskInPool)),
        }
    }
}

impl<A, T> Job for Task<A, T>
where
    A: Send + 'static,
    T: Send + 'static,
{
    fn state(&self) -> &TaskStateWord {
        &self.state
    }

    fn execute(&self) {
        let result = {
            let arg = self.argument.lock().unwrap();
            (self.function)(&arg)
        };
        *self.result.lock().unwrap() = Some(result);
    }
}
