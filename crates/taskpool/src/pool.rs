//! Type-safe wrapper around [`taskpool_runtime::Pool`].

use std::sync::Arc;

use taskpool_core::state::TaskState;
use taskpool_core::{Job, PoolError, PoolResult};
pub use taskpool_runtime::PoolConfig;

use crate::task::Task;

/// A bounded pool of worker threads that runs [`Task`]s.
pub struct Pool(taskpool_runtime::Pool);

impl Pool {
    /// Build a pool from `config`. No workers are spawned until the first push.
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        Ok(Self(taskpool_runtime::Pool::new(config)?))
    }

    /// Number of worker threads spawned so far.
    pub fn thread_count(&self) -> usize {
        self.0.thread_count()
    }

    /// Number of spawned workers currently idle, waiting on the ready queue.
    pub fn free_count(&self) -> usize {
        self.0.free_count()
    }

    /// Push a task onto the ready queue.
    ///
    /// Legal from `Created` (first push) or `Joined` (repush); any other
    /// state returns [`PoolError::InvalidRepush`].
    pub fn push<A, T>(&self, task: &Arc<Task<A, T>>) -> PoolResult<()>
    where
        A: Send + 'static,
        T: Send + 'static,
    {
        let pushed = task.state().transition(TaskState::Created, TaskState::Pushed)
            || task.state().transition(TaskState::Joined, TaskState::Pushed);
        if !pushed {
            return Err(PoolError::InvalidRepush);
        }
        let job: Arc<dyn Job> = task.clone();
        self.0.push_task(job)
    }

    /// Shut the pool down. Fails with [`PoolError::HasTasks`] if any task is
    /// still queued or running; on success every worker thread is joined.
    pub fn shutdown(self) -> Result<(), (Self, PoolError)> {
        self.0.shutdown().map_err(|(inner, err)| (Self(inner), err))
    }
}
