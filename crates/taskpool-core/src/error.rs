//! Error types for the task pool

use core::fmt;

/// Result type for pool/task operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur in pool and task operations
#[derive(Debug)]
#[non_exhaustive]
pub enum PoolError {
    /// `Pool::new` was given a non-positive worker count, or one exceeding
    /// the implementation ceiling.
    InvalidArgument,

    /// `Pool` teardown was attempted while tasks were still queued or running.
    HasTasks,

    /// The ready queue is at its configured capacity ceiling.
    TooManyTasks,

    /// `push` was called on a task that is not in `Created` or `Joined` state.
    InvalidRepush,

    /// `Task::delete` was called while the task is still owned by a pool
    /// (pushed, running, or completed-but-unjoined).
    TaskInPool,

    /// `join`/`timed_join`/`detach` was called on a task that was never pushed.
    TaskNotPushed,

    /// `timed_join` elapsed before the task completed.
    Timeout,

    /// Spawning a worker thread failed.
    WorkerSpawnFailed(std::io::Error),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidArgument => write!(f, "invalid argument"),
            PoolError::HasTasks => write!(f, "pool still has queued or running tasks"),
            PoolError::TooManyTasks => write!(f, "ready queue is at capacity"),
            PoolError::InvalidRepush => write!(f, "task is not in a repushable state"),
            PoolError::TaskInPool => write!(f, "task is still owned by a pool"),
            PoolError::TaskNotPushed => write!(f, "task was never pushed into a pool"),
            PoolError::Timeout => write!(f, "timed out waiting for task completion"),
            PoolError::WorkerSpawnFailed(e) => write!(f, "failed to spawn worker thread: {e}"),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolError::WorkerSpawnFailed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", PoolError::InvalidArgument), "invalid argument");
        assert_eq!(format!("{}", PoolError::HasTasks), "pool still has queued or running tasks");
        assert_eq!(format!("{}", PoolError::Timeout), "timed out waiting for task completion");
    }

    #[test]
    fn test_worker_spawn_failed_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let e = PoolError::WorkerSpawnFailed(io);
        assert!(e.source().is_some());
    }
}
