//! Pool configuration
//!
//! Builder mirroring this lineage's `SchedulerConfig` pattern: a plain
//! struct with chainable setters, a `Default` derived from environment
//! overrides, and a `validate` step the pool runs once at construction.

use taskpool_core::env::env_get;
use taskpool_core::{MAX_TASKS, MAX_THREADS};

/// Configuration for a [`crate::Pool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on concurrently spawned worker threads.
    pub max_workers: usize,

    /// Upper bound on tasks resident in the ready queue at once.
    pub max_tasks: usize,

    /// Capacity the ready queue's ring buffer starts at before its first growth.
    pub initial_queue_capacity: usize,
}

impl PoolConfig {
    /// A configuration with only the worker ceiling set; `max_tasks` and
    /// `initial_queue_capacity` take their compiled-in defaults.
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            max_tasks: MAX_TASKS,
            initial_queue_capacity: 8,
        }
    }

    /// Like [`PoolConfig::new`], but `max_tasks` and `initial_queue_capacity`
    /// are sourced from `TASKPOOL_MAX_TASKS`/`TASKPOOL_INITIAL_QUEUE_CAPACITY`
    /// when set and parsable, falling back to the same defaults as `new`.
    pub fn from_env(max_workers: usize) -> Self {
        Self {
            max_workers,
            max_tasks: env_get("TASKPOOL_MAX_TASKS", MAX_TASKS),
            initial_queue_capacity: env_get("TASKPOOL_INITIAL_QUEUE_CAPACITY", 8),
        }
    }

    /// Override the queued-task ceiling.
    pub fn max_tasks(mut self, n: usize) -> Self {
        self.max_tasks = n;
        self
    }

    /// Override the ready queue's initial ring buffer capacity.
    pub fn initial_queue_capacity(mut self, n: usize) -> Self {
        self.initial_queue_capacity = n;
        self
    }

    /// Validate the configuration against the crate's hard ceilings.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_workers == 0 {
            return Err("max_workers must be at least 1");
        }
        if self.max_workers > MAX_THREADS {
            return Err("max_workers exceeds MAX_THREADS");
        }
        if self.max_tasks == 0 {
            return Err("max_tasks must be at least 1");
        }
        if self.initial_queue_capacity == 0 {
            return Err("initial_queue_capacity must be at least 1");
        }
        Ok(())
    }
}
