//! # taskpool
//!
//! A bounded worker pool for joinable, repushable, and (optionally)
//! detachable tasks.
//!
//! Workers are OS threads, spawned lazily as demand outpaces idle capacity
//! and never shrunk until the pool is shut down. Each [`Task`] carries its
//! own lock-free state word (`Created -> Pushed -> Running -> Completed ->
//! Joined`, with `*Ghost` variants once [`Task::detach`] transfers ownership
//! of a task to the pool) so a join or a repush never has to touch the
//! pool's queue lock.
//!
//! ## Quick start
//!
//! ```no_run
//! use taskpool::{Pool, PoolConfig, Task};
//!
//! let pool = Pool::new(PoolConfig::new(4)).unwrap();
//! let task = Task::new(|x: &i32| x * x, 7);
//! pool.push(&task).unwrap();
//! assert_eq!(task.join().unwrap(), 49);
//! pool.shutdown().map_err(|(_, e)| e).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - the pool handle: push, thread_count, shutdown
//! - [`task`] - the generic, joinable task handle

pub mod pool;
pub mod task;

pub use pool::{Pool, PoolConfig};
pub use task::Task;

pub use taskpool_core::{PoolError, PoolResult};

// Re-export kernel-style logging, in case an application wants to share the
// pool's log stream for its own diagnostics.
pub use taskpool_core::{tpdebug, tperror, tpinfo, tptrace, tpwarn};
pub use taskpool_core::tplog::{set_log_level, set_worker_id, LogLevel};
