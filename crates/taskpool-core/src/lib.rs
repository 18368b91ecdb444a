//! # taskpool-core
//!
//! Platform-agnostic building blocks for the task pool: the task state
//! lattice, the ring buffer the ready queue is built from, the futex-style
//! wait/wake primitive, and the ambient error/config/logging helpers shared
//! with `taskpool-runtime`.
//!
//! All platform-specific code (the Linux futex path vs. the portable
//! fallback) lives behind the `wait` module's internal `cfg_if` switch; this
//! crate otherwise has no OS-specific surface.
//!
//! ## Modules
//!
//! - `state` - the task state lattice and its atomic transition word
//! - `job` - the type-erased `Job` trait the pool's worker loop runs
//! - `ring_buffer` - FIFO ready-queue storage with geometric growth
//! - `wait` - atomic-word wait/wake primitive (futex on Linux, condvar elsewhere)
//! - `error` - the pool/task error taxonomy
//! - `env` - environment variable parsing helpers
//! - `tplog` - kernel-style leveled logging macros

pub mod env;
pub mod error;
pub mod job;
pub mod ring_buffer;
pub mod state;
pub mod tplog;
pub mod wait;

pub use error::{PoolError, PoolResult};
pub use job::Job;
pub use ring_buffer::RingBuffer;
pub use state::{TaskState, TaskStateWord};
pub use wait::WaitOutcome;

/// Minimum worker ceiling any pool implementation must allow.
pub const MAX_THREADS: usize = 64;

/// Minimum queued-task ceiling any pool implementation must allow.
pub const MAX_TASKS: usize = 1024;
