//! # taskpool-runtime
//!
//! The pool implementation: a bounded, lazily-grown set of worker threads
//! pulling from a mutex/condvar-guarded ready queue, plus the configuration
//! that sizes it.
//!
//! This crate knows nothing about what a task's argument or result type is —
//! it operates entirely over `Arc<dyn taskpool_core::Job>`. The generic
//! `Task<A, T>` type and its ergonomic push/join API live one layer up, in
//! the `taskpool` facade crate.

pub mod config;
pub mod pool;

pub use config::PoolConfig;
pub use pool::Pool;
