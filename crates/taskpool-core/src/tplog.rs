//! Kernel-style leveled logging for the task pool
//!
//! Thread-safe, context-aware stderr output in the spirit of `printk`:
//! every line is automatically tagged with the current worker id (when
//! logging from inside a worker thread).
//!
//! # Environment variables
//!
//! - `TASKPOOL_LOG_LEVEL=<level>` - off/error/warn/info/debug/trace (or 0-5)
//! - `TASKPOOL_LOG_TIME=1` - prefix each line with nanoseconds since first use
//! - `TASKPOOL_LOG_FLUSH=1` - flush stderr after every line
//!
//! # Usage
//!
//! ```ignore
//! use taskpool_core::{tpinfo, tpdebug};
//!
//! tpdebug!("picked up task");
//! tpinfo!("spawned worker {}", id);
//! ```

use crate::env::env_get_bool;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Log levels, most to least severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => return None,
        })
    }

    fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static TIME_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static START_TIME: OnceLock<Instant> = OnceLock::new();

fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    START_TIME.get_or_init(Instant::now);
    FLUSH_ENABLED.store(env_get_bool("TASKPOOL_LOG_FLUSH", false), Ordering::Relaxed);
    TIME_ENABLED.store(env_get_bool("TASKPOOL_LOG_TIME", false), Ordering::Relaxed);
    if let Ok(val) = std::env::var("TASKPOOL_LOG_LEVEL") {
        if let Some(level) = LogLevel::from_str(&val) {
            LOG_LEVEL.store(level as u8, Ordering::Relaxed);
        }
    }
}

#[inline]
fn flush_enabled() -> bool {
    init();
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
fn time_enabled() -> bool {
    init();
    TIME_ENABLED.load(Ordering::Relaxed)
}

#[inline]
fn current_level() -> LogLevel {
    init();
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Off,
        1 => LogLevel::Error,
        2 => LogLevel::Warn,
        3 => LogLevel::Info,
        4 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Set the log level programmatically, overriding `TASKPOOL_LOG_LEVEL`.
pub fn set_log_level(level: LogLevel) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= current_level() as u8
}

fn elapsed_ns() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

thread_local! {
    static WORKER_ID: std::cell::Cell<Option<u32>> = const { std::cell::Cell::new(None) };
}

/// Tag this thread's subsequent log lines with `id` (called by the worker loop).
pub fn set_worker_id(id: u32) {
    WORKER_ID.with(|w| w.set(Some(id)));
}

fn format_context() -> String {
    match WORKER_ID.with(|w| w.get()) {
        Some(id) => format!("[w{id}]"),
        None => "[w--]".to_string(),
    }
}

#[doc(hidden)]
pub fn _tplog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} ", level.prefix());
    if time_enabled() {
        let _ = write!(handle, "[{}] ", elapsed_ns());
    }
    let _ = write!(handle, "{} ", format_context());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Error level log with worker context.
#[macro_export]
macro_rules! tperror {
    ($($arg:tt)*) => {{
        $crate::tplog::_tplog_impl($crate::tplog::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning level log with worker context.
#[macro_export]
macro_rules! tpwarn {
    ($($arg:tt)*) => {{
        $crate::tplog::_tplog_impl($crate::tplog::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info level log with worker context.
#[macro_export]
macro_rules! tpinfo {
    ($($arg:tt)*) => {{
        $crate::tplog::_tplog_impl($crate::tplog::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug level log with worker context.
#[macro_export]
macro_rules! tpdebug {
    ($($arg:tt)*) => {{
        $crate::tplog::_tplog_impl($crate::tplog::LogLevel::Debug, format_args!($($arg)*));
    }};
}

/// Trace level log with worker context.
#[macro_export]
macro_rules! tptrace {
    ($($arg:tt)*) => {{
        $crate::tplog::_tplog_impl($crate::tplog::LogLevel::Trace, format_args!($($arg)*));
    }};
}
