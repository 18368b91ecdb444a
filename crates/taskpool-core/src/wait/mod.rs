//! Atomic-word wait/wake primitive
//!
//! Provides the "wait until `*addr == expected`" / "wake all waiters on `addr`"
//! contract the task state machine is built on. On Linux this is a real
//! futex operating directly on the task's state word; everywhere else it is
//! emulated with a small sharded table of `Mutex`+`Condvar` pairs so that
//! waiters on unrelated tasks don't serialize behind one global lock.
//!
//! Both implementations guarantee that spurious wakeups (including
//! interrupted syscalls) never surface to the caller: the primitive always
//! re-checks the value before returning `Woken`, and only returns `TimedOut`
//! once the deadline has truly elapsed.

use std::sync::atomic::AtomicU32;
use std::time::Duration;

/// Outcome of a bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The word reached the expected value (possibly already true on entry).
    Woken,
    /// The timeout elapsed before the word reached the expected value.
    TimedOut,
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        use futex_linux as platform;
    } else {
        mod fallback;
        use fallback as platform;
    }
}

/// Wake every waiter currently blocked on `addr`.
///
/// Lost wakeups are impossible as long as the write that triggered the wake
/// was published with `Release` ordering and this function is called after
/// that write is visible (which the task state machine's CAS already
/// guarantees by construction).
#[inline]
pub fn wake_all(addr: &AtomicU32) {
    platform::wake_all(addr);
}

/// Block until `addr.load(Acquire) == expected`, or `timeout` elapses.
///
/// `timeout = None` waits unboundedly. The value is re-checked with acquire
/// ordering both before blocking and after every wakeup, so this never
/// returns `Woken` without the value actually matching at the time of return.
#[inline]
pub fn wait_for_value(addr: &AtomicU32, expected: u32, timeout: Option<Duration>) -> WaitOutcome {
    platform::wait_for_value(addr, expected, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::thread;

    #[test]
    fn test_wait_already_satisfied() {
        let word = AtomicU32::new(7);
        let outcome = wait_for_value(&word, 7, Some(Duration::from_millis(50)));
        assert_eq!(outcome, WaitOutcome::Woken);
    }

    #[test]
    fn test_wait_times_out() {
        let word = AtomicU32::new(0);
        let start = std::time::Instant::now();
        let outcome = wait_for_value(&word, 1, Some(Duration::from_millis(30)));
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_wait_woken_by_setter() {
        let word = Arc::new(AtomicU32::new(0));
        let w2 = Arc::clone(&word);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            w2.store(1, Ordering::Release);
            wake_all(&w2);
        });

        let outcome = wait_for_value(&word, 1, Some(Duration::from_secs(5)));
        assert_eq!(outcome, WaitOutcome::Woken);
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_unbounded() {
        let word = Arc::new(AtomicU32::new(0));
        let w2 = Arc::clone(&word);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            w2.store(5, Ordering::Release);
            wake_all(&w2);
        });

        let outcome = wait_for_value(&word, 5, None);
        assert_eq!(outcome, WaitOutcome::Woken);
        handle.join().unwrap();
    }
}
