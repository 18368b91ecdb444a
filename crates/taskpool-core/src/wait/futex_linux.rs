//! Linux futex-based implementation of the wait/wake primitive.
//!
//! Operates directly on the caller's `AtomicU32` via `FUTEX_WAIT`/`FUTEX_WAKE`
//! (private, process-local futexes). Unlike a pending-wake counter, this
//! needs "wake me when the word stops being `expected`... no, wait, wake me
//! when it becomes `want`" semantics, so it loops re-arming the futex wait
//! against whatever value is currently observed, exactly as a userspace
//! futex-wrapper for `wait_for_value` must.

use super::WaitOutcome;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

pub(super) fn wake_all(addr: &AtomicU32) {
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            addr.as_ptr(),
            libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
            i32::MAX,
            std::ptr::null::<libc::timespec>(),
            std::ptr::null::<u32>(),
            0u32,
        );
    }
}

pub(super) fn wait_for_value(addr: &AtomicU32, want: u32, timeout: Option<Duration>) -> WaitOutcome {
    let deadline = timeout.map(|d| Instant::now() + d);

    loop {
        // Total ordering so that, once we observe `want`, all writes that
        // preceded the publishing transition are visible too.
        let cur = addr.load(Ordering::Acquire);
        if cur == want {
            return WaitOutcome::Woken;
        }

        let remaining = match deadline {
            Some(dl) => match dl.checked_duration_since(Instant::now()) {
                Some(r) => Some(r),
                None => return WaitOutcome::TimedOut,
            },
            None => None,
        };

        let ts = remaining.map(|d| libc::timespec {
            tv_sec: d.as_secs() as i64,
            tv_nsec: d.subsec_nanos() as i64,
        });
        let ts_ptr = match &ts {
            Some(t) => t as *const libc::timespec,
            None => std::ptr::null(),
        };

        // FUTEX_WAIT sleeps only if *addr == cur still holds when the kernel
        // checks; if it already changed again we're told EAGAIN and just
        // re-loop to observe the new value.
        let ret = unsafe {
            libc::syscall(
                libc::SYS_futex,
                addr.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                cur,
                ts_ptr,
                std::ptr::null::<u32>(),
                0u32,
            )
        };

        if ret == 0 {
            // Something changed the word; re-check at the top of the loop.
            continue;
        }

        let errno = std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(0);
        match errno {
            libc::EAGAIN | libc::EINTR => continue,
            libc::ETIMEDOUT => {
                // Only truly done if the deadline has in fact passed; the
                // syscall's own clock and ours can drift by a hair.
                if deadline.map(|dl| Instant::now() >= dl).unwrap_or(false) {
                    return WaitOutcome::TimedOut;
                }
                continue;
            }
            _ => continue,
        }
    }
}
