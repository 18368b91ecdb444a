//! Portable fallback implementation of the wait/wake primitive.
//!
//! Used on platforms without a futex syscall. A fixed-size table of
//! `Mutex<()>`/`Condvar` pairs stands in for per-address futex queues:
//! a waiter's address is hashed to a shard, so unrelated tasks mostly don't
//! serialize behind one global lock, without paying for one OS mutex per
//! task.

use super::WaitOutcome;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, OnceLock};
use std::time::{Duration, Instant};

const SHARDS: usize = 64;

struct Shard {
    gate: Mutex<()>,
    condvar: Condvar,
}

fn shards() -> &'static [Shard; SHARDS] {
    static SHARDS_CELL: OnceLock<[Shard; SHARDS]> = OnceLock::new();
    SHARDS_CELL.get_or_init(|| std::array::from_fn(|_| Shard {
        gate: Mutex::new(()),
        condvar: Condvar::new(),
    }))
}

fn shard_for(addr: &AtomicU32) -> &'static Shard {
    let ptr = addr as *const AtomicU32 as usize;
    // Fibonacci hashing: cheap, decent bit mixing for pointer-derived keys.
    let mixed = ptr.wrapping_mul(0x9E3779B97F4A7C15);
    &shards()[mixed % SHARDS]
}

pub(super) fn wake_all(addr: &AtomicU32) {
    let shard = shard_for(addr);
    // Acquire the gate purely to establish happens-before with a waiter that
    // is mid-way through re-checking under the same lock; the condvar itself
    // carries no payload.
    let _guard = shard.gate.lock().unwrap();
    shard.condvar.notify_all();
}

pub(super) fn wait_for_value(addr: &AtomicU32, want: u32, timeout: Option<Duration>) -> WaitOutcome {
    let deadline = timeout.map(|d| Instant::now() + d);
    let shard = shard_for(addr);

    loop {
        if addr.load(Ordering::Acquire) == want {
            return WaitOutcome::Woken;
        }

        let remaining = match deadline {
            Some(dl) => match dl.checked_duration_since(Instant::now()) {
                Some(r) => r,
                None => return WaitOutcome::TimedOut,
            },
            None => Duration::from_millis(50),
        };

        let guard = shard.gate.lock().unwrap();
        // Re-check under the lock: the setter takes the same lock in
        // `wake_all`, so if it already ran, we'd see the new value here and
        // skip blocking.
        if addr.load(Ordering::Acquire) == want {
            return WaitOutcome::Woken;
        }

        let (_guard, timeout_result) = shard.condvar.wait_timeout(guard, remaining).unwrap();

        if timeout_result.timed_out() {
            if deadline.is_some_and(|dl| Instant::now() >= dl) {
                if addr.load(Ordering::Acquire) == want {
                    return WaitOutcome::Woken;
                }
                return WaitOutcome::TimedOut;
            }
            // No real deadline (unbounded wait): this was our own bounded
            // polling interval, not a caller-visible timeout. Loop again.
        }
    }
}
