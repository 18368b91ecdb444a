//! The pool: ready queue, lazily-spawned workers, and the worker loop.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use taskpool_core::state::TaskState;
use taskpool_core::{tpdebug, tpinfo, tpwarn};
use taskpool_core::{Job, PoolError, PoolResult, RingBuffer};

use crate::config::PoolConfig;

struct Queue {
    ring: RingBuffer<Arc<dyn Job>>,
    spawned: usize,
    free: usize,
    shutting_down: bool,
    handles: Vec<JoinHandle<()>>,
}

struct Shared {
    max_workers: usize,
    max_tasks: usize,
    lock: Mutex<Queue>,
    not_empty: Condvar,
}

/// A bounded pool of lazily-spawned worker threads.
///
/// Workers are started one at a time, only when a pushed task finds no idle
/// worker waiting; the pool never spawns more than `max_workers` and never
/// shrinks until [`Pool::shutdown`] joins every worker that was ever started.
pub struct Pool {
    shared: Arc<Shared>,
}

impl Pool {
    /// Build a pool from a validated configuration. Spawns no workers yet.
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        config.validate().map_err(|_| PoolError::InvalidArgument)?;
        let queue = Queue {
            ring: RingBuffer::new(config.initial_queue_capacity),
            spawned: 0,
            free: 0,
            shutting_down: false,
            handles: Vec::new(),
        };
        Ok(Self {
            shared: Arc::new(Shared {
                max_workers: config.max_workers,
                max_tasks: config.max_tasks,
                lock: Mutex::new(queue),
                not_empty: Condvar::new(),
            }),
        })
    }

    /// Number of worker threads spawned so far (monotonic until shutdown).
    pub fn thread_count(&self) -> usize {
        self.shared.lock.lock().unwrap().spawned
    }

    /// Number of spawned workers currently idle, waiting on the ready queue.
    pub fn free_count(&self) -> usize {
        self.shared.lock.lock().unwrap().free
    }

    /// Push a type-erased job onto the ready queue, spawning a worker if none
    /// is idle and the pool has room to grow.
    ///
    /// `job` must already have made the `Created -> Pushed` or
    /// `Joined -> Pushed` transition; this method only enqueues.
    pub fn push_task(&self, job: Arc<dyn Job>) -> PoolResult<()> {
        let mut q = self.shared.lock.lock().unwrap();
        if q.shutting_down {
            return Err(PoolError::InvalidArgument);
        }
        if q.ring.size() >= self.shared.max_tasks {
            return Err(PoolError::TooManyTasks);
        }
        q.ring.push(job);
        if q.free == 0 && q.spawned < self.shared.max_workers {
            let id = q.spawned;
            let shared = Arc::clone(&self.shared);
            match thread::Builder::new()
                .name(format!("taskpool-worker-{id}"))
                .spawn(move || worker_loop(shared, id))
            {
                Ok(handle) => {
                    q.spawned += 1;
                    q.handles.push(handle);
                    tpdebug!("spawned worker {id}");
                }
                Err(err) => {
                    // The task is already enqueued; an existing or
                    // future worker will still pick it up.
                    tpwarn!("failed to spawn worker {id}: {err}");
                    return Err(PoolError::WorkerSpawnFailed(err));
                }
            }
        }
        self.shared.not_empty.notify_one();
        Ok(())
    }

    /// Shut the pool down: legal only once the ready queue is empty and
    /// every spawned worker is idle. On success, every worker thread has
    /// been joined. On failure the pool is returned unchanged so the caller
    /// can retry later.
    pub fn shutdown(self) -> Result<(), (Self, PoolError)> {
        let handles = {
            let mut q = self.shared.lock.lock().unwrap();
            if !q.ring.is_empty() || q.free != q.spawned {
                return Err((self, PoolError::HasTasks));
            }
            q.shutting_down = true;
            self.shared.not_empty.notify_all();
            std::mem::take(&mut q.handles)
        };
        for handle in handles {
            let _ = handle.join();
        }
        tpinfo!("pool shut down");
        Ok(())
    }
}

/// Pop the next task, folding in the previous iteration's completion
/// transition under the same lock acquisition. Returns `None` when the pool
/// is shutting down and the queue has run dry.
fn next_task(shared: &Arc<Shared>, prev: &mut Option<Arc<dyn Job>>) -> Option<Arc<dyn Job>> {
    let mut q = shared.lock.lock().unwrap();

    if let Some(finished) = prev.take() {
        if finished.state().transition(TaskState::Running, TaskState::Completed) {
            // Attached path: the joiner will observe Completed and take it from here.
        } else if finished.state().transition(TaskState::RunningGhost, TaskState::Joined) {
            // Detached path: no joiner is coming. Drop our reference now;
            // if it was the last one, the task is freed here.
            drop(finished);
        } else {
            unreachable!("worker's previous task left Running/RunningGhost on its own");
        }
    }

    q.free += 1;
    loop {
        if q.ring.size() > 0 {
            break;
        }
        if q.shutting_down {
            q.free -= 1;
            return None;
        }
        q = shared.not_empty.wait(q).unwrap();
    }
    q.free -= 1;
    Some(q.ring.pop())
}

fn worker_loop(shared: Arc<Shared>, id: usize) {
    taskpool_core::tplog::set_worker_id(id as u32);
    tpdebug!("worker started");
    let mut prev: Option<Arc<dyn Job>> = None;
    loop {
        let task = match next_task(&shared, &mut prev) {
            Some(task) => task,
            None => break,
        };

        let is_ghost = if task.state().transition(TaskState::Pushed, TaskState::Running) {
            false
        } else if task.state().transition(TaskState::PushedGhost, TaskState::RunningGhost) {
            true
        } else {
            unreachable!("popped task was not in a pushed state");
        };
        tptrace_pickup(is_ghost);

        task.execute();
        prev = Some(task);
    }
    tpdebug!("worker exiting");
}

#[inline]
fn tptrace_pickup(is_ghost: bool) {
    taskpool_core::tptrace!("picked up task (ghost={is_ghost})");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use taskpool_core::state::TaskStateWord;

    struct CountingJob {
        state: TaskStateWord,
        counter: Arc<AtomicUsize>,
    }

    impl Job for CountingJob {
        fn state(&self) -> &TaskStateWord {
            &self.state
        }
        fn execute(&self) {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pushed_job(counter: Arc<AtomicUsize>) -> Arc<CountingJob> {
        let state = TaskStateWord::new(TaskState::Created);
        assert!(state.transition(TaskState::Created, TaskState::Pushed));
        Arc::new(CountingJob { state, counter })
    }

    #[test]
    fn test_single_task_runs_to_completion() {
        let pool = Pool::new(PoolConfig::new(2)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let job = pushed_job(counter.clone());
        pool.push_task(job.clone()).unwrap();

        let outcome = job.state().wait_for(TaskState::Completed, Some(Duration::from_secs(5)));
        assert_eq!(outcome, taskpool_core::WaitOutcome::Woken);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(job.state().transition(TaskState::Completed, TaskState::Joined));

        pool.shutdown().map_err(|(_, e)| e).unwrap();
    }

    #[test]
    fn test_fan_out_across_bounded_workers() {
        let pool = Pool::new(PoolConfig::new(4)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let jobs: Vec<_> = (0..100).map(|_| pushed_job(counter.clone())).collect();
        for job in &jobs {
            pool.push_task(job.clone()).unwrap();
        }
        for job in &jobs {
            job.state().wait_for(TaskState::Completed, Some(Duration::from_secs(10)));
            assert!(job.state().transition(TaskState::Completed, TaskState::Joined));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert!(pool.thread_count() <= 4);
        pool.shutdown().map_err(|(_, e)| e).unwrap();
    }

    #[test]
    fn test_too_many_tasks_rejected() {
        let pool = Pool::new(PoolConfig::new(1).max_tasks(2)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        // Block the lone worker on the first task so the next two queue up.
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        struct BlockingJob {
            state: TaskStateWord,
            gate: Arc<(Mutex<bool>, Condvar)>,
        }
        impl Job for BlockingJob {
            fn state(&self) -> &TaskStateWord {
                &self.state
            }
            fn execute(&self) {
                let (lock, cvar) = &*self.gate;
                let mut released = lock.lock().unwrap();
                while !*released {
                    released = cvar.wait(released).unwrap();
                }
            }
        }
        let blocker_state = TaskStateWord::new(TaskState::Created);
        assert!(blocker_state.transition(TaskState::Created, TaskState::Pushed));
        let blocker = Arc::new(BlockingJob { state: blocker_state, gate: gate.clone() });
        pool.push_task(blocker.clone()).unwrap();

        // Give the worker a moment to pick up the blocker.
        std::thread::sleep(Duration::from_millis(50));

        let a = pushed_job(counter.clone());
        let b = pushed_job(counter.clone());
        let c = pushed_job(counter.clone());
        pool.push_task(a).unwrap();
        pool.push_task(b).unwrap();
        let err = pool.push_task(c).unwrap_err();
        assert!(matches!(err, PoolError::TooManyTasks));

        let (lock, cvar) = &*gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
        blocker.state().wait_for(TaskState::Completed, Some(Duration::from_secs(5)));
        assert!(blocker.state().transition(TaskState::Completed, TaskState::Joined));
    }
}
