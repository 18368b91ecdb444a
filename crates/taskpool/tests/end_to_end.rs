//! End-to-end scenarios against the public `taskpool` API.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use taskpool::{Pool, PoolConfig, PoolError, Task};

#[test]
fn single_task() {
    let pool = Pool::new(PoolConfig::new(1)).unwrap();
    let task = Task::new(|x: &i32| x + 1, 41);
    pool.push(&task).unwrap();
    assert_eq!(task.join().unwrap(), 42);
    pool.shutdown().map_err(|(_, e)| e).unwrap();
}

#[test]
fn fan_out_across_bounded_workers() {
    let pool = Pool::new(PoolConfig::new(4)).unwrap();
    let tasks: Vec<_> = (0..100).map(|i| Task::new(move |_: &()| i, ())).collect();
    for t in &tasks {
        pool.push(t).unwrap();
    }
    let results: HashSet<i32> = tasks.iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(results, (0..100).collect());
    assert!(pool.thread_count() <= 4);
    pool.shutdown().map_err(|(_, e)| e).unwrap();
}

#[test]
fn bounded_queue_rejects_past_capacity() {
    // `max_tasks` bounds the ready queue only (the running task has already
    // been popped out of it); configuring it to 2 here reproduces the
    // "MAX_TASKS - 1 queued behind the one currently running" scenario with
    // a pool-wide resident cap of 3.
    let pool = Pool::new(PoolConfig::new(1).max_tasks(2)).unwrap();

    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let blocker = {
        let gate = gate.clone();
        Task::new(
            move |_: &()| {
                let (lock, cvar) = &*gate;
                let mut released = lock.lock().unwrap();
                while !*released {
                    released = cvar.wait(released).unwrap();
                }
            },
            (),
        )
    };
    pool.push(&blocker).unwrap();
    thread::sleep(Duration::from_millis(50));

    let mut accepted = 0;
    let spares: Vec<_> = (0..5).map(|_| Task::new(|_: &()| (), ())).collect();
    let mut rejected = None;
    for t in &spares {
        match pool.push(t) {
            Ok(()) => accepted += 1,
            Err(PoolError::TooManyTasks) => {
                rejected = Some(());
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(accepted, 2, "max_tasks(3) minus the one currently running leaves room for 2");
    assert!(rejected.is_some());

    let (lock, cvar) = &*gate;
    *lock.lock().unwrap() = true;
    cvar.notify_all();
    blocker.join().unwrap();
    for t in spares.iter().take(accepted) {
        t.join().unwrap();
    }
}

#[cfg(feature = "detach")]
#[test]
fn detach_leaves_no_busy_worker_behind() {
    let pool = Pool::new(PoolConfig::new(2)).unwrap();

    // Get both workers spawned: the sleeper occupies one, and a second push
    // (observing `free == 0, spawned < max_workers`) spawns the other.
    let sleeper = Task::new(
        |_: &()| {
            thread::sleep(Duration::from_millis(50));
        },
        (),
    );
    pool.push(&sleeper).unwrap();
    sleeper.detach().unwrap();

    let quick = Task::new(|_: &()| (), ());
    pool.push(&quick).unwrap();
    quick.join().unwrap();
    assert_eq!(pool.thread_count(), 2);

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        if pool.free_count() == 2 {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "worker never freed up after the detached task");
        thread::sleep(Duration::from_millis(10));
    }

    pool.shutdown().map_err(|(_, e)| e).unwrap();
}

#[cfg(feature = "timed-join")]
#[test]
fn timed_join_then_untimed_join() {
    let pool = Pool::new(PoolConfig::new(1)).unwrap();
    let task = Task::new(
        |_: &()| {
            thread::sleep(Duration::from_millis(100));
            7
        },
        (),
    );
    pool.push(&task).unwrap();

    assert!(matches!(task.timed_join(Duration::from_millis(10)), Err(PoolError::Timeout)));
    assert_eq!(task.timed_join(Duration::from_secs(1)).unwrap(), 7);
    pool.shutdown().map_err(|(_, e)| e).unwrap();
}

#[test]
fn repush_applies_mutated_argument() {
    let pool = Pool::new(PoolConfig::new(2)).unwrap();
    let task = Task::new(|x: &i32| x * 2, 5);
    pool.push(&task).unwrap();
    assert_eq!(task.join().unwrap(), 10);

    *task.argument() = 9;
    pool.push(&task).unwrap();
    assert_eq!(task.join().unwrap(), 18);

    pool.shutdown().map_err(|(_, e)| e).unwrap();
}
