use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use strand::prelude::*;

#[test]
fn test_group_counts_every_task_exactly_once() {
    let group = WorkerGroup::new(4).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..1000 {
        let counter = counter.clone();
        group
            .post(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }

    group.wait_all();
    assert_eq!(counter.load(Ordering::Relaxed), 1000);
}

#[test]
fn test_at_most_once_under_concurrent_producers() {
    const PRODUCERS: usize = 4;
    const TASKS_PER_PRODUCER: usize = 250;

    let group = WorkerGroup::new(4).unwrap();
    let runs: Arc<Vec<AtomicUsize>> = Arc::new(
        (0..PRODUCERS * TASKS_PER_PRODUCER)
            .map(|_| AtomicUsize::new(0))
            .collect(),
    );

    thread::scope(|s| {
        for p in 0..PRODUCERS {
            let group = &group;
            let runs = runs.clone();
            s.spawn(move || {
                for t in 0..TASKS_PER_PRODUCER {
                    let runs = runs.clone();
                    let slot = p * TASKS_PER_PRODUCER + t;
                    group
                        .post(move || {
                            runs[slot].fetch_add(1, Ordering::Relaxed);
                        })
                        .unwrap();
                }
            });
        }
    });

    group.wait_all();
    for slot in runs.iter() {
        assert_eq!(slot.load(Ordering::Relaxed), 1);
    }
}

#[test]
fn test_wait_all_covers_in_flight_tasks() {
    let group = WorkerGroup::new(2).unwrap();
    let finished = Arc::new(AtomicBool::new(false));

    let flag = finished.clone();
    group
        .post(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();

    // Give a worker time to claim the task before we wait, so the queue is
    // already drained while the task is still running.
    thread::sleep(Duration::from_millis(10));
    group.wait_all();
    assert!(finished.load(Ordering::SeqCst));
}

#[test]
fn test_single_worker_group_preserves_fifo() {
    let group = WorkerGroup::new(1).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    for i in 1..=100 {
        let log = log.clone();
        group.post(move || log.lock().push(i)).unwrap();
    }

    group.wait_all();
    assert_eq!(*log.lock(), (1..=100).collect::<Vec<i32>>());
}

#[test]
fn test_group_futures() {
    let group = WorkerGroup::new(4).unwrap();

    let futures: Vec<_> = (0..100)
        .map(|i| group.post_with_result(move || i * 2).unwrap())
        .collect();

    let total: i32 = futures.into_iter().map(|f| f.wait().unwrap()).sum();
    assert_eq!(total, (0..100).map(|i| i * 2).sum());
}

#[test]
fn test_group_future_failure() {
    let group = WorkerGroup::new(2).unwrap();
    let future = group
        .post_with_result(|| -> i32 { panic!("in a group") })
        .unwrap();
    assert!(matches!(future.wait(), Err(Error::TaskFailed(_))));
}

#[test]
fn test_zero_workers_is_config_error() {
    assert!(matches!(WorkerGroup::new(0), Err(Error::Config(_))));
}

#[test]
fn test_default_worker_count_matches_cpus() {
    let group = WorkerGroup::with_config(Config::default()).unwrap();
    assert!(group.worker_count() >= 1);
}

#[test]
fn test_run_resumes_idle_workers() {
    let group = WorkerGroup::new(2).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    // Let the workers go idle, then resume and post again.
    group.wait_all();
    group.run();

    for _ in 0..10 {
        let counter = counter.clone();
        group
            .post(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }

    group.wait_all();
    assert_eq!(counter.load(Ordering::Relaxed), 10);
}

#[test]
fn test_post_after_stop_is_rejected() {
    let mut group = WorkerGroup::new(2).unwrap();
    group.stop();
    assert!(matches!(group.post(|| {}), Err(Error::Stopped)));
}

#[test]
fn test_randomized_shutdown_with_pending_tasks() {
    use rand::Rng;

    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let posted = rng.gen_range(0..128);
        let executed = Arc::new(AtomicUsize::new(0));
        let group = WorkerGroup::new(4).unwrap();

        for _ in 0..posted {
            let executed = executed.clone();
            group
                .post(move || {
                    executed.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
        }

        drop(group);
        assert!(executed.load(Ordering::Relaxed) <= posted);
    }
}

#[test]
fn test_group_with_aligned_per_worker_counters() {
    const WORKERS: usize = 4;
    const TASKS: usize = 400;

    let group = WorkerGroup::new(WORKERS).unwrap();
    let counters = Arc::new(AlignedArray::<AtomicUsize>::new(WORKERS));

    // Each task bumps a slot chosen round-robin; slots live on separate
    // cache lines so concurrent workers never false-share.
    for i in 0..TASKS {
        let counters = counters.clone();
        group
            .post(move || {
                counters[i % WORKERS].fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }

    group.wait_all();
    let total: usize = counters
        .iter()
        .map(|cell| cell.load(Ordering::Relaxed))
        .sum();
    assert_eq!(total, TASKS);
}
