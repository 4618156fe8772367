//! N workers draining one shared queue.

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::future::TaskFuture;

use super::pool::WorkerPool;
use super::queue::TaskQueue;
use super::task::Task;

/// N worker pools sharing one logical task queue.
///
/// Every worker is an ordinary [`WorkerPool`] whose fetch side is rebound to
/// the group's shared queue, so exactly one worker claims any given task.
/// Pop order follows global submission order; which worker runs a task is
/// unspecified.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use strand::WorkerGroup;
///
/// let group = WorkerGroup::new(4).unwrap();
/// let counter = Arc::new(AtomicUsize::new(0));
///
/// for _ in 0..100 {
///     let counter = counter.clone();
///     group.post(move || {
///         counter.fetch_add(1, Ordering::Relaxed);
///     }).unwrap();
/// }
///
/// group.wait_all();
/// assert_eq!(counter.load(Ordering::Relaxed), 100);
/// ```
pub struct WorkerGroup {
    queue: Arc<TaskQueue>,
    workers: Vec<WorkerPool>,
}

impl WorkerGroup {
    /// Create a group with `num_workers` threads and default settings.
    pub fn new(num_workers: usize) -> Result<Self> {
        Self::with_config(Config::builder().num_workers(num_workers).build()?)
    }

    /// Create a group; worker count falls back to the number of CPUs when
    /// the config leaves it unset.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let count = config.worker_count();
        let queue = Arc::new(TaskQueue::new());

        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            workers.push(WorkerPool::with_queue(queue.clone(), &config, id)?);
        }

        Ok(Self { queue, workers })
    }

    /// Push onto the shared queue and wake all workers; any idle one may
    /// claim the task.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Task::new(f))?;
        self.queue.wake_all();
        Ok(())
    }

    /// Like [`post`](WorkerGroup::post), returning the task's future.
    pub fn post_with_result<F, R>(&self, f: F) -> Result<TaskFuture<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = Task::with_result(f);
        self.queue.push(task)?;
        self.queue.wake_all();
        Ok(handle)
    }

    /// Wake any workers left idle-waiting. Resume, as opposed to stop.
    pub fn run(&self) {
        self.queue.wake_all();
    }

    /// Block until the shared queue is empty and no worker is mid-task.
    ///
    /// A task already claimed but unfinished still holds this back; a
    /// drained queue alone is not "done".
    pub fn wait_all(&self) {
        self.queue.wait_idle();
    }

    /// Stop the shared queue and join every worker. Undelivered tasks are
    /// discarded; call [`wait_all`](WorkerGroup::wait_all) first to let
    /// them run.
    pub fn stop(&mut self) {
        self.queue.stop();
        for worker in &mut self.workers {
            worker.stop();
        }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Advisory snapshot of shared queue depth.
    pub fn task_count(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for WorkerGroup {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for WorkerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerGroup")
            .field("workers", &self.workers.len())
            .field("task_count", &self.task_count())
            .finish()
    }
}
