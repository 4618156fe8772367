//! A single dedicated worker thread and its producer-facing surface.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::error::Result;
use crate::future::TaskFuture;

use super::queue::{TaskQueue, TaskSource};
use super::task::Task;
use super::worker::Worker;

/// A single dedicated worker thread draining one task source.
///
/// The worker thread spawns on construction and parks whenever its source is
/// empty. Life cycle: running until [`stop`](WorkerPool::stop) (or drop),
/// which discards undelivered tasks, wakes the worker, and joins it.
///
/// # Examples
///
/// ```
/// use strand::WorkerPool;
///
/// let pool = WorkerPool::new().unwrap();
/// let answer = pool.post_with_result(|| 6 * 7).unwrap();
/// assert_eq!(answer.wait().unwrap(), 42);
/// ```
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create a pool with a private queue and default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a pool with a private queue.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Self::with_queue(Arc::new(TaskQueue::new()), &config, 0)
    }

    /// Bind a worker to an externally owned queue. This is the seam
    /// `WorkerGroup` uses to reuse the pool's thread machinery while
    /// sourcing work from a shared queue.
    pub(crate) fn with_queue(queue: Arc<TaskQueue>, config: &Config, id: usize) -> Result<Self> {
        let source: Arc<dyn TaskSource> = queue.clone();

        let mut builder =
            thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, id));
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let thread = builder.spawn(move || Worker::new(source).run())?;

        Ok(Self {
            queue,
            thread: Some(thread),
        })
    }

    /// Enqueue a fire-and-forget task.
    ///
    /// Returns `Error::Stopped` once the pool has been stopped.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Task::new(f))
    }

    /// Enqueue a result-producing task and get its future.
    ///
    /// The worker writes the closure's value, or its captured panic as
    /// `Error::TaskFailed`, into the returned handle exactly once.
    pub fn post_with_result<F, R>(&self, f: F) -> Result<TaskFuture<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = Task::with_result(f);
        self.queue.push(task)?;
        Ok(handle)
    }

    /// Block until the queue is empty and no task is mid-execution.
    ///
    /// Best-effort with respect to concurrent posters: a task posted while
    /// `wait` is in progress may or may not be covered.
    pub fn wait(&self) {
        self.queue.wait_idle();
    }

    /// Advisory snapshot of queue depth.
    pub fn task_count(&self) -> usize {
        self.queue.len()
    }

    /// Stop the pool and join its worker. Undelivered tasks are discarded;
    /// call [`wait`](WorkerPool::wait) first to let them run. Idempotent.
    pub fn stop(&mut self) {
        self.queue.stop();
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("task_count", &self.task_count())
            .field("stopped", &self.thread.is_none())
            .finish()
    }
}
