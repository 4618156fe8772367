//! Task representation and execution.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::future::{self, TaskFuture};

use super::worker::panic_message;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// An owned, zero-argument unit of work.
pub(crate) struct Task {
    pub(crate) id: TaskId,
    func: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            id: TaskId::next(),
            func: Box::new(f),
        }
    }

    /// Wrap a result-producing closure so its value (or captured panic) is
    /// written into a fresh single-assignment slot. The future wiring lives
    /// here, on the producer side; the queue only ever sees plain tasks.
    pub fn with_result<F, R>(f: F) -> (Self, TaskFuture<R>)
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (handle, slot) = future::pair();
        let task = Task::new(move || match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => slot.fill(Ok(value)),
            Err(payload) => slot.fill(Err(Error::task_failed(panic_message(payload.as_ref())))),
        });
        (task, handle)
    }

    /// Execute the task
    pub fn execute(self) {
        (self.func)();
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("id", &self.id).finish()
    }
}
