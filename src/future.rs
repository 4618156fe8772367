//! Single-assignment result handles for posted tasks.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};

struct Shared<R> {
    cell: Mutex<Option<Result<R>>>,
    ready: Condvar,
}

/// Reader half of a single-assignment result cell.
///
/// Returned by `post_with_result`; the executing worker writes the task's
/// value (or captured failure) exactly once, and [`wait`](TaskFuture::wait)
/// blocks until that write happens.
pub struct TaskFuture<R> {
    shared: Arc<Shared<R>>,
}

/// Write-once half held by the task wrapper. Consuming `fill` makes a second
/// assignment unrepresentable; dropping an unfilled slot writes
/// `Error::Stopped` so waiters are never stranded when the task itself is
/// discarded at shutdown.
pub(crate) struct ResultSlot<R> {
    shared: Option<Arc<Shared<R>>>,
}

pub(crate) fn pair<R>() -> (TaskFuture<R>, ResultSlot<R>) {
    let shared = Arc::new(Shared {
        cell: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        TaskFuture {
            shared: shared.clone(),
        },
        ResultSlot {
            shared: Some(shared),
        },
    )
}

impl<R> TaskFuture<R> {
    /// Non-blocking probe for whether the outcome has been written.
    pub fn is_ready(&self) -> bool {
        self.shared.cell.lock().is_some()
    }

    /// Block until the outcome is written, then take it.
    ///
    /// Yields the task's value, `Error::TaskFailed` if it panicked, or
    /// `Error::Stopped` if it was discarded by shutdown before running.
    pub fn wait(self) -> Result<R> {
        let mut cell = self.shared.cell.lock();
        loop {
            if let Some(result) = cell.take() {
                return result;
            }
            self.shared.ready.wait(&mut cell);
        }
    }
}

impl<R> ResultSlot<R> {
    pub fn fill(mut self, result: Result<R>) {
        self.write(result);
    }

    fn write(&mut self, result: Result<R>) {
        if let Some(shared) = self.shared.take() {
            let mut cell = shared.cell.lock();
            debug_assert!(cell.is_none(), "result slot filled twice");
            *cell = Some(result);
            drop(cell);
            shared.ready.notify_all();
        }
    }
}

impl<R> Drop for ResultSlot<R> {
    fn drop(&mut self) {
        // The task never ran: it was discarded by stop() before a worker
        // claimed it. The future still gets its one write.
        self.write(Err(Error::Stopped));
    }
}

impl<R> fmt::Debug for TaskFuture<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFuture")
            .field("ready", &self.is_ready())
            .finish()
    }
}
