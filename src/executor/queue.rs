//! The shared FIFO behind every pool, plus the fetch seam workers drain.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};

use super::task::Task;

/// Where a worker looks for its next task.
///
/// [`TaskQueue`] is the only implementor, but the seam is what lets a
/// [`WorkerGroup`](crate::WorkerGroup) rebind a pool's worker loop to a
/// shared queue instead of a private one.
pub(crate) trait TaskSource: Send + Sync + 'static {
    /// Non-blocking fetch; a returned task is counted as in flight until
    /// [`task_finished`](TaskSource::task_finished) is called for it.
    fn try_fetch_next(&self) -> Option<Task>;

    /// Block until a task may be available. Returns `false` once the source
    /// has stopped and the worker should exit.
    fn wait_for_task(&self) -> bool;

    /// Mark the previously fetched task complete and signal drain-waiters.
    fn task_finished(&self);
}

struct QueueState {
    tasks: VecDeque<Task>,
    // Tasks popped but not yet finished. wait_idle must cover these: an
    // empty deque alone would report "drained" while work is mid-execution.
    in_flight: usize,
    stopping: bool,
}

/// Unbounded FIFO of tasks behind one exclusive lock.
///
/// Two condvars: `ready` wakes sleeping workers when work arrives, `drained`
/// wakes `wait_idle` callers when the last task finishes. The lock is never
/// held while a task executes.
pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
    drained: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                in_flight: 0,
                stopping: false,
            }),
            ready: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Enqueue a task and wake one worker. Posting after `stop` is a
    /// caller-contract violation and reported as `Error::Stopped`.
    pub fn push(&self, task: Task) -> Result<()> {
        let mut state = self.state.lock();
        if state.stopping {
            return Err(Error::Stopped);
        }
        state.tasks.push_back(task);
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    /// Wake every worker parked on this queue.
    pub fn wake_all(&self) {
        self.ready.notify_all();
    }

    /// Racy, advisory snapshot of queue depth.
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Block until nothing is queued and nothing is mid-execution.
    pub fn wait_idle(&self) {
        let mut state = self.state.lock();
        while !state.tasks.is_empty() || state.in_flight > 0 {
            self.drained.wait(&mut state);
        }
    }

    /// Stop the queue: undelivered tasks are discarded, not drained. Workers
    /// and drain-waiters are all woken so they can observe the flag.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.stopping = true;
        state.tasks.clear();
        drop(state);
        self.ready.notify_all();
        self.drained.notify_all();
    }
}

impl TaskSource for TaskQueue {
    fn try_fetch_next(&self) -> Option<Task> {
        let mut state = self.state.lock();
        let task = state.tasks.pop_front()?;
        state.in_flight += 1;
        Some(task)
    }

    fn wait_for_task(&self) -> bool {
        let mut state = self.state.lock();
        while state.tasks.is_empty() && !state.stopping {
            self.ready.wait(&mut state);
        }
        !state.stopping
    }

    fn task_finished(&self) {
        let mut state = self.state.lock();
        state.in_flight -= 1;
        if state.tasks.is_empty() && state.in_flight == 0 {
            drop(state);
            self.drained.notify_all();
        }
    }
}
