// worker thread loop
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::queue::TaskSource;
use super::task::Task;

pub(crate) struct Worker {
    source: Arc<dyn TaskSource>,
}

impl Worker {
    pub fn new(source: Arc<dyn TaskSource>) -> Self {
        Self { source }
    }

    // main loop: fetch, run, signal; park when the source is empty and exit
    // once it reports stopped
    pub fn run(&self) {
        loop {
            match self.source.try_fetch_next() {
                Some(task) => {
                    self.execute_task(task);
                    self.source.task_finished();
                }
                None => {
                    if !self.source.wait_for_task() {
                        break;
                    }
                }
            }
        }
    }

    fn execute_task(&self, task: Task) {
        let id = task.id;

        // A fire-and-forget task that panics must not take the worker down
        // with it. Result-producing tasks carry their own capture wrapper,
        // so this only fires for plain posts.
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task.execute())) {
            log::error!("task {:?} panicked: {}", id, panic_message(payload.as_ref()));
        }
    }
}

/// Best-effort extraction of a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
