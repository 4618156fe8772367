//! Task execution infrastructure.
//!
//! This module provides the worker thread loop, the task queue and its
//! fetch seam, and the two producer-facing surfaces built on them:
//! [`WorkerPool`] and [`WorkerGroup`].

pub mod group;
pub mod pool;

pub(crate) mod queue;
pub(crate) mod task;
pub(crate) mod worker;

pub use group::WorkerGroup;
pub use pool::WorkerPool;
