//! STRAND - dedicated worker threads, shared task queues, and
//! false-sharing-free scratch storage.
//!
//! # Quick Start
//!
//! ```
//! use strand::prelude::*;
//!
//! // One dedicated worker draining a private FIFO queue
//! let pool = WorkerPool::new().unwrap();
//! let answer = pool.post_with_result(|| 6 * 7).unwrap();
//! assert_eq!(answer.wait().unwrap(), 42);
//!
//! // Four workers draining one shared queue
//! let group = WorkerGroup::new(4).unwrap();
//! group.post(|| println!("claimed by whichever worker is idle")).unwrap();
//! group.wait_all();
//! ```
//!
//! # Features
//!
//! - **`WorkerPool`**: one dedicated thread, FIFO execution order,
//!   future-returning submission, drain-wait, and graceful stop
//! - **`WorkerGroup`**: N pools rebound to one shared queue; global FIFO
//!   pop order, at-most-once task claims, group-wide wait and stop
//! - **`TaskFuture`**: single-assignment result handle; a panicking task
//!   surfaces its failure on read, never as a crash
//! - **`AlignedArray`**: per-cell cache-line-aligned allocation for
//!   per-worker counters that must not share a cache line

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod future;
pub mod prelude;
pub mod util;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{WorkerGroup, WorkerPool};
pub use future::TaskFuture;
pub use util::{AlignedArray, CACHE_LINE_SIZE};
