//! One-stop import for the crate's public surface.

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{WorkerGroup, WorkerPool};
pub use crate::future::TaskFuture;
pub use crate::util::{AlignedArray, CACHE_LINE_SIZE};
