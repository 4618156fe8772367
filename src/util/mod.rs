//! Cache-layout helpers.

pub mod aligned;

pub use aligned::{AlignedArray, CACHE_LINE_SIZE};
