//! Construction-time settings for pools and groups.

use crate::error::{Error, Result};

/// Settings shared by [`WorkerPool`](crate::WorkerPool) and
/// [`WorkerGroup`](crate::WorkerGroup) construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads for a group. `None` means one per CPU.
    pub num_workers: Option<usize>,
    /// Prefix for worker thread names; the worker index is appended.
    pub thread_name_prefix: String,
    /// Stack size per worker thread, if overridden.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: None,
            thread_name_prefix: "strand-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
        }
    }
}

impl Config {
    /// Start building a config from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the settings for contradictions and out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_workers {
            if n == 0 {
                return Err(Error::config("num_workers must be > 0"));
            }
            if n > 1024 {
                return Err(Error::config("num_workers too large (max 1024)"));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    /// Worker count for a group, falling back to the number of CPUs.
    pub fn worker_count(&self) -> usize {
        self.num_workers.unwrap_or_else(num_cpus::get)
    }
}

/// Fluent builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of worker threads for a group.
    pub fn num_workers(mut self, n: usize) -> Self {
        self.config.num_workers = Some(n);
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the stack size per worker thread, in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Validate and produce the final config.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
