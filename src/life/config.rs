use std::time::Duration;

use super::error::ConfigError;

/// Default cadence of alive-cell reports.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for one simulation run.
///
/// Everything is fixed before the run starts. Build with [`Params::new`] and
/// the chainable setters, then [`Params::validate`] (done by `run` as well).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub width: usize,
    pub height: usize,
    /// Number of generations to execute.
    pub turns: u64,
    /// Worker count. `None` resolves to the number of logical CPUs.
    pub threads: Option<usize>,
    /// How often the sampler reports the alive-cell count.
    pub sample_interval: Duration,
}

impl Params {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            turns: 0,
            threads: None,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    pub fn turns(mut self, turns: u64) -> Self {
        self.turns = turns;
        self
    }

    /// Set an explicit worker count. Zero is rejected by `validate`.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Worker count after applying the CPU default.
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.resolved_threads() == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.sample_interval.is_zero() {
            return Err(ConfigError::ZeroSampleInterval);
        }
        Ok(())
    }

    /// Label of the initial raster, `"{width}x{height}"`.
    pub fn input_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Label of a snapshot taken after `turn` generations.
    pub fn output_label(&self, turn: u64) -> String {
        format!("{}x{}x{}", self.width, self.height, turn)
    }
}
