use std::error::Error;
use std::fmt;

use crate::io::IoError;

/// Invalid run configuration, detected before any input is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDimension { width: usize, height: usize },
    GridTooLarge { width: usize, height: usize },
    ZeroThreads,
    ZeroSampleInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be positive (got {width}x{height})")
            }
            ConfigError::GridTooLarge { width, height } => {
                write!(f, "grid of {width}x{height} cells does not fit in memory")
            }
            ConfigError::ZeroThreads => write!(f, "worker count must be at least 1"),
            ConfigError::ZeroSampleInterval => write!(f, "sample interval must be positive"),
        }
    }
}

impl Error for ConfigError {}

/// Failure of a simulation run.
#[derive(Debug)]
pub enum GolError {
    Config(ConfigError),
    Io(IoError),
    ThreadPool(rayon::ThreadPoolBuildError),
    Spawn(std::io::Error),
    /// A worker panicked while producing generation `turn`; that generation
    /// was discarded.
    WorkerPanicked { turn: u64 },
}

impl fmt::Display for GolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GolError::Config(e) => write!(f, "invalid configuration: {e}"),
            GolError::Io(e) => write!(f, "image i/o failed: {e}"),
            GolError::ThreadPool(e) => write!(f, "failed to build worker pool: {e}"),
            GolError::Spawn(e) => write!(f, "failed to spawn sampler thread: {e}"),
            GolError::WorkerPanicked { turn } => {
                write!(f, "a worker panicked while computing turn {turn}")
            }
        }
    }
}

impl Error for GolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GolError::Config(e) => Some(e),
            GolError::Io(e) => Some(e),
            GolError::ThreadPool(e) => Some(e),
            GolError::Spawn(e) => Some(e),
            GolError::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for GolError {
    fn from(err: ConfigError) -> Self {
        GolError::Config(err)
    }
}

impl From<IoError> for GolError {
    fn from(err: IoError) -> Self {
        GolError::Io(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for GolError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        GolError::ThreadPool(err)
    }
}
