//! Image I/O collaborator.
//!
//! The engine only talks to [`ImageIo`]: one request for the initial raster,
//! one request per snapshot, and an idle query before shutting down.
//! Rasters are row-major, one byte per cell, nonzero meaning alive.

mod fs;
mod memory;
pub mod pgm;

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub use fs::PgmIo;
pub use memory::{MemoryIo, Snapshot};

pub trait ImageIo {
    /// Fetch the `width * height` raster stored under `label`.
    fn request_input(&mut self, label: &str, width: usize, height: usize)
    -> Result<Vec<u8>, IoError>;

    /// Persist `raster` under `label`. May complete in the background.
    fn request_output(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
        raster: &[u8],
    ) -> Result<(), IoError>;

    /// Whether every requested operation has finished. A background
    /// failure is reported here once nothing is left in flight.
    fn query_idle(&mut self) -> Result<bool, IoError>;
}

impl<T: ImageIo + ?Sized> ImageIo for &mut T {
    fn request_input(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, IoError> {
        (**self).request_input(label, width, height)
    }

    fn request_output(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
        raster: &[u8],
    ) -> Result<(), IoError> {
        (**self).request_output(label, width, height, raster)
    }

    fn query_idle(&mut self) -> Result<bool, IoError> {
        (**self).query_idle()
    }
}

#[derive(Debug)]
pub enum IoError {
    Read { path: PathBuf, source: std::io::Error },
    Write { path: PathBuf, source: std::io::Error },
    /// No raster is available under this label.
    Missing { label: String },
    /// The data is not a binary (P5) PGM.
    NotPgm { label: String },
    Header { label: String, reason: String },
    MaxVal { label: String, found: u32 },
    Dimensions {
        label: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
    Truncated { label: String, expected: usize, found: usize },
    /// The background writer is no longer accepting work.
    WriterStopped,
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            IoError::Write { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
            IoError::Missing { label } => write!(f, "no image named {label}"),
            IoError::NotPgm { label } => write!(f, "{label} is not a binary pgm file"),
            IoError::Header { label, reason } => write!(f, "{label}: bad pgm header: {reason}"),
            IoError::MaxVal { label, found } => {
                write!(f, "{label}: expected maxval 255, found {found}")
            }
            IoError::Dimensions {
                label,
                expected,
                found,
            } => write!(
                f,
                "{label}: expected {}x{} image, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            IoError::Truncated {
                label,
                expected,
                found,
            } => write!(f, "{label}: expected {expected} pixels, found {found}"),
            IoError::WriterStopped => write!(f, "image writer has stopped"),
        }
    }
}

impl Error for IoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IoError::Read { source, .. } | IoError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
