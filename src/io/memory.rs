use std::collections::HashMap;

use super::{ImageIo, IoError};

/// A raster handed to [`MemoryIo::request_output`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub label: String,
    pub width: usize,
    pub height: usize,
    pub raster: Vec<u8>,
}

/// In-memory collaborator: inputs are registered up front, outputs are kept
/// in request order. Always idle.
#[derive(Clone, Debug, Default)]
pub struct MemoryIo {
    inputs: HashMap<String, Vec<u8>>,
    outputs: Vec<Snapshot>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `raster` as the input served under `label`.
    pub fn with_input(mut self, label: impl Into<String>, raster: Vec<u8>) -> Self {
        self.inputs.insert(label.into(), raster);
        self
    }

    pub fn outputs(&self) -> &[Snapshot] {
        &self.outputs
    }

    /// The most recent snapshot saved under `label`.
    pub fn output(&self, label: &str) -> Option<&Snapshot> {
        self.outputs.iter().rev().find(|s| s.label == label)
    }
}

impl ImageIo for MemoryIo {
    fn request_input(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, IoError> {
        let raster = self.inputs.get(label).ok_or_else(|| IoError::Missing {
            label: label.to_owned(),
        })?;
        let expected = width * height;
        if raster.len() != expected {
            return Err(IoError::Truncated {
                label: label.to_owned(),
                expected,
                found: raster.len(),
            });
        }
        Ok(raster.clone())
    }

    fn request_output(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
        raster: &[u8],
    ) -> Result<(), IoError> {
        self.outputs.push(Snapshot {
            label: label.to_owned(),
            width,
            height,
            raster: raster.to_vec(),
        });
        Ok(())
    }

    fn query_idle(&mut self) -> Result<bool, IoError> {
        Ok(true)
    }
}
