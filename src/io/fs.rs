//! Filesystem collaborator: reads `<input_dir>/<label>.pgm`, writes
//! `<output_dir>/<label>.pgm` on a background thread.
//!
//! The first failed write is kept and handed back by the next
//! `request_output` or by `query_idle` once the writer has drained.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, unbounded};

use super::{ImageIo, IoError, pgm};

struct WriteJob {
    path: PathBuf,
    bytes: Vec<u8>,
}

pub struct PgmIo {
    input_dir: PathBuf,
    output_dir: PathBuf,
    jobs: Option<Sender<WriteJob>>,
    pending: Arc<AtomicUsize>,
    failure: Arc<Mutex<Option<IoError>>>,
    writer: Option<JoinHandle<()>>,
}

impl PgmIo {
    /// Create the output directory if needed and start the writer thread.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self, IoError> {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| IoError::Write {
            path: output_dir.clone(),
            source,
        })?;

        let (jobs, rx) = unbounded::<WriteJob>();
        let pending = Arc::new(AtomicUsize::new(0));
        let failure = Arc::new(Mutex::new(None));
        let writer_pending = Arc::clone(&pending);
        let writer_failure = Arc::clone(&failure);
        let writer = thread::Builder::new()
            .name("pgm-writer".into())
            .spawn(move || {
                for job in rx {
                    match fs::write(&job.path, &job.bytes) {
                        Ok(()) => log::info!("wrote {}", job.path.display()),
                        Err(source) => {
                            log::error!("failed to write {}: {source}", job.path.display());
                            let mut slot =
                                writer_failure.lock().unwrap_or_else(PoisonError::into_inner);
                            // Keep the first failure; later ones usually share its cause.
                            if slot.is_none() {
                                *slot = Some(IoError::Write {
                                    path: job.path,
                                    source,
                                });
                            }
                        }
                    }
                    // Published after the failure so an idle writer never hides one.
                    writer_pending.fetch_sub(1, Ordering::AcqRel);
                }
            })
            .map_err(|source| IoError::Write {
                path: output_dir.clone(),
                source,
            })?;

        Ok(Self {
            input_dir,
            output_dir,
            jobs: Some(jobs),
            pending,
            failure,
            writer: Some(writer),
        })
    }

    pub fn output_path(&self, label: &str) -> PathBuf {
        pgm_path(&self.output_dir, label)
    }

    fn take_failure(&self) -> Result<(), IoError> {
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        failure.map_or(Ok(()), Err)
    }
}

fn pgm_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{label}.pgm"))
}

impl ImageIo for PgmIo {
    fn request_input(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, IoError> {
        let path = pgm_path(&self.input_dir, label);
        let bytes = fs::read(&path).map_err(|source| IoError::Read { path, source })?;
        pgm::decode(label, &bytes, width, height)
    }

    fn request_output(
        &mut self,
        label: &str,
        width: usize,
        height: usize,
        raster: &[u8],
    ) -> Result<(), IoError> {
        self.take_failure()?;
        let jobs = self.jobs.as_ref().ok_or(IoError::WriterStopped)?;
        let job = WriteJob {
            path: self.output_path(label),
            bytes: pgm::encode(width, height, raster),
        };
        self.pending.fetch_add(1, Ordering::AcqRel);
        if jobs.send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(IoError::WriterStopped);
        }
        Ok(())
    }

    fn query_idle(&mut self) -> Result<bool, IoError> {
        if self.pending.load(Ordering::Acquire) > 0 {
            return Ok(false);
        }
        self.take_failure()?;
        Ok(true)
    }
}

impl Drop for PgmIo {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                log::error!("pgm writer thread panicked");
            }
        }
    }
}
