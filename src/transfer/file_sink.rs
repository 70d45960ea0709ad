//! Sink that streams transfers into a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::share::ShareSlug;

use super::error::TransferError;
use super::filename::{fallback_filename, resolve_unique_path, sanitize_filename};
use super::handoff::{ByteStream, Transfer, TransferSink};

/// Attempts at claiming a fresh file name before giving up.
const MAX_CREATE_ATTEMPTS: usize = 8;

type PendingTransfer = JoinHandle<Result<SavedTransfer, TransferError>>;

/// A transfer that finished writing to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTransfer {
    /// Share the bytes came from.
    pub slug: ShareSlug,
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes_written: u64,
}

/// Writes each handed-off transfer to `output_dir` on its own task.
///
/// Must be used from within a tokio runtime: `hand_off` spawns.
#[derive(Debug)]
pub struct FileSink {
    output_dir: PathBuf,
    show_progress: bool,
    pending: Mutex<Vec<PendingTransfer>>,
}

impl FileSink {
    /// Creates a sink writing into `output_dir` (created on first transfer).
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            show_progress: false,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Enables or disables the terminal progress bar.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Directory transfers are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of transfers handed off and not yet collected by [`wait`](Self::wait).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending_handles().len()
    }

    /// Waits for every outstanding transfer and returns their results in hand-off order.
    pub async fn wait(&self) -> Vec<Result<SavedTransfer, TransferError>> {
        let handles = std::mem::take(&mut *self.pending_handles());
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(TransferError::task(join_error.to_string())),
            });
        }
        results
    }

    fn pending_handles(&self) -> MutexGuard<'_, Vec<PendingTransfer>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TransferSink for FileSink {
    fn hand_off(&self, transfer: Transfer) {
        debug!(slug = %transfer.slug(), "transfer handed to file sink");
        let handle = tokio::spawn(write_transfer(
            self.output_dir.clone(),
            transfer,
            self.show_progress,
        ));
        self.pending_handles().push(handle);
    }
}

async fn write_transfer(
    output_dir: PathBuf,
    transfer: Transfer,
    show_progress: bool,
) -> Result<SavedTransfer, TransferError> {
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| TransferError::io(output_dir.clone(), e))?;

    let slug = transfer.slug().clone();
    let name = transfer
        .file_name()
        .map(sanitize_filename)
        .unwrap_or_else(|| fallback_filename(&slug));
    let expected_bytes = transfer.content_length();

    let (path, file) = create_unique_file(&output_dir, &name).await?;
    debug!(slug = %slug, path = %path.display(), "writing transfer");

    let progress = show_progress.then(|| progress_bar(expected_bytes, &name));
    let streamed = stream_to_file(file, transfer.into_body(), &path, progress.as_ref()).await;
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let checked = streamed.and_then(|written| match expected_bytes {
        Some(expected) if expected != written => {
            Err(TransferError::incomplete(&path, expected, written))
        }
        _ => Ok(written),
    });

    match checked {
        Ok(bytes_written) => {
            info!(slug = %slug, path = %path.display(), bytes = bytes_written, "transfer complete");
            Ok(SavedTransfer {
                slug,
                path,
                bytes_written,
            })
        }
        Err(error) => {
            warn!(slug = %slug, error = %error, "transfer failed; removing partial file");
            let _ = tokio::fs::remove_file(&path).await;
            Err(error)
        }
    }
}

/// Claims a path that did not exist, even if another transfer races for the same name.
async fn create_unique_file(dir: &Path, name: &str) -> Result<(PathBuf, File), TransferError> {
    let mut attempts = 0;
    loop {
        let path = resolve_unique_path(dir, name);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(error)
                if error.kind() == ErrorKind::AlreadyExists && attempts < MAX_CREATE_ATTEMPTS =>
            {
                attempts += 1;
            }
            Err(error) => return Err(TransferError::io(path, error)),
        }
    }
}

async fn stream_to_file(
    file: File,
    mut body: ByteStream,
    path: &Path,
    progress: Option<&ProgressBar>,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(path, e))?;
        bytes_written += chunk.len() as u64;
        if let Some(bar) = progress {
            bar.inc(chunk.len() as u64);
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(path, e))?;

    Ok(bytes_written)
}

fn progress_bar(total_bytes: Option<u64>, name: &str) -> ProgressBar {
    let bar = if let Some(total) = total_bytes {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:30}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} {bytes}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    };
    bar.set_message(name.to_string());
    bar
}
