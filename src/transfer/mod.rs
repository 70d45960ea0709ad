//! Started downloads and the sinks that take ownership of them.
//!
//! Once the server accepts a download, the share controller does not touch
//! the bytes. It wraps the response in a [`Transfer`] and hands it to the
//! host's [`TransferSink`]: a browser would start its native download, a CLI
//! writes to disk with [`FileSink`].
//!
//! # Features
//!
//! - Streaming writes (memory-efficient for large files)
//! - Server-supplied file names are sanitized before touching the filesystem
//! - Existing files are never overwritten (numeric suffix)
//! - Partial files are removed when a transfer fails
//! - Optional progress bar

mod error;
mod file_sink;
pub(crate) mod filename;
mod handoff;

pub use error::TransferError;
pub use file_sink::{FileSink, SavedTransfer};
pub use handoff::{ByteStream, Transfer, TransferSink};
