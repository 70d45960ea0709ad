//! The hand-off boundary between the controller and the host.

use std::fmt;

use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};

use crate::share::ShareSlug;

use super::error::TransferError;

/// Body of a started transfer, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransferError>>;

/// A download the server has accepted.
///
/// Owns the response body. Whoever holds it decides where the bytes go.
pub struct Transfer {
    slug: ShareSlug,
    file_name: Option<String>,
    content_length: Option<u64>,
    body: ByteStream,
}

impl Transfer {
    /// Wraps a started download.
    #[must_use]
    pub fn new(
        slug: ShareSlug,
        file_name: Option<String>,
        content_length: Option<u64>,
        body: ByteStream,
    ) -> Self {
        Self {
            slug,
            file_name,
            content_length,
            body,
        }
    }

    /// Builds a transfer from an in-memory body.
    #[must_use]
    pub fn from_bytes(slug: ShareSlug, file_name: Option<String>, bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u64;
        Self::new(
            slug,
            file_name,
            Some(length),
            stream::iter([Ok(bytes)]).boxed(),
        )
    }

    /// Fills in `name` when the server did not supply a file name.
    #[must_use]
    pub fn or_file_name(mut self, name: &str) -> Self {
        if self.file_name.as_deref().is_none_or(str::is_empty) {
            self.file_name = Some(name.to_string());
        }
        self
    }

    /// Slug the transfer was started for.
    #[must_use]
    pub fn slug(&self) -> &ShareSlug {
        &self.slug
    }

    /// File name announced by the server (or filled in from metadata).
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Announced body length, when known.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Takes the body stream.
    #[must_use]
    pub fn into_body(self) -> ByteStream {
        self.body
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("slug", &self.slug)
            .field("file_name", &self.file_name)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// The host's download mechanism.
///
/// `hand_off` returns immediately; the sink owns the transfer from then on
/// and the controller never learns how it ends.
pub trait TransferSink: Send + Sync {
    /// Takes ownership of a started transfer.
    fn hand_off(&self, transfer: Transfer);
}
