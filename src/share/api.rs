//! Collaborator interface for the two server operations.

use async_trait::async_trait;

use crate::transfer::Transfer;

use super::error::ApiError;
use super::metadata::ShareMetadata;
use super::slug::ShareSlug;

/// Result of a metadata fetch that the server answered meaningfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLookup {
    /// The share exists.
    Found(ShareMetadata),
    /// The server confirmed there is no such share. Not an error.
    NotFound,
}

/// Result of a download initiation that the server answered meaningfully.
#[derive(Debug)]
pub enum DownloadResponse {
    /// The transfer has begun; the body belongs to whoever takes the transfer.
    Started(Transfer),
    /// The password was missing or incorrect.
    WrongPassword,
    /// The share expired, ran out of downloads, or was removed since lookup.
    Gone,
}

/// The remote share service.
///
/// Implementations translate wire responses into [`MetadataLookup`] and
/// [`DownloadResponse`]; anything they cannot translate is an [`ApiError`].
/// [`HttpShareApi`](super::HttpShareApi) is the HTTP implementation; tests
/// substitute scripted fakes.
#[async_trait]
pub trait ShareApi: Send + Sync {
    /// Fetches public metadata for `slug` without granting download access.
    async fn fetch_metadata(&self, slug: &ShareSlug) -> Result<MetadataLookup, ApiError>;

    /// Initiates a download of `slug`, passing `password` when one is given.
    async fn initiate_download(
        &self,
        slug: &ShareSlug,
        password: Option<&str>,
    ) -> Result<DownloadResponse, ApiError>;
}
