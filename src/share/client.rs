//! HTTP implementation of [`ShareApi`].
//!
//! Transport contract:
//! - `GET {base}/api/share/{slug}` returns the share metadata as JSON,
//!   or 404 when the share does not exist.
//! - `GET {base}/api/download/{slug}[?password=...]` returns the file body
//!   itself. The password travels as a query parameter on this one call;
//!   there is no separate password-check request.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::transfer::filename::parse_content_disposition;
use crate::transfer::{Transfer, TransferError};
use crate::user_agent;

use super::api::{DownloadResponse, MetadataLookup, ShareApi};
use super::constants::{
    CONNECT_TIMEOUT_SECS, DOWNLOAD_PATH, PASSWORD_PARAM, READ_TIMEOUT_SECS, SHARE_PATH,
};
use super::error::ApiError;
use super::metadata::ShareMetadata;
use super::slug::ShareSlug;

/// Share API client over HTTP.
///
/// Created once per server and reused; the inner client pools connections.
#[derive(Debug, Clone)]
pub struct HttpShareApi {
    client: Client,
    base_url: String,
}

impl HttpShareApi {
    /// Creates a client for the server at `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute
    /// `http`/`https` URL, or [`ApiError::ClientBuild`] if the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit connect and read timeouts (seconds).
    ///
    /// The read timeout applies between body reads, so long transfers are
    /// not cut off as long as data keeps arriving.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_timeouts(
        base_url: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|_| ApiError::invalid_url(base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ApiError::invalid_url(base_url));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(ApiError::client_build)?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Metadata endpoint for `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined URL does not parse.
    pub fn metadata_url(&self, slug: &ShareSlug) -> Result<Url, ApiError> {
        self.endpoint(SHARE_PATH, slug)
    }

    /// Download endpoint for `slug`, with the password query parameter when given.
    ///
    /// An empty password is treated as no password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined URL does not parse.
    pub fn download_url(&self, slug: &ShareSlug, password: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.endpoint(DOWNLOAD_PATH, slug)?;
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().append_pair(PASSWORD_PARAM, password);
        }
        Ok(url)
    }

    fn endpoint(&self, prefix: &str, slug: &ShareSlug) -> Result<Url, ApiError> {
        let raw = format!("{}/{prefix}/{}", self.base_url, slug.encoded());
        Url::parse(&raw).map_err(|_| ApiError::invalid_url(raw))
    }

    async fn send(&self, url: Url, display_url: &str) -> Result<Response, ApiError> {
        self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout(display_url)
            } else {
                ApiError::network(display_url, e.without_url())
            }
        })
    }
}

#[async_trait]
impl ShareApi for HttpShareApi {
    #[instrument(skip(self), fields(slug = %slug))]
    async fn fetch_metadata(&self, slug: &ShareSlug) -> Result<MetadataLookup, ApiError> {
        let url = self.metadata_url(slug)?;
        let display_url = url.to_string();
        let response = self.send(url, &display_url).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "metadata response");

        if status == StatusCode::NOT_FOUND {
            return Ok(MetadataLookup::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::http_status(display_url, status.as_u16()));
        }

        let metadata = response
            .json::<ShareMetadata>()
            .await
            .map_err(|e| ApiError::decode(display_url.as_str(), e.without_url()))?;
        Ok(MetadataLookup::Found(metadata))
    }

    #[instrument(skip(self, password), fields(slug = %slug, with_password = password.is_some()))]
    async fn initiate_download(
        &self,
        slug: &ShareSlug,
        password: Option<&str>,
    ) -> Result<DownloadResponse, ApiError> {
        let url = self.download_url(slug, password)?;
        let mut display = url.clone();
        display.set_query(None);
        let display_url = display.to_string();

        let response = self.send(url, &display_url).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "download response");

        match status {
            s if s.is_success() => Ok(DownloadResponse::Started(into_transfer(
                slug.clone(),
                response,
                display_url,
            ))),
            StatusCode::UNAUTHORIZED => Ok(DownloadResponse::WrongPassword),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND | StatusCode::GONE => {
                Ok(DownloadResponse::Gone)
            }
            other => {
                warn!(status = other.as_u16(), "unexpected download status");
                Err(ApiError::http_status(display_url, other.as_u16()))
            }
        }
    }
}

fn into_transfer(slug: ShareSlug, response: Response, display_url: String) -> Transfer {
    let file_name = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_disposition);
    let content_length = response.content_length();
    let body = response
        .bytes_stream()
        .map(move |chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransferError::network(display_url.as_str(), e.without_url()))
        })
        .boxed();
    Transfer::new(slug, file_name, content_length, body)
}
