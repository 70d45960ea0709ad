//! Observable controller state, outcomes and events.

use std::fmt;

use super::metadata::ShareMetadata;
use super::slug::ShareSlug;

/// Password typed by the user for the current share.
///
/// Held in memory only and redacted from `Debug` output so it never reaches
/// logs through a `?state` field.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCandidate(String);

impl PasswordCandidate {
    /// Wraps user input. Returns `None` for an empty string.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.is_empty()).then_some(Self(text))
    }

    /// The password as typed.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordCandidate(***)")
    }
}

/// Why a download attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
    /// The server rejected the password. User-correctable.
    WrongPassword,
    /// The share expired or ran out of downloads since it was looked up.
    Gone,
    /// Transport failure or an unexpected server answer. Retryable.
    ServerError {
        /// Human-readable cause.
        cause: String,
    },
}

/// Current state of a [`ShareAccessController`](super::ShareAccessController).
///
/// Exactly one is active at a time; a fresh `Loading` starts every time the
/// identifier changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Lookup in flight for the current identifier.
    Loading,
    /// The server confirmed there is no such share.
    NotFound,
    /// The lookup failed; retry with `reload`.
    LoadError {
        /// Human-readable cause.
        cause: String,
    },
    /// Metadata available; a download may be attempted.
    Ready {
        /// Metadata from the lookup.
        metadata: ShareMetadata,
    },
    /// A password-required share waiting for the user's input.
    PasswordPending {
        /// Metadata from the lookup.
        metadata: ShareMetadata,
        /// Input so far, if any.
        candidate: Option<PasswordCandidate>,
    },
    /// The last download attempt failed; metadata stays visible.
    DownloadError {
        /// Metadata from the lookup.
        metadata: ShareMetadata,
        /// Why the attempt failed.
        reason: DownloadFailure,
    },
}

impl ControllerState {
    /// Short stable label for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::NotFound => "not_found",
            Self::LoadError { .. } => "load_error",
            Self::Ready { .. } => "ready",
            Self::PasswordPending { .. } => "password_pending",
            Self::DownloadError { .. } => "download_error",
        }
    }

    /// Metadata, in the states where a download may be attempted.
    #[must_use]
    pub fn metadata(&self) -> Option<&ShareMetadata> {
        match self {
            Self::Ready { metadata }
            | Self::PasswordPending { metadata, .. }
            | Self::DownloadError { metadata, .. } => Some(metadata),
            Self::Loading | Self::NotFound | Self::LoadError { .. } => None,
        }
    }

    /// Whether the share cannot be downloaded any more (not found or gone).
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::DownloadError {
                    reason: DownloadFailure::Gone,
                    ..
                }
        )
    }
}

/// What a call to `attempt_download` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No metadata was loaded; nothing happened.
    Ignored,
    /// A password is needed first; no request was sent.
    PasswordRequired,
    /// The transfer was handed to the sink.
    Started,
    /// The server refused or the request failed.
    Failed(DownloadFailure),
    /// The identifier changed while the request was in flight; state untouched.
    Superseded,
}

/// One-off notifications for UI feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A download was accepted and handed off.
    DownloadStarted {
        /// Share being downloaded.
        slug: ShareSlug,
        /// Name the file is being saved under.
        file_name: String,
    },
}
