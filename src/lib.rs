//! Sharegate Core Library
//!
//! Client side of a password-optional, expiring, download-limited file share:
//! look a share up by its slug, show what it holds, collect a password when
//! the share asks for one, and hand the file transfer off to the host.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`share`] - Share metadata, the server API and the access controller
//! - [`transfer`] - Started transfers and the sinks that take them over
//!
//! The server is authoritative for existence, password checks and
//! download-count/expiry enforcement. Nothing here decides those facts
//! locally; the controller only reflects what the server answered.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod share;
pub mod transfer;
mod user_agent;

// Re-export commonly used types
pub use share::{
    ApiError, AttemptOutcome, ControllerEvent, ControllerState, DEFAULT_SERVER_URL,
    DownloadFailure, DownloadResponse, HttpShareApi, MetadataLookup, PasswordCandidate,
    ShareAccessController, ShareApi, ShareMetadata, ShareSlug, SlugError, StateCategory,
    StateDescriptor, describe_state,
};
pub use transfer::{FileSink, SavedTransfer, Transfer, TransferError, TransferSink};
