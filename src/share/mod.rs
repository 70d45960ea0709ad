//! Share lookup and download gating.
//!
//! A share is addressed by an opaque slug. The [`ShareAccessController`]
//! owns one lookup/download attempt for the current slug and publishes its
//! progress as a [`ControllerState`]; the server behind a [`ShareApi`] is the
//! only source of truth for whether the share exists, whether a password is
//! correct, and whether downloads are still allowed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sharegate_core::share::{ControllerState, HttpShareApi, ShareAccessController, ShareSlug};
//! use sharegate_core::transfer::FileSink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpShareApi::new("http://localhost:8080")?;
//! let sink = Arc::new(FileSink::new("./downloads"));
//! let controller = ShareAccessController::new(Arc::new(api), sink.clone());
//!
//! controller.load(ShareSlug::parse("abc123")?).await;
//! if let ControllerState::Ready { metadata } = controller.state() {
//!     println!("{} ({} bytes)", metadata.file_name, metadata.file_size);
//!     controller.attempt_download().await;
//!     sink.wait().await;
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod constants;
mod controller;
mod descriptor;
mod error;
mod metadata;
mod slug;
mod state;

pub use api::{DownloadResponse, MetadataLookup, ShareApi};
pub use client::HttpShareApi;
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_SERVER_URL, READ_TIMEOUT_SECS};
pub use controller::ShareAccessController;
pub use descriptor::{StateCategory, StateDescriptor, describe_state, metadata_lines};
pub use error::ApiError;
pub use metadata::ShareMetadata;
pub use slug::{ShareSlug, SlugError};
pub use state::{
    AttemptOutcome, ControllerEvent, ControllerState, DownloadFailure, PasswordCandidate,
};
