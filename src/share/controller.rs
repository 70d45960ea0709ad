//! State machine for one share lookup/download attempt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use crate::transfer::TransferSink;

use super::api::{DownloadResponse, MetadataLookup, ShareApi};
use super::slug::ShareSlug;
use super::state::{
    AttemptOutcome, ControllerEvent, ControllerState, DownloadFailure, PasswordCandidate,
};

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 16;

/// Identifier-scoped data. Replaced wholesale on every `load`.
#[derive(Debug, Default)]
struct Session {
    /// Bumped by every `load`; responses carrying an older value are stale.
    generation: u64,
    slug: Option<ShareSlug>,
    candidate: Option<PasswordCandidate>,
}

/// Drives lookup and download for exactly one share identifier at a time.
///
/// Commands take `&self`, so a host may start a new `load` while an older one
/// is still waiting on the network; only the newest identifier's result is
/// ever applied. State changes are published on a [`watch`] channel and
/// download hand-offs on a [`broadcast`] channel.
///
/// Every collaborator failure ends up as a state. None of the commands
/// return errors.
pub struct ShareAccessController {
    api: Arc<dyn ShareApi>,
    sink: Arc<dyn TransferSink>,
    session: Mutex<Session>,
    state_tx: watch::Sender<ControllerState>,
    events_tx: broadcast::Sender<ControllerEvent>,
}

impl ShareAccessController {
    /// Creates a controller in the `Loading` state with no identifier yet.
    #[must_use]
    pub fn new(api: Arc<dyn ShareApi>, sink: Arc<dyn TransferSink>) -> Self {
        let (state_tx, _) = watch::channel(ControllerState::Loading);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            sink,
            session: Mutex::new(Session::default()),
            state_tx,
            events_tx,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state_tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state_tx.subscribe()
    }

    /// Receiver for download events emitted after subscribing.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events_tx.subscribe()
    }

    /// Identifier of the most recent `load`, if any.
    #[must_use]
    pub fn current_slug(&self) -> Option<ShareSlug> {
        self.session().slug.clone()
    }

    /// Starts a fresh lookup for `slug`.
    ///
    /// Clears the password candidate and moves to `Loading`. When the fetch
    /// resolves the state becomes `Ready`, `NotFound` or `LoadError`, unless
    /// another `load` happened meanwhile, in which case the result is dropped.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn load(&self, slug: ShareSlug) {
        let generation = {
            let mut session = self.session();
            session.generation = session.generation.wrapping_add(1);
            session.slug = Some(slug.clone());
            session.candidate = None;
            self.state_tx.send_replace(ControllerState::Loading);
            session.generation
        };
        debug!(generation, "share lookup started");

        let lookup = self.api.fetch_metadata(&slug).await;

        let session = self.session();
        if session.generation != generation {
            debug!(
                generation,
                current = session.generation,
                "discarding stale share lookup"
            );
            return;
        }

        let next = match lookup {
            Ok(MetadataLookup::Found(metadata)) => ControllerState::Ready { metadata },
            Ok(MetadataLookup::NotFound) => ControllerState::NotFound,
            Err(error) => {
                warn!(error = %error, status = ?error.status(), "share lookup failed");
                ControllerState::LoadError {
                    cause: error.to_string(),
                }
            }
        };
        debug!(state = next.name(), "share lookup resolved");
        self.state_tx.send_replace(next);
    }

    /// Repeats the lookup for the current identifier.
    pub async fn reload(&self) {
        let slug = self.session().slug.clone();
        match slug {
            Some(slug) => self.load(slug).await,
            None => debug!("reload requested before any identifier was loaded"),
        }
    }

    /// Stores the password the user typed, without checking it.
    ///
    /// Ignored unless the loaded share requires a password and the state is
    /// `Ready`, `PasswordPending` or `DownloadError`. An empty string clears
    /// the candidate.
    pub fn set_password_candidate(&self, text: impl Into<String>) {
        let mut session = self.session();
        let gated = self
            .state_tx
            .borrow()
            .metadata()
            .is_some_and(|metadata| metadata.password_required);
        if !gated {
            debug!("ignoring password candidate for share without a password gate");
            return;
        }

        let candidate = PasswordCandidate::new(text);
        session.candidate.clone_from(&candidate);
        self.state_tx.send_if_modified(|state| match state {
            ControllerState::PasswordPending {
                candidate: current, ..
            } => {
                *current = candidate;
                true
            }
            _ => false,
        });
    }

    /// Attempts the download of the loaded share.
    ///
    /// A password-required share without a candidate moves to
    /// `PasswordPending` without any request. Otherwise the download is
    /// initiated; on success the transfer goes to the sink, the state is
    /// `Ready` again and a [`ControllerEvent::DownloadStarted`] is emitted.
    /// Refusals and failures become `DownloadError`. The download count is
    /// never adjusted locally.
    ///
    /// If a `load` happened while the request was in flight the outcome is
    /// `Superseded` and the state is left alone; an accepted transfer is still
    /// handed to the sink.
    pub async fn attempt_download(&self) -> AttemptOutcome {
        let (generation, slug, metadata, password) = {
            let session = self.session();
            let metadata = self.state_tx.borrow().metadata().cloned();
            let (Some(slug), Some(metadata)) = (session.slug.clone(), metadata) else {
                debug!(
                    state = self.state_tx.borrow().name(),
                    "download attempt ignored without loaded metadata"
                );
                return AttemptOutcome::Ignored;
            };

            let password = if metadata.password_required {
                let Some(candidate) = session.candidate.clone() else {
                    debug!(slug = %slug, "password required before download");
                    self.state_tx.send_replace(ControllerState::PasswordPending {
                        metadata,
                        candidate: None,
                    });
                    return AttemptOutcome::PasswordRequired;
                };
                Some(candidate)
            } else {
                None
            };
            (session.generation, slug, metadata, password)
        };

        let response = self
            .api
            .initiate_download(&slug, password.as_ref().map(PasswordCandidate::expose))
            .await;

        let failure = match response {
            Ok(DownloadResponse::Started(transfer)) => {
                let transfer = transfer.or_file_name(&metadata.file_name);
                let file_name = transfer
                    .file_name()
                    .unwrap_or(metadata.file_name.as_str())
                    .to_string();
                // The server has already counted this download, so the bytes
                // reach the sink even when the identifier changed meanwhile.
                self.sink.hand_off(transfer);

                let session = self.session();
                if session.generation != generation {
                    debug!(slug = %slug, "identifier changed during download; state left as is");
                    return AttemptOutcome::Superseded;
                }
                self.state_tx.send_replace(ControllerState::Ready { metadata });
                drop(session);
                info!(slug = %slug, file_name = %file_name, "download started");
                let _ = self
                    .events_tx
                    .send(ControllerEvent::DownloadStarted { slug, file_name });
                return AttemptOutcome::Started;
            }
            Ok(DownloadResponse::WrongPassword) => DownloadFailure::WrongPassword,
            Ok(DownloadResponse::Gone) => DownloadFailure::Gone,
            Err(error) => {
                debug!(status = ?error.status(), "download request failed");
                DownloadFailure::ServerError {
                    cause: error.to_string(),
                }
            }
        };

        let session = self.session();
        if session.generation != generation {
            debug!(slug = %slug, "identifier changed during download request; result dropped");
            return AttemptOutcome::Superseded;
        }
        warn!(slug = %slug, reason = ?failure, "download attempt failed");
        self.state_tx.send_replace(ControllerState::DownloadError {
            metadata,
            reason: failure.clone(),
        });
        drop(session);
        AttemptOutcome::Failed(failure)
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
