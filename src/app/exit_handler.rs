//! Exit code logic for the sharegate process.
//!
//! Single responsibility: map the controller's final state to the process exit outcome.

use sharegate_core::{ControllerState, DownloadFailure};

use crate::ProcessExit;

/// Determines the process exit outcome from the state the controller settled in.
pub(crate) fn determine_exit_outcome(state: &ControllerState) -> ProcessExit {
    match state {
        ControllerState::Ready { .. } => ProcessExit::Success,
        ControllerState::NotFound
        | ControllerState::DownloadError {
            reason: DownloadFailure::Gone,
            ..
        } => ProcessExit::Unavailable,
        ControllerState::PasswordPending { .. }
        | ControllerState::DownloadError {
            reason: DownloadFailure::WrongPassword,
            ..
        } => ProcessExit::PasswordRejected,
        ControllerState::Loading
        | ControllerState::LoadError { .. }
        | ControllerState::DownloadError {
            reason: DownloadFailure::ServerError { .. },
            ..
        } => ProcessExit::Failure,
    }
}
