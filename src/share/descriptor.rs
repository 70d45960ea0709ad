//! User-facing descriptors for controller states.

use super::metadata::ShareMetadata;
use super::state::{ControllerState, DownloadFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StateCategory {
    Pending,
    Details,
    Unavailable,
    Retryable,
    InputCorrection,
}

impl StateCategory {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pending => "⏳",
            Self::Details => "📄",
            Self::Unavailable => "❌",
            Self::Retryable => "🌐",
            Self::InputCorrection => "🔐",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Loading",
            Self::Details => "Share",
            Self::Unavailable => "Not available",
            Self::Retryable => "Temporary failure",
            Self::InputCorrection => "Password",
        }
    }

    /// Whether repeating the same action may succeed without user input.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDescriptor {
    pub category: StateCategory,
    pub what: String,
    pub fix: Option<&'static str>,
}

/// Maps a state to the message a host should show for it.
///
/// Not-found and gone shares render the same way: from the user's side both
/// mean the link no longer leads anywhere.
#[must_use]
pub fn describe_state(state: &ControllerState) -> StateDescriptor {
    match state {
        ControllerState::Loading => StateDescriptor {
            category: StateCategory::Pending,
            what: "Looking up share".to_string(),
            fix: None,
        },
        ControllerState::NotFound => unavailable(),
        ControllerState::LoadError { cause } => StateDescriptor {
            category: StateCategory::Retryable,
            what: format!("Could not load share: {cause}"),
            fix: Some("Check the server address and connectivity."),
        },
        ControllerState::Ready { metadata } => StateDescriptor {
            category: StateCategory::Details,
            what: format!("{} ({})", metadata.file_name, metadata.display_size()),
            fix: None,
        },
        ControllerState::PasswordPending { metadata, .. } => StateDescriptor {
            category: StateCategory::InputCorrection,
            what: format!("{} is password protected", metadata.file_name),
            fix: Some("Enter the share password to download."),
        },
        ControllerState::DownloadError { reason, .. } => match reason {
            DownloadFailure::WrongPassword => StateDescriptor {
                category: StateCategory::InputCorrection,
                what: "Incorrect password".to_string(),
                fix: Some("Check the password with whoever shared the link and try again."),
            },
            DownloadFailure::Gone => unavailable(),
            DownloadFailure::ServerError { cause } => StateDescriptor {
                category: StateCategory::Retryable,
                what: format!("Download failed: {cause}"),
                fix: Some("The share itself is still available."),
            },
        },
    }
}

fn unavailable() -> StateDescriptor {
    StateDescriptor {
        category: StateCategory::Unavailable,
        what: "This share does not exist or is no longer available".to_string(),
        fix: Some("Ask the sender for a new link."),
    }
}

/// Detail lines for a share, in display order.
#[must_use]
pub fn metadata_lines(metadata: &ShareMetadata) -> Vec<String> {
    let mut lines = vec![
        format!("File:      {}", metadata.file_name),
        format!("Size:      {}", metadata.display_size()),
    ];

    let downloads = match (metadata.download_count, metadata.max_downloads) {
        (Some(count), Some(max)) => {
            let left = metadata.remaining_downloads().unwrap_or_default();
            format!("{count} of {max} ({left} left)")
        }
        (Some(count), None) => format!("{count} (unlimited)"),
        (None, Some(max)) => format!("limit {max}"),
        (None, None) => "unlimited".to_string(),
    };
    lines.push(format!("Downloads: {downloads}"));

    lines.push(format!(
        "Expires:   {}",
        metadata.expires_at.as_deref().unwrap_or("never")
    ));
    if let Some(created_at) = &metadata.created_at {
        lines.push(format!("Created:   {created_at}"));
    }
    if metadata.password_required {
        lines.push("Password:  required".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(password_required: bool) -> ShareMetadata {
        ShareMetadata {
            slug: Some("abc123".into()),
            file_name: "report.pdf".into(),
            file_size: 2048,
            download_count: Some(3),
            max_downloads: Some(10),
            expires_at: None,
            password_required,
            created_at: None,
        }
    }

    #[test]
    fn test_not_found_and_gone_render_identically() {
        let not_found = describe_state(&ControllerState::NotFound);
        let gone = describe_state(&ControllerState::DownloadError {
            metadata: metadata(false),
            reason: DownloadFailure::Gone,
        });
        assert_eq!(not_found, gone);
        assert_eq!(not_found.category, StateCategory::Unavailable);
    }

    #[test]
    fn test_load_and_server_errors_are_retryable() {
        let load = describe_state(&ControllerState::LoadError {
            cause: "timeout".into(),
        });
        let server = describe_state(&ControllerState::DownloadError {
            metadata: metadata(false),
            reason: DownloadFailure::ServerError {
                cause: "HTTP 500".into(),
            },
        });
        assert!(load.category.is_retryable());
        assert!(server.category.is_retryable());
        assert!(load.what.contains("timeout"), "what: {}", load.what);
    }

    #[test]
    fn test_wrong_password_is_input_correction() {
        let d = describe_state(&ControllerState::DownloadError {
            metadata: metadata(true),
            reason: DownloadFailure::WrongPassword,
        });
        assert_eq!(d.category, StateCategory::InputCorrection);
        assert!(!d.category.is_retryable());
        assert!(d.what.contains("Incorrect password"));
    }

    #[test]
    fn test_ready_shows_file_details() {
        let d = describe_state(&ControllerState::Ready {
            metadata: metadata(false),
        });
        assert_eq!(d.category, StateCategory::Details);
        assert_eq!(d.what, "report.pdf (2.0 KiB)");
        assert!(d.fix.is_none());
    }

    #[test]
    fn test_metadata_lines_formats_limits_and_password() {
        let lines = metadata_lines(&metadata(true));
        assert!(lines.iter().any(|l| l.contains("3 of 10 (7 left)")), "{lines:?}");
        assert!(lines.iter().any(|l| l.contains("never")));
        assert!(lines.iter().any(|l| l.contains("Password:  required")));

        let mut unlimited = metadata(false);
        unlimited.download_count = None;
        unlimited.max_downloads = None;
        let lines = metadata_lines(&unlimited);
        assert!(lines.iter().any(|l| l.ends_with("unlimited")));
        assert!(!lines.iter().any(|l| l.starts_with("Password")));
    }

    #[test]
    fn test_category_icons_and_labels_are_non_empty() {
        for category in [
            StateCategory::Pending,
            StateCategory::Details,
            StateCategory::Unavailable,
            StateCategory::Retryable,
            StateCategory::InputCorrection,
        ] {
            assert!(!category.icon().is_empty());
            assert!(!category.label().is_empty());
        }
    }
}
