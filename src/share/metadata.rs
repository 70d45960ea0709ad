//! Public share metadata as returned by the metadata endpoint.

use serde::{Deserialize, Serialize};

/// Descriptive facts about a share, received from the server.
///
/// The value is immutable once fetched. Required fields have no serde
/// defaults: a payload missing `file_name`, `file_size` or
/// `password_required` fails to decode instead of being filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMetadata {
    /// Slug echoed back by the server, when it includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name of the underlying file.
    pub file_name: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Downloads observed so far; absent when the server does not track it.
    #[serde(default, rename = "dl_count", alias = "download_count")]
    pub download_count: Option<u64>,
    /// Download limit; `None` means unlimited.
    #[serde(default)]
    pub max_downloads: Option<u64>,
    /// Expiry timestamp in the server's format; `None` means never expires.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Whether a password gate applies to downloads.
    pub password_required: bool,
    /// Creation timestamp of the shared file, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ShareMetadata {
    /// Downloads left before the limit, as last reported by the server.
    ///
    /// Returns `None` for unlimited shares and when the server did not report
    /// a download count. This is for display only; the server enforces limits.
    #[must_use]
    pub fn remaining_downloads(&self) -> Option<u64> {
        let max = self.max_downloads?;
        let count = self.download_count?;
        Some(max.saturating_sub(count))
    }

    /// Human-readable size (`2.0 KiB`, `512 B`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
        if self.file_size < 1024 {
            return format!("{} B", self.file_size);
        }
        let mut value = self.file_size as f64 / 1024.0;
        let mut unit = UNITS[0];
        for next in &UNITS[1..] {
            if value < 1024.0 {
                break;
            }
            value /= 1024.0;
            unit = next;
        }
        format!("{value:.1} {unit}")
    }
}
