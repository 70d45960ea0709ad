//! User-Agent string sent with every share API request.

/// Default User-Agent for share lookups and downloads (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("sharegate/{version} (share-client)")
}
