//! Constants for the share module (server defaults, timeouts, endpoint paths).

/// Server used when neither the CLI nor the config file names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes between body reads for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Path prefix of the public metadata endpoint; the slug is the next segment.
pub(crate) const SHARE_PATH: &str = "api/share";

/// Path prefix of the download endpoint; the slug is the next segment.
pub(crate) const DOWNLOAD_PATH: &str = "api/download";

/// Query parameter carrying the share password on download requests.
pub(crate) const PASSWORD_PARAM: &str = "password";
