//! Share identifier newtype.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing a share identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    /// The identifier was empty.
    #[error("share identifier is empty")]
    Empty,
}

/// Opaque, non-empty key addressing a share.
///
/// The value is kept exactly as given and never interpreted. It is only
/// percent-encoded when placed in a request path, so surrounding whitespace
/// is part of the identifier; hosts that read it from user input trim first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareSlug(String);

impl ShareSlug {
    /// Parses a share identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] when the input is empty.
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the identifier as given by the host.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier percent-encoded as a single URL path segment.
    #[must_use]
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl FromStr for ShareSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ShareSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
