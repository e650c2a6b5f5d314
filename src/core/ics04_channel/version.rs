//! Data type definition and utilities for the
//! version field of a channel end.

use core::fmt;

use serde_derive::{Deserialize, Serialize};

/// The version field for a `ChannelEnd`.
///
/// This field is opaque to the core IBC protocol: it is negotiated between the two application
/// modules during the handshake, and may be empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Version(String);

impl Version {
    pub fn new(v: String) -> Self {
        Self(v)
    }

    /// Version of the fungible token transfer application.
    pub fn ics20() -> Self {
        Self("ics20-1".to_string())
    }

    pub fn empty() -> Self {
        Self("".to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Version> for String {
    fn from(domain_version: Version) -> Self {
        domain_version.0
    }
}

impl From<String> for Version {
    fn from(raw_version: String) -> Self {
        // Version validation: nothing specific.
        Self(raw_version)
    }
}

impl From<&str> for Version {
    fn from(raw_version: &str) -> Self {
        Self(raw_version.into())
    }
}

/// The default version is empty (unspecified).
impl Default for Version {
    fn default() -> Self {
        Version::empty()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
