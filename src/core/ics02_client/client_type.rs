use core::fmt::{Display, Error as FmtError, Formatter};

use serde_derive::{Deserialize, Serialize};

/// Type of the client, depending on the specific consensus algorithm.
///
/// Client types are registered by the host; the channel layer only uses them to
/// label client identifiers and to report which light client rejected a proof.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientType(String);

impl ClientType {
    pub const TENDERMINT: &'static str = "07-tendermint";

    pub const MOCK: &'static str = "9999-mock";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn tendermint() -> Self {
        Self::new(Self::TENDERMINT)
    }

    pub fn mock() -> Self {
        Self::new(Self::MOCK)
    }

    /// Yields this client type as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "ClientType({})", self.as_str())
    }
}
