//! ICS2 (client) context. The channel layer reads client and consensus states through
//! `ChannelReader`; the only write it routes is a client update.

use ibc_proto::google::protobuf::Any;

use crate::core::ics02_client::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::Height;

/// A context able to advance the light clients it hosts.
pub trait ClientKeeper {
    /// Verifies `header` against the client `client_id`, stores the resulting client and
    /// consensus states, and returns the new latest height of the client.
    fn update_client(&mut self, client_id: &ClientId, header: Any) -> Result<Height, Error>;
}
