use alloc::borrow::{Borrow, Cow};
use alloc::sync::Arc;
use core::fmt::{self, Debug, Display, Formatter};
use core::str::FromStr;

use crate::core::ics02_client::context::ClientKeeper;
use crate::core::ics04_channel::channel::{Counterparty, Order};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement as GenericAcknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics04_channel::Version;
use crate::core::ics05_port::context::{PortKeeper, PortReader};
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::handler::HandlerOutputBuilder;
use crate::signer::Signer;

/// This trait captures all the functional dependencies (i.e., context) which the ICS26 module
/// requires to be able to dispatch and process IBC messages. In other words, this is the
/// representation of a chain from the perspective of the IBC module of that chain.
pub trait Ics26Context: ChannelReader + ChannelKeeper + PortKeeper + ClientKeeper {
    type Router: Router;

    fn router(&self) -> &Self::Router;
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidModuleId;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(s: Cow<'_, str>) -> Result<Self, InvalidModuleId> {
        if !s.trim().is_empty() && s.chars().all(char::is_alphanumeric) {
            Ok(Self(s.into_owned()))
        } else {
            Err(InvalidModuleId)
        }
    }

    /// For identifiers that are alphanumeric by construction.
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModuleId {
    type Err = InvalidModuleId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Cow::Borrowed(s))
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Events and logs emitted by application modules while handling a callback.
pub type ModuleOutputBuilder = HandlerOutputBuilder<()>;

/// What an application hands back when it receives a packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OnRecvPacketAck {
    /// No acknowledgement yet; the module writes it later through
    /// [`write_acknowledgement`](crate::core::ics26_routing::handler::write_acknowledgement).
    Nil,
    Successful(GenericAcknowledgement),
    Failed(GenericAcknowledgement),
}

impl OnRecvPacketAck {
    pub fn is_successful(&self) -> bool {
        matches!(self, OnRecvPacketAck::Successful(_))
    }

    /// The acknowledgement to write synchronously, if any.
    pub fn acknowledgement(&self) -> Option<&GenericAcknowledgement> {
        match self {
            OnRecvPacketAck::Nil => None,
            OnRecvPacketAck::Successful(ack) | OnRecvPacketAck::Failed(ack) => Some(ack),
        }
    }
}

/// The callbacks through which the channel layer notifies the application owning a port.
///
/// Handshake callbacks may veto the step by returning an error, in which case no channel state
/// is written. Modules keep their own state behind interior mutability.
#[allow(clippy::too_many_arguments)]
pub trait Module: Debug + Send + Sync {
    /// Returns the version the module agrees to run on the new channel.
    fn on_chan_open_init(
        &self,
        _output: &mut ModuleOutputBuilder,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &Version,
    ) -> Result<Version, Error> {
        Ok(version.clone())
    }

    fn on_chan_open_try(
        &self,
        output: &mut ModuleOutputBuilder,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &Version,
        counterparty_version: &Version,
    ) -> Result<Version, Error>;

    fn on_chan_open_ack(
        &self,
        _output: &mut ModuleOutputBuilder,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty_version: &Version,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn on_chan_open_confirm(
        &self,
        _output: &mut ModuleOutputBuilder,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn on_chan_close_init(
        &self,
        _output: &mut ModuleOutputBuilder,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn on_chan_close_confirm(
        &self,
        _output: &mut ModuleOutputBuilder,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn on_recv_packet(
        &self,
        _output: &mut ModuleOutputBuilder,
        _packet: &Packet,
        _relayer: &Signer,
    ) -> OnRecvPacketAck {
        OnRecvPacketAck::Nil
    }

    fn on_acknowledgement_packet(
        &self,
        _output: &mut ModuleOutputBuilder,
        _packet: &Packet,
        _acknowledgement: &GenericAcknowledgement,
        _relayer: &Signer,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn on_timeout_packet(
        &self,
        _output: &mut ModuleOutputBuilder,
        _packet: &Packet,
        _relayer: &Signer,
    ) -> Result<(), Error> {
        Ok(())
    }
}

pub trait RouterBuilder: Sized {
    /// The `Router` type that the builder must build
    type Router: Router;

    /// Registers `Module` against the specified `ModuleId` in the `Router`'s internal map
    ///
    /// Returns an error if a `Module` has already been registered against the specified `ModuleId`
    fn add_route(self, module_id: ModuleId, module: Arc<dyn Module>) -> Result<Self, String>;

    /// Consumes the `RouterBuilder` and returns a `Router` as configured
    fn build(self) -> Self::Router;
}

/// A router maintains a mapping of `ModuleId`s against `Modules`. Implementations must not publicly
/// expose APIs to add new routes once constructed. Routes may only be added at the time of build.
pub trait Router {
    /// Returns the module registered against the specified `ModuleId`
    fn get_route(&self, module_id: &impl Borrow<ModuleId>) -> Option<Arc<dyn Module>>;

    /// Returns true if the `Router` has a `Module` registered against the specified `ModuleId`
    fn has_route(&self, module_id: &impl Borrow<ModuleId>) -> bool;
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::ModuleId;

    #[test]
    fn module_ids_are_alphanumeric() {
        assert!("transfer".parse::<ModuleId>().is_ok());
        assert!("bank2".parse::<ModuleId>().is_ok());
        assert!("".parse::<ModuleId>().is_err());
        assert!("ics-20".parse::<ModuleId>().is_err());
    }
}
