//! Implementation of a global context mock. Used in testing handlers of all IBC modules.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::borrow::Borrow;

use ibc_proto::google::protobuf::Any;
use tracing::debug;

use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::context::ClientKeeper;
use crate::core::ics02_client::error::Error as ClientError;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{sha256, AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{Receipt, Sequence};
use crate::core::ics04_channel::query::QueryContext;
use crate::core::ics04_channel::store::ChannelStore;
use crate::core::ics05_port::capabilities::{
    Capability, CapabilityName, CapabilityStore, ChannelCapability, PortCapability,
};
use crate::core::ics05_port::context::{
    CapabilityKeeper, CapabilityReader, PortKeeper, PortReader,
};
use crate::core::ics05_port::error::Error as PortError;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::Path;
use crate::core::ics26_routing::context::{
    Ics26Context, Module, ModuleId, Router, RouterBuilder,
};
use crate::core::ics26_routing::error::Error as RoutingError;
use crate::core::ics26_routing::handler::{deliver, MsgReceipt};
use crate::mock::client_state::{MockClientRecord, MockClientState, MockConsensusState};
use crate::mock::header::{block_time, MockHeader};
use crate::store::{InMemoryStore, ProvableStore};
use crate::test_utils::DummyTransferModule;
use crate::timestamp::Timestamp;
use crate::Height;

/// Identifier of the module every port bound through [`MockContext::with_port`] belongs to.
pub const MOCK_MODULE_ID: &str = "mockmodule";

pub fn mock_module_id() -> ModuleId {
    ModuleId::from_static(MOCK_MODULE_ID)
}

#[derive(Default)]
pub struct MockRouterBuilder(MockRouter);

impl RouterBuilder for MockRouterBuilder {
    type Router = MockRouter;

    fn add_route(mut self, module_id: ModuleId, module: Arc<dyn Module>) -> Result<Self, String> {
        match self.0 .0.insert(module_id, module) {
            None => Ok(self),
            Some(_) => Err("Duplicate module_id".to_owned()),
        }
    }

    fn build(self) -> Self::Router {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockRouter(BTreeMap<ModuleId, Arc<dyn Module>>);

impl Router for MockRouter {
    fn get_route(&self, module_id: &impl Borrow<ModuleId>) -> Option<Arc<dyn Module>> {
        self.0.get(module_id.borrow()).cloned()
    }

    fn has_route(&self, module_id: &impl Borrow<ModuleId>) -> bool {
        self.0.contains_key(module_id.borrow())
    }
}

/// A context implementing the dependencies necessary for testing any IBC module.
///
/// The channel layer state lives in a provable [`InMemoryStore`]; clients, connections and
/// capabilities are kept in plain maps. The host advances one block per delivered message.
#[derive(Clone, Debug)]
pub struct MockContext {
    /// Height of the latest block of the host chain.
    host_height: Height,

    /// The set of all clients, indexed by their id.
    clients: BTreeMap<ClientId, MockClientRecord>,

    /// All the connections in the store.
    connections: BTreeMap<ConnectionId, ConnectionEnd>,

    /// Channel ends, sequence counters and packet state.
    channel_store: ChannelStore<InMemoryStore>,

    capabilities: CapabilityStore,

    /// Maps ports to the module that bound them.
    port_to_module: BTreeMap<PortId, ModuleId>,

    router: MockRouter,

    /// Events emitted by every message delivered so far.
    events: Vec<crate::events::IbcEvent>,
}

/// Returns a MockContext at height (0, 10) with no client, no connection and no channel, whose
/// router sends everything bound through `with_port` to a [`DummyTransferModule`].
impl Default for MockContext {
    fn default() -> Self {
        let mut channel_store = ChannelStore::new(InMemoryStore::default());
        channel_store.set_next_channel_sequence(0);

        let router = MockRouterBuilder::default()
            .add_route(mock_module_id(), Arc::new(DummyTransferModule::new()))
            .map(RouterBuilder::build)
            .unwrap_or_default();

        Self {
            host_height: Height::default().add(10),
            clients: BTreeMap::new(),
            connections: BTreeMap::new(),
            channel_store,
            capabilities: CapabilityStore::default(),
            port_to_module: BTreeMap::new(),
            router,
            events: Vec::new(),
        }
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any Ics handler.
impl MockContext {
    /// Associates a client record to this context: the client, and its consensus state, sit at
    /// `client_state_height`.
    pub fn with_client(self, client_id: &ClientId, client_state_height: Height) -> Self {
        self.with_client_record(client_id, client_state_height, None)
    }

    /// As [`Self::with_client`], with the client frozen at its latest height.
    pub fn with_frozen_client(self, client_id: &ClientId, client_state_height: Height) -> Self {
        self.with_client_record(client_id, client_state_height, Some(client_state_height))
    }

    fn with_client_record(
        mut self,
        client_id: &ClientId,
        height: Height,
        frozen_height: Option<Height>,
    ) -> Self {
        let header = MockHeader::new(height);
        let mut client_state = MockClientState::new(header);
        client_state.frozen_height = frozen_height;

        let consensus_states = [(height, MockConsensusState::new(header))]
            .into_iter()
            .collect();

        self.clients.insert(
            client_id.clone(),
            MockClientRecord {
                client_state,
                consensus_states,
            },
        );
        self
    }

    /// Associates a connection to this context.
    pub fn with_connection(
        mut self,
        connection_id: ConnectionId,
        connection_end: ConnectionEnd,
    ) -> Self {
        self.connections.insert(connection_id, connection_end);
        self
    }

    /// Binds `port_id` for the mock module. Binding an already bound port is a no-op.
    pub fn with_port(self, port_id: PortId) -> Self {
        self.with_port_for(port_id, mock_module_id())
    }

    /// Binds `port_id` for `module_id`.
    pub fn with_port_for(mut self, port_id: PortId, module_id: ModuleId) -> Self {
        if !self.is_bound(&port_id) {
            let _ = self.capabilities.new_capability(CapabilityName::port(&port_id));
        }
        self.port_to_module.insert(port_id, module_id);
        self
    }

    /// Registers `module` under `module_id`, replacing any previous registration.
    pub fn with_module(mut self, module_id: ModuleId, module: Arc<dyn Module>) -> Self {
        self.router.0.insert(module_id, module);
        self
    }

    /// Stores a channel end as if its handshake had already run on this chain: its capability is
    /// minted, its sequence counters start at 1 unless already set, and the channel allocator is
    /// moved past its identifier.
    pub fn with_channel(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        let name = CapabilityName::channel(&port_id, &chan_id);
        if self.capabilities.get_capability(&name).is_err() {
            let _ = self.capabilities.new_capability(name);
        }

        let store = &mut self.channel_store;
        if let Ok(None) = store.next_sequence_send(&port_id, &chan_id) {
            store.set_next_sequence_send(&port_id, &chan_id, 1.into());
        }
        if let Ok(None) = store.next_sequence_recv(&port_id, &chan_id) {
            store.set_next_sequence_recv(&port_id, &chan_id, 1.into());
        }
        if let Ok(None) = store.next_sequence_ack(&port_id, &chan_id) {
            store.set_next_sequence_ack(&port_id, &chan_id, 1.into());
        }

        let next = store.next_channel_sequence().unwrap_or_default();
        store.set_next_channel_sequence(next.max(chan_id.sequence().saturating_add(1)));

        store.set_channel(&port_id, &chan_id, &channel_end);
        self
    }

    pub fn with_next_channel_sequence(mut self, sequence: u64) -> Self {
        self.channel_store.set_next_channel_sequence(sequence);
        self
    }

    pub fn with_send_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq_number: Sequence,
    ) -> Self {
        self.channel_store
            .set_next_sequence_send(&port_id, &chan_id, seq_number);
        self
    }

    pub fn with_recv_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq_number: Sequence,
    ) -> Self {
        self.channel_store
            .set_next_sequence_recv(&port_id, &chan_id, seq_number);
        self
    }

    pub fn with_ack_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq_number: Sequence,
    ) -> Self {
        self.channel_store
            .set_next_sequence_ack(&port_id, &chan_id, seq_number);
        self
    }

    pub fn with_packet_commitment(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        data: PacketCommitment,
    ) -> Self {
        self.channel_store
            .set_packet_commitment(&port_id, &chan_id, seq, data);
        self
    }

    pub fn with_packet_receipt(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
    ) -> Self {
        self.channel_store
            .set_packet_receipt(&port_id, &chan_id, seq, &Receipt::Ok);
        self
    }

    pub fn with_packet_acknowledgement(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Self {
        self.channel_store
            .set_packet_acknowledgement(&port_id, &chan_id, seq, ack_commitment);
        self
    }

    /// Moves the host chain to `target_height`.
    pub fn with_height(mut self, target_height: Height) -> Self {
        self.host_height = target_height;
        self
    }

    /// Adds a block to the host chain.
    pub fn advance_host_chain_height(&mut self) {
        self.host_height = self.host_height.increment();
    }

    /// The capability the module owning `port_id` holds for it.
    pub fn port_capability(&self, port_id: &PortId) -> Result<PortCapability, PortError> {
        self.capabilities
            .get_capability(&CapabilityName::port(port_id))
            .map(PortCapability::from)
    }

    /// The capability minted for the channel `(port_id, channel_id)`.
    pub fn channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelCapability, PortError> {
        self.capabilities
            .get_capability(&CapabilityName::channel(port_id, channel_id))
            .map(ChannelCapability::from)
    }

    /// Proof, at the current height, of the value stored under `path` or of its absence.
    pub fn query_proof(&self, path: impl Into<Path>) -> Vec<u8> {
        self.channel_store
            .inner()
            .get_proof(&path.into().into_bytes())
    }

    pub fn root_hash(&self) -> Vec<u8> {
        self.channel_store.inner().root_hash()
    }

    pub fn events(&self) -> &[crate::events::IbcEvent] {
        &self.events
    }

    /// Delivers one message through the router, as the only message of a block.
    ///
    /// A failing message leaves no trace in the context.
    pub fn deliver(&mut self, message: Any) -> Result<MsgReceipt, RoutingError> {
        let snapshot = self.clone();
        match deliver(self, message) {
            Ok(receipt) => {
                self.events.extend(receipt.events.iter().cloned());
                self.advance_host_chain_height();
                Ok(receipt)
            }
            Err(e) => {
                debug!(error = %e, "message rejected, rolling back");
                *self = snapshot;
                Err(e)
            }
        }
    }

    fn client_record(&self, client_id: &ClientId) -> Result<&MockClientRecord, ClientError> {
        self.clients
            .get(client_id)
            .ok_or_else(|| ClientError::client_not_found(client_id.clone()))
    }
}

impl Ics26Context for MockContext {
    type Router = MockRouter;

    fn router(&self) -> &Self::Router {
        &self.router
    }
}

impl CapabilityReader for MockContext {
    fn get_capability(&self, name: &CapabilityName) -> Result<Capability, PortError> {
        self.capabilities.get_capability(name)
    }

    fn authenticate_capability(
        &self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), PortError> {
        self.capabilities.authenticate_capability(name, capability)
    }
}

impl CapabilityKeeper for MockContext {
    fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, PortError> {
        self.capabilities.new_capability(name)
    }

    fn claim_capability(
        &mut self,
        name: CapabilityName,
        capability: Capability,
    ) -> Result<(), PortError> {
        self.capabilities.claim_capability(name, capability)
    }

    fn release_capability(
        &mut self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), PortError> {
        self.capabilities.release_capability(name, capability)
    }
}

impl PortReader for MockContext {
    fn lookup_module_by_port(
        &self,
        port_id: &PortId,
    ) -> Result<(ModuleId, PortCapability), PortError> {
        let module_id = self
            .port_to_module
            .get(port_id)
            .cloned()
            .ok_or_else(|| PortError::unknown_port(port_id.clone()))?;
        let capability = self.port_capability(port_id)?;
        Ok((module_id, capability))
    }
}

impl PortKeeper for MockContext {}

impl ChannelReader for MockContext {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd, Error> {
        self.channel_store
            .channel(port_id, channel_id)?
            .ok_or_else(|| Error::channel_not_found(port_id.clone(), *channel_id))
    }

    fn connection_end(&self, cid: &ConnectionId) -> Result<ConnectionEnd, Error> {
        self.connections.get(cid).cloned().ok_or_else(|| {
            Error::ics03_connection(ConnectionError::connection_not_found(cid.clone()))
        })
    }

    fn connection_channels(&self, cid: &ConnectionId) -> Result<Vec<(PortId, ChannelId)>, Error> {
        Ok(self
            .channel_store
            .connection_channels(cid)?
            .into_iter()
            .map(|c| (c.port_id, c.channel_id))
            .collect())
    }

    fn client_state(&self, client_id: &ClientId) -> Result<Box<dyn ClientState>, Error> {
        let record = self.client_record(client_id).map_err(Error::ics02_client)?;
        Ok(Box::new(record.client_state))
    }

    fn client_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Box<dyn ConsensusState>, Error> {
        let record = self.client_record(client_id).map_err(Error::ics02_client)?;
        record
            .consensus_states
            .get(&height)
            .map(|cs| -> Box<dyn ConsensusState> { Box::new(cs.clone()) })
            .ok_or_else(|| {
                Error::ics02_client(ClientError::consensus_state_not_found(
                    client_id.clone(),
                    height,
                ))
            })
    }

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error> {
        self.channel_store
            .next_sequence_send(port_id, channel_id)?
            .ok_or_else(|| Error::missing_next_send_seq(port_id.clone(), *channel_id))
    }

    fn get_next_sequence_recv(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error> {
        self.channel_store
            .next_sequence_recv(port_id, channel_id)?
            .ok_or_else(|| Error::missing_next_recv_seq(port_id.clone(), *channel_id))
    }

    fn get_next_sequence_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error> {
        self.channel_store
            .next_sequence_ack(port_id, channel_id)?
            .ok_or_else(|| Error::missing_next_ack_seq(port_id.clone(), *channel_id))
    }

    fn get_packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Option<PacketCommitment> {
        self.channel_store.packet_commitment(port_id, channel_id, seq)
    }

    fn get_packet_receipt(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Option<Receipt> {
        self.channel_store.packet_receipt(port_id, channel_id, seq)
    }

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Option<AcknowledgementCommitment> {
        self.channel_store
            .packet_acknowledgement(port_id, channel_id, seq)
    }

    fn hash(&self, value: &[u8]) -> Vec<u8> {
        sha256(value)
    }

    fn host_height(&self) -> Height {
        self.host_height
    }

    fn host_timestamp(&self) -> Timestamp {
        block_time(self.host_height)
    }

    fn channel_counter(&self) -> Result<u64, Error> {
        self.channel_store.next_channel_sequence()
    }

    fn lookup_module_by_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(ModuleId, ChannelCapability), Error> {
        let module_id = self
            .port_to_module
            .get(port_id)
            .cloned()
            .ok_or_else(|| Error::ics05_port(PortError::unknown_port(port_id.clone())))?;
        let capability = self
            .channel_capability(port_id, channel_id)
            .map_err(|_| Error::channel_capability_not_found(port_id.clone(), *channel_id))?;
        Ok((module_id, capability))
    }
}

impl ChannelKeeper for MockContext {
    fn store_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error> {
        self.channel_store
            .set_packet_commitment(port_id, channel_id, seq, commitment);
        Ok(())
    }

    fn delete_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error> {
        self.channel_store
            .delete_packet_commitment(port_id, channel_id, seq);
        Ok(())
    }

    fn store_packet_receipt(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
        receipt: Receipt,
    ) -> Result<(), Error> {
        self.channel_store
            .set_packet_receipt(port_id, channel_id, seq, &receipt);
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Error> {
        self.channel_store
            .set_packet_acknowledgement(port_id, channel_id, seq, ack_commitment);
        Ok(())
    }

    fn store_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel_end: ChannelEnd,
    ) -> Result<(), Error> {
        self.channel_store
            .set_channel(port_id, channel_id, &channel_end);
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error> {
        self.channel_store
            .set_next_sequence_send(port_id, channel_id, seq);
        Ok(())
    }

    fn store_next_sequence_recv(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error> {
        self.channel_store
            .set_next_sequence_recv(port_id, channel_id, seq);
        Ok(())
    }

    fn store_next_sequence_ack(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error> {
        self.channel_store
            .set_next_sequence_ack(port_id, channel_id, seq);
        Ok(())
    }

    fn increase_channel_counter(&mut self) -> Result<(), Error> {
        self.channel_store.generate_channel_identifier().map(|_| ())
    }
}

impl ClientKeeper for MockContext {
    fn update_client(&mut self, client_id: &ClientId, header: Any) -> Result<Height, ClientError> {
        let header = MockHeader::try_from(header)?;
        let record = self
            .clients
            .get_mut(client_id)
            .ok_or_else(|| ClientError::client_not_found(client_id.clone()))?;

        if record.client_state.is_frozen() {
            return Err(ClientError::client_frozen(client_id.clone()));
        }

        let latest_height = record.client_state.latest_height();
        if header.height() <= latest_height {
            return Err(ClientError::low_header_height(
                header.height(),
                latest_height,
            ));
        }

        record.client_state = MockClientState::new(header);
        record
            .consensus_states
            .insert(header.height(), MockConsensusState::new(header));

        debug!(%client_id, height = %header.height(), "client updated");
        Ok(header.height())
    }
}

impl QueryContext for MockContext {
    type Store = InMemoryStore;

    fn channel_store(&self) -> &ChannelStore<Self::Store> {
        &self.channel_store
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::MockContext;
    use crate::core::ics02_client::client_state::ClientState;
    use crate::core::ics02_client::context::ClientKeeper;
    use crate::core::ics02_client::error::ErrorDetail as ClientErrorDetail;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::Version;
    use crate::core::ics05_port::context::PortReader;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::mock::header::MockHeader;
    use crate::Height;

    fn channel() -> ChannelEnd {
        ChannelEnd::new(
            State::Init,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), None),
            vec![ConnectionId::default()],
            Version::ics20(),
        )
    }

    #[test]
    fn with_channel_initialises_the_channel_state() {
        let ctx = MockContext::default()
            .with_port(PortId::transfer())
            .with_port(PortId::transfer())
            .with_channel(PortId::transfer(), ChannelId::new(4), channel());

        assert!(ctx.is_bound(&PortId::transfer()));
        assert_eq!(ctx.channel_counter().unwrap(), 5);
        assert_eq!(
            ctx.get_next_sequence_send(&PortId::transfer(), &ChannelId::new(4))
                .unwrap(),
            1.into()
        );
        assert!(ctx
            .channel_capability(&PortId::transfer(), &ChannelId::new(4))
            .is_ok());
        assert!(ctx
            .lookup_module_by_channel(&PortId::transfer(), &ChannelId::new(4))
            .is_ok());

        let err = ctx
            .channel_end(&PortId::transfer(), &ChannelId::new(0))
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ChannelNotFound(_)));

        let err = ctx
            .get_next_sequence_recv(&PortId::default(), &ChannelId::new(4))
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::MissingNextRecvSeq(_)));
    }

    #[test]
    fn client_updates_move_forward_only() {
        let client_id = ClientId::default();
        let mut ctx =
            MockContext::default().with_client(&client_id, Height::new(0, 5).unwrap());

        let newer = MockHeader::new(Height::new(0, 8).unwrap());
        assert_eq!(
            ctx.update_client(&client_id, newer.into()).unwrap(),
            newer.height()
        );
        assert_eq!(
            ctx.client_state(&client_id).unwrap().latest_height(),
            newer.height()
        );
        assert!(ctx.client_consensus_state(&client_id, newer.height()).is_ok());

        let stale = MockHeader::new(Height::new(0, 6).unwrap());
        let err = ctx.update_client(&client_id, stale.into()).unwrap_err();
        assert!(matches!(err.detail(), ClientErrorDetail::LowHeaderHeight(_)));

        let mut frozen = MockContext::default()
            .with_frozen_client(&client_id, Height::new(0, 5).unwrap());
        let err = frozen.update_client(&client_id, newer.into()).unwrap_err();
        assert!(matches!(err.detail(), ClientErrorDetail::ClientFrozen(_)));
    }
}
