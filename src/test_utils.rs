use core::time::Duration;

use crate::core::ics03_connection::connection::{
    ConnectionEnd, Counterparty as ConnectionCounterparty, State as ConnectionState,
};
use crate::core::ics03_connection::version::{
    get_compatible_versions, Version as ConnectionVersion,
};
use crate::core::ics04_channel::channel::{Counterparty, Order};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics04_channel::Version;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::Path;
use crate::core::ics26_routing::context::{Module, ModuleOutputBuilder, OnRecvPacketAck};
use crate::proofs::{ProofError, Proofs};
use crate::signer::Signer;
use crate::store::StoreProof;
use crate::Height;

pub fn get_dummy_proof() -> Vec<u8> {
    "Y29uc2Vuc3VzU3RhdGUvaWJjb25lY2xpZW50LzIy"
        .as_bytes()
        .to_vec()
}

pub fn get_dummy_bech32_account() -> String {
    "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng".to_string()
}

/// A connection end on the default client, whose counterparty is `connection-1`.
pub fn get_dummy_connection_end(state: ConnectionState) -> ConnectionEnd {
    get_dummy_connection_end_with_versions(state, get_compatible_versions())
}

pub fn get_dummy_connection_end_with_versions(
    state: ConnectionState,
    versions: Vec<ConnectionVersion>,
) -> ConnectionEnd {
    ConnectionEnd::new(
        state,
        ClientId::default(),
        ConnectionCounterparty::new(
            ClientId::default(),
            Some(ConnectionId::new(1)),
            CommitmentPrefix::default(),
        ),
        versions,
        Duration::ZERO,
    )
}

/// A proof, in the format the mock client accepts, that `value` is stored under `path`.
pub fn get_store_proof(path: impl Into<Path>, value: Vec<u8>) -> Vec<u8> {
    StoreProof {
        key: path.into().to_string(),
        value,
        exists: true,
    }
    .encode_vec()
}

/// A proof, in the format the mock client accepts, that nothing is stored under `path`.
pub fn get_absence_proof(path: impl Into<Path>) -> Vec<u8> {
    StoreProof {
        key: path.into().to_string(),
        value: vec![],
        exists: false,
    }
    .encode_vec()
}

pub fn build_proofs(
    object_proof: Vec<u8>,
    other_proof: Option<Vec<u8>>,
    height: Height,
) -> Result<Proofs, ProofError> {
    let object_proof =
        CommitmentProofBytes::try_from(object_proof).map_err(|_| ProofError::empty_proof())?;
    let other_proof = other_proof
        .map(CommitmentProofBytes::try_from)
        .transpose()
        .map_err(|_| ProofError::empty_proof())?;
    Ok(Proofs::new(object_proof, other_proof, height))
}

/// An application that accepts every handshake, adopting the counterparty's version on try.
///
/// Received packets are acknowledged synchronously when the module was built with
/// [`DummyTransferModule::with_ack`], and left for a later `write_acknowledgement` otherwise.
#[derive(Clone, Debug, Default)]
pub struct DummyTransferModule {
    ack: Option<Acknowledgement>,
}

impl DummyTransferModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ack(ack: Acknowledgement) -> Self {
        Self { ack: Some(ack) }
    }
}

impl Module for DummyTransferModule {
    fn on_chan_open_try(
        &self,
        _output: &mut ModuleOutputBuilder,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        _version: &Version,
        counterparty_version: &Version,
    ) -> Result<Version, Error> {
        Ok(counterparty_version.clone())
    }

    fn on_recv_packet(
        &self,
        output: &mut ModuleOutputBuilder,
        packet: &Packet,
        _relayer: &Signer,
    ) -> OnRecvPacketAck {
        output.log(format!("received packet {}", packet.sequence));
        match &self.ack {
            Some(ack) => OnRecvPacketAck::Successful(ack.clone()),
            None => OnRecvPacketAck::Nil,
        }
    }
}
