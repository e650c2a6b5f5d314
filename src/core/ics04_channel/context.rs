//! ICS4 (channel) context. The two traits `ChannelReader` and `ChannelKeeper` define
//! the interface that any host chain must implement to be able to process any `ChannelMsg`.

use tracing::{debug, info};

use super::handler::{ChannelIdState, ChannelResult};
use super::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics04_channel::channel::{ChannelEnd, State};
use crate::core::ics04_channel::commitment::{
    packet_commitment_bytes, AcknowledgementCommitment, PacketCommitment,
};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics05_port::capabilities::{CapabilityName, ChannelCapability, PortCapability};
use crate::core::ics05_port::context::{CapabilityKeeper, CapabilityReader};
use crate::core::ics05_port::error::ErrorDetail as PortErrorDetail;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics26_routing::context::ModuleId;
use crate::timestamp::Timestamp;
use crate::Height;

/// A context supplying all the necessary read-only dependencies for processing any `ChannelMsg`.
pub trait ChannelReader: CapabilityReader {
    /// Returns the ChannelEnd for the given `port_id` and `channel_id`.
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd, Error>;

    /// Returns the ConnectionState for the given identifier `connection_id`.
    fn connection_end(&self, connection_id: &ConnectionId) -> Result<ConnectionEnd, Error>;

    /// The channels whose single connection hop is `cid`.
    fn connection_channels(&self, cid: &ConnectionId) -> Result<Vec<(PortId, ChannelId)>, Error>;

    /// Returns the ClientState for the given identifier `client_id`. Necessary dependency towards
    /// proof verification.
    fn client_state(&self, client_id: &ClientId) -> Result<Box<dyn ClientState>, Error>;

    fn client_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Box<dyn ConsensusState>, Error>;

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_recv(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<PacketCommitment>;

    fn get_packet_receipt(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Receipt>;

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<AcknowledgementCommitment>;

    /// A hashing function for packet commitments
    fn hash(&self, value: &[u8]) -> Vec<u8>;

    /// Returns the current height of the local chain.
    fn host_height(&self) -> Height;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Timestamp;

    /// Returns a counter on the number of channel ids have been created thus far.
    /// The value of this counter should increase only via method
    /// `ChannelKeeper::increase_channel_counter`.
    fn channel_counter(&self) -> Result<u64, Error>;

    /// Return the module_id along with the capability associated with a given (port_id, channel_id)
    fn lookup_module_by_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(ModuleId, ChannelCapability), Error>;

    /// Compute the commitment for a packet.
    /// Note that the absence of `timeout_height` is treated as
    /// `{revision_number: 0, revision_height: 0}` to be consistent with ibc-go,
    /// where this value is used to mean "no timeout height":
    /// <https://github.com/cosmos/ibc-go/blob/04791984b3d6c83f704c4f058e6ca0038d155d91/modules/core/04-channel/keeper/packet.go#L206-L208>
    fn packet_commitment(
        &self,
        packet_data: &[u8],
        timeout_height: &TimeoutHeight,
        timeout_timestamp: &Timestamp,
    ) -> PacketCommitment {
        self.hash(&packet_commitment_bytes(
            packet_data,
            timeout_height,
            timeout_timestamp,
        ))
        .into()
    }

    fn ack_commitment(&self, ack: &Acknowledgement) -> AcknowledgementCommitment {
        self.hash(ack.as_ref()).into()
    }

    /// The client, and its state, backing the single connection hop of a channel.
    fn channel_client_state(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(ClientId, Box<dyn ClientState>), Error> {
        let channel_end = self.channel_end(port_id, channel_id)?;
        let connection_id = channel_end
            .connection_hops()
            .first()
            .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;
        let connection_end = self.connection_end(connection_id)?;
        let client_id = connection_end.client_id().clone();
        let client_state = self.client_state(&client_id)?;
        Ok((client_id, client_state))
    }

    /// Checks that `capability` owns the channel `(port_id, channel_id)`.
    fn authenticate_channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        capability: &ChannelCapability,
    ) -> Result<(), Error> {
        let name = CapabilityName::channel(port_id, channel_id);
        self.authenticate_capability(&name, capability.as_ref())
            .map_err(|e| match e.detail() {
                PortErrorDetail::CapabilityNotFound(_) => {
                    Error::channel_capability_not_found(port_id.clone(), *channel_id)
                }
                _ => Error::invalid_channel_capability(port_id.clone(), *channel_id, e),
            })
    }

    /// Checks that `capability` owns the port `port_id`.
    fn authenticate_port_capability(
        &self,
        port_id: &PortId,
        capability: &PortCapability,
    ) -> Result<(), Error> {
        self.authenticate_capability(&CapabilityName::port(port_id), capability.as_ref())
            .map_err(|_| Error::invalid_port_capability(port_id.clone()))
    }
}

/// A context supplying all the necessary write-only dependencies (i.e., storage writing facility)
/// for processing any `ChannelMsg`.
pub trait ChannelKeeper: CapabilityKeeper {
    fn store_channel_result(&mut self, result: ChannelResult) -> Result<(), Error> {
        // The channel identifier was freshly brewed.
        // Increase counter & initialize seq. nrs.
        if matches!(result.channel_id_state, ChannelIdState::Generated) {
            self.increase_channel_counter()?;

            self.store_next_sequence_send(&result.port_id, &result.channel_id, 1.into())?;
            self.store_next_sequence_recv(&result.port_id, &result.channel_id, 1.into())?;
            self.store_next_sequence_ack(&result.port_id, &result.channel_id, 1.into())?;
        }

        info!(
            port_id = %result.port_id,
            channel_id = %result.channel_id,
            state = %result.channel_end.state(),
            "channel state updated"
        );

        self.store_channel(&result.port_id, &result.channel_id, result.channel_end)
    }

    fn store_packet_result(&mut self, general_result: PacketResult) -> Result<(), Error> {
        match general_result {
            PacketResult::Send(res) => {
                self.store_next_sequence_send(&res.port_id, &res.channel_id, res.seq_number)?;
                self.store_packet_commitment(
                    &res.port_id,
                    &res.channel_id,
                    res.seq,
                    res.commitment,
                )?;
                debug!(sequence = %res.seq, "packet commitment stored");
            }
            PacketResult::Recv(res) => match res.receipt {
                // Ordered channel
                None => {
                    self.store_next_sequence_recv(&res.port_id, &res.channel_id, res.seq_number)?
                }
                // Unordered channel
                Some(r) => self.store_packet_receipt(&res.port_id, &res.channel_id, res.seq, r)?,
            },
            PacketResult::WriteAck(res) => {
                self.store_packet_acknowledgement(
                    &res.port_id,
                    &res.channel_id,
                    res.seq,
                    res.ack_commitment,
                )?;
            }
            PacketResult::Ack(res) => {
                if let Some(s) = res.seq_number {
                    // Ordered channel
                    self.store_next_sequence_ack(&res.port_id, &res.channel_id, s)?;
                }
                self.delete_packet_commitment(&res.port_id, &res.channel_id, res.seq)?;
                debug!(sequence = %res.seq, "packet acknowledged, commitment deleted");
            }
            PacketResult::Timeout(res) => {
                if let Some(c) = res.channel {
                    // Ordered channel: a timeout closes the channel
                    if c.state_matches(&State::Closed) {
                        info!(
                            port_id = %res.port_id,
                            channel_id = %res.channel_id,
                            "ordered channel closed after packet timeout"
                        );
                    }
                    self.store_channel(&res.port_id, &res.channel_id, c)?;
                }
                self.delete_packet_commitment(&res.port_id, &res.channel_id, res.seq)?;
                debug!(sequence = %res.seq, "packet timed out, commitment deleted");
            }
        }
        Ok(())
    }

    /// Mints the capability of a freshly allocated channel. Happens exactly once per channel.
    fn new_channel_capability(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelCapability, Error> {
        self.new_capability(CapabilityName::channel(port_id, channel_id))
            .map(ChannelCapability::from)
            .map_err(Error::ics05_port)
    }

    fn store_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error>;

    fn delete_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error>;

    fn store_packet_receipt(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        receipt: Receipt,
    ) -> Result<(), Error>;

    fn store_packet_acknowledgement(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Error>;

    /// Stores the given channel_end at a path associated with the port_id and channel_id.
    fn store_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel_end: ChannelEnd,
    ) -> Result<(), Error>;

    fn store_next_sequence_send(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_recv(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_ack(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    /// Called upon channel identifier creation (Init or Try message processing).
    /// Increases the counter which keeps track of how many channels have been created.
    /// Should never fail.
    fn increase_channel_counter(&mut self) -> Result<(), Error>;
}
