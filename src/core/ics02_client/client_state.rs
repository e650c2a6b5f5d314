use core::fmt::Debug;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics23_commitment::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::Height;

/// The light client of a counterparty chain, as seen by the channel layer.
///
/// Every verification method checks a proof that the counterparty store, at `height`, holds (or
/// does not hold) a specific value under a specific channel-layer path. The host supplies one
/// implementation per light-client family; the channel layer never learns which one it talks to.
#[allow(clippy::too_many_arguments)]
pub trait ClientState: Debug + Send + Sync {
    /// Type of client associated with this state (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// Latest height the client was updated to
    fn latest_height(&self) -> Height;

    /// Height at which the client was frozen, if it ever was.
    fn frozen_height(&self) -> Option<Height>;

    /// Whether or not the client is frozen; a frozen client verifies nothing.
    fn is_frozen(&self) -> bool {
        self.frozen_height().is_some()
    }

    /// Verify a `proof` that a channel end with the given fields is stored on the counterparty
    /// under `channelEnds/ports/<port_id>/channels/<channel_id>`.
    fn verify_channel_state(
        &self,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        expected_channel_end: &ChannelEnd,
    ) -> Result<(), Error>;

    /// Verify a `proof` that a packet commitment has been stored on the counterparty.
    fn verify_packet_data(
        &self,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error>;

    /// Verify a `proof` that a packet acknowledgement has been stored on the counterparty.
    fn verify_packet_acknowledgement(
        &self,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        ack: AcknowledgementCommitment,
    ) -> Result<(), Error>;

    /// Verify a `proof` of the counterparty's next receive sequence on an ordered channel.
    fn verify_next_sequence_recv(
        &self,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error>;

    /// Verify a `proof` that no receipt is stored on the counterparty for the given sequence.
    fn verify_packet_receipt_absence(
        &self,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error>;
}
