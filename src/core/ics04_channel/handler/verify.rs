use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::AcknowledgementCommitment;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::proofs::Proofs;
use crate::Height;

/// The client backing `connection_end` together with its consensus state at `height`.
/// The client must not be frozen.
fn verifying_client(
    ctx: &dyn ChannelReader,
    connection_end: &ConnectionEnd,
    height: Height,
) -> Result<(Box<dyn ClientState>, Box<dyn ConsensusState>), Error> {
    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id)?;

    if client_state.is_frozen() {
        return Err(Error::frozen_client(client_id.clone()));
    }

    let consensus_state = ctx.client_consensus_state(client_id, height)?;

    Ok((client_state, consensus_state))
}

/// Verifies that the counterparty chain stores `expected_chan` at
/// `(counterparty_port, counterparty_channel)`.
pub fn verify_channel_proofs(
    ctx: &dyn ChannelReader,
    height: Height,
    connection_end: &ConnectionEnd,
    counterparty_port: &PortId,
    counterparty_channel: &ChannelId,
    expected_chan: &ChannelEnd,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let (client_state, consensus_state) = verifying_client(ctx, connection_end, height)?;

    client_state
        .verify_channel_state(
            height,
            connection_end.counterparty().prefix(),
            proof,
            consensus_state.root(),
            counterparty_port,
            counterparty_channel,
            expected_chan,
        )
        .map_err(Error::verify_channel_failed)
}

/// Entry point for verifying all proofs bundled in a ICS4 packet recv. message.
pub fn verify_packet_recv_proofs(
    ctx: &dyn ChannelReader,
    height: Height,
    packet: &Packet,
    connection_end: &ConnectionEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, consensus_state) = verifying_client(ctx, connection_end, height)?;

    let commitment = ctx.packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );

    client_state
        .verify_packet_data(
            height,
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            consensus_state.root(),
            &packet.source_port,
            &packet.source_channel,
            packet.sequence,
            commitment,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying all proofs bundled in an ICS4 packet ack message.
pub fn verify_packet_acknowledgement_proofs(
    ctx: &dyn ChannelReader,
    height: Height,
    packet: &Packet,
    ack_commitment: AcknowledgementCommitment,
    connection_end: &ConnectionEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, consensus_state) = verifying_client(ctx, connection_end, height)?;

    client_state
        .verify_packet_acknowledgement(
            height,
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            consensus_state.root(),
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
            ack_commitment,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying all timeout proofs on ordered channels.
pub fn verify_next_sequence_recv(
    ctx: &dyn ChannelReader,
    height: Height,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    seq: Sequence,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, consensus_state) = verifying_client(ctx, connection_end, height)?;

    client_state
        .verify_next_sequence_recv(
            height,
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            consensus_state.root(),
            &packet.destination_port,
            &packet.destination_channel,
            seq,
        )
        .map_err(|e| Error::packet_verification_failed(seq, e))
}

/// Entry point for verifying all timeout proofs on unordered channels.
pub fn verify_packet_receipt_absence(
    ctx: &dyn ChannelReader,
    height: Height,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, consensus_state) = verifying_client(ctx, connection_end, height)?;

    client_state
        .verify_packet_receipt_absence(
            height,
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            consensus_state.root(),
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}
