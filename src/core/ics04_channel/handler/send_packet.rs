use crate::core::ics04_channel::channel::Counterparty;
use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::commitment::PacketCommitment;
use crate::core::ics04_channel::events::SendPacket;
use crate::core::ics04_channel::packet::{PacketResult, Sequence};
use crate::core::ics04_channel::{context::ChannelReader, error::Error, packet::Packet};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Expiry;

#[derive(Clone, Debug)]
pub struct SendPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub seq_number: Sequence,
    pub commitment: PacketCommitment,
}

/// Commits an outgoing packet on its source channel.
///
/// Timeouts are checked against the latest height and timestamp this chain's client has
/// observed of the counterparty, so a packet that could never be received is refused here.
pub fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    packet: Packet,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.source_channel,
            *source_channel_end.state(),
        ));
    }

    ctx.authenticate_channel_capability(&packet.source_port, &packet.source_channel, chan_cap)?;

    let counterparty = Counterparty::new(
        packet.destination_port.clone(),
        Some(packet.destination_channel),
    );

    if !source_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.destination_port.clone(),
            packet.destination_channel,
        ));
    }

    let connection_id = source_channel_end
        .connection_hops()
        .first()
        .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;
    let connection_end = ctx.connection_end(connection_id)?;

    let client_id = connection_end.client_id().clone();

    let client_state = ctx.client_state(&client_id)?;

    // prevent accidental sends with clients that cannot be updated
    if client_state.is_frozen() {
        return Err(Error::frozen_client(client_id));
    }

    let latest_height = client_state.latest_height();

    if packet.timeout_height.has_expired(latest_height) {
        return Err(Error::low_packet_height(
            latest_height,
            packet.timeout_height,
        ));
    }

    let consensus_state = ctx.client_consensus_state(&client_id, latest_height)?;
    let latest_timestamp = consensus_state.timestamp();
    if packet.timeout_timestamp.is_set() {
        if let Expiry::Expired = latest_timestamp.check_expiry(&packet.timeout_timestamp) {
            return Err(Error::low_packet_timestamp(
                latest_timestamp,
                packet.timeout_timestamp,
            ));
        }
    }

    packet.validate_basic()?;

    let next_seq_send = ctx.get_next_sequence_send(&packet.source_port, &packet.source_channel)?;

    if packet.sequence != next_seq_send {
        return Err(Error::invalid_packet_sequence(
            packet.sequence,
            next_seq_send,
        ));
    }

    output.log("success: packet send ");

    let result = PacketResult::Send(SendPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel,
        seq: packet.sequence,
        seq_number: next_seq_send.increment()?,
        commitment: ctx.packet_commitment(
            &packet.data,
            &packet.timeout_height,
            &packet.timeout_timestamp,
        ),
    });

    output.emit(IbcEvent::SendPacket(SendPacket::new(
        packet,
        *source_channel_end.ordering(),
        connection_id.clone(),
    )));

    Ok(output.with_result(result))
}
