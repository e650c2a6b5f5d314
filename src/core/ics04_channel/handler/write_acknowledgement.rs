use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::commitment::AcknowledgementCommitment;
use crate::core::ics04_channel::events::WriteAcknowledgement;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics04_channel::{context::ChannelReader, error::Error};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug)]
pub struct WriteAckPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub ack_commitment: AcknowledgementCommitment,
}

/// Records the acknowledgement a module produced for a received packet. Runs separately from
/// the receive step, so modules may acknowledge asynchronously.
pub fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    packet: Packet,
    ack: Acknowledgement,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let dest_channel_end =
        ctx.channel_end(&packet.destination_port, &packet.destination_channel)?;

    if !dest_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.destination_channel,
            *dest_channel_end.state(),
        ));
    }

    ctx.authenticate_channel_capability(
        &packet.destination_port,
        &packet.destination_channel,
        chan_cap,
    )?;

    // NOTE: IBC app modules might have written the acknowledgement synchronously on
    // the OnRecvPacket callback so we need to check if the acknowledgement is already
    // set on the store and return an error if so.
    if ctx
        .get_packet_acknowledgement(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        )
        .is_some()
    {
        return Err(Error::acknowledgement_exists(packet.sequence));
    }

    if ack.is_empty() {
        return Err(Error::invalid_acknowledgement());
    }

    let connection_id = dest_channel_end
        .connection_hops()
        .first()
        .cloned()
        .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;

    let result = PacketResult::WriteAck(WriteAckPacketResult {
        port_id: packet.destination_port.clone(),
        channel_id: packet.destination_channel,
        seq: packet.sequence,
        ack_commitment: ctx.ack_commitment(&ack),
    });

    output.log("success: packet write acknowledgement");

    output.emit(IbcEvent::WriteAcknowledgement(WriteAcknowledgement::new(
        packet,
        ack.into_bytes(),
        *dest_channel_end.ordering(),
        connection_id,
    )));

    Ok(output.with_result(result))
}
