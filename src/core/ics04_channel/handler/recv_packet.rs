use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::ReceivePacket;
use crate::core::ics04_channel::handler::verify::verify_packet_recv_proofs;
use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
use crate::core::ics04_channel::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Expiry;

/// The receiver side effects of a packet. Ordered channels advance `seq_number`, unordered
/// channels leave a `receipt` instead.
#[derive(Clone, Debug)]
pub struct RecvPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub seq_number: Sequence,
    pub receipt: Option<Receipt>,
}

pub fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgRecvPacket,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

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

    let counterparty = Counterparty::new(packet.source_port.clone(), Some(packet.source_channel));

    if !dest_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.source_port.clone(),
            packet.source_channel,
        ));
    }

    let connection_id = dest_channel_end
        .connection_hops()
        .first()
        .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;
    let connection_end = ctx.connection_end(connection_id)?;

    if !connection_end.is_open() {
        return Err(Error::connection_not_open(connection_id.clone()));
    }

    let latest_height = ctx.host_height();
    if packet.timeout_height.has_expired(latest_height) {
        return Err(Error::low_packet_height(
            latest_height,
            packet.timeout_height,
        ));
    }

    let latest_timestamp = ctx.host_timestamp();
    if packet.timeout_timestamp.is_set() {
        if let Expiry::Expired = latest_timestamp.check_expiry(&packet.timeout_timestamp) {
            return Err(Error::low_packet_timestamp(
                latest_timestamp,
                packet.timeout_timestamp,
            ));
        }
    }

    verify_packet_recv_proofs(
        ctx,
        msg.proofs.height(),
        packet,
        &connection_end,
        &msg.proofs,
    )?;

    let result = if dest_channel_end.order_matches(&Order::Ordered) {
        let next_seq_recv =
            ctx.get_next_sequence_recv(&packet.destination_port, &packet.destination_channel)?;

        if packet.sequence != next_seq_recv {
            return Err(Error::invalid_packet_sequence(
                packet.sequence,
                next_seq_recv,
            ));
        }

        PacketResult::Recv(RecvPacketResult {
            port_id: packet.destination_port.clone(),
            channel_id: packet.destination_channel,
            seq: packet.sequence,
            seq_number: next_seq_recv.increment()?,
            receipt: None,
        })
    } else {
        let packet_rec = ctx.get_packet_receipt(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        );

        if packet_rec.is_some() {
            return Err(Error::packet_received(packet.sequence));
        }

        // store a receipt that does not contain any data
        PacketResult::Recv(RecvPacketResult {
            port_id: packet.destination_port.clone(),
            channel_id: packet.destination_channel,
            seq: packet.sequence,
            seq_number: 1.into(),
            receipt: Some(Receipt::Ok),
        })
    };

    output.log("success: packet receive");

    output.emit(IbcEvent::ReceivePacket(ReceivePacket::new(
        msg.packet.clone(),
        *dest_channel_end.ordering(),
        connection_id.clone(),
    )));

    Ok(output.with_result(result))
}
