use crate::core::ics04_channel::channel::{ChannelEnd, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::TimeoutPacket;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

/// The sender side effects of a timed out packet. On ordered channels `channel` carries the end
/// transitioned to `CLOSED`, to be stored together with the commitment removal.
#[derive(Clone, Debug)]
pub struct TimeoutPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub channel: Option<ChannelEnd>,
}

pub fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    packet: Packet,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    ctx.authenticate_channel_capability(&packet.source_port, &packet.source_channel, chan_cap)?;

    let connection_id = source_channel_end
        .connection_hops()
        .first()
        .cloned()
        .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;

    let ordering = *source_channel_end.ordering();

    // A timeout breaks the delivery guarantee of an ordered channel, which is therefore closed.
    let channel = if ordering == Order::Ordered {
        let mut closed = source_channel_end;
        closed.set_state(State::Closed);
        Some(closed)
    } else {
        None
    };

    let result = PacketResult::Timeout(TimeoutPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel,
        seq: packet.sequence,
        channel,
    });

    output.log("success: packet timeout executed");

    output.emit(IbcEvent::TimeoutPacket(TimeoutPacket::new(
        packet,
        ordering,
        connection_id,
    )));

    Ok(output.with_result(result))
}
