//! This module implements the processing logic for ICS4 (channel) messages.

use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};
use crate::core::ics04_channel::packet::PacketResult;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics05_port::context::PortReader;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics26_routing::context::ModuleId;
use crate::handler::HandlerOutput;

pub mod acknowledgement;
pub mod chan_close_confirm;
pub mod chan_close_init;
pub mod chan_open_ack;
pub mod chan_open_confirm;
pub mod chan_open_init;
pub mod chan_open_try;
pub mod recv_packet;
pub mod send_packet;
pub mod timeout;
pub mod timeout_executed;
pub mod timeout_on_close;
pub mod verify;
pub mod write_acknowledgement;

/// Defines the possible states of a channel identifier in a `ChannelResult`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelIdState {
    /// Specifies that the channel handshake handler allocated a new channel identifier. This
    /// happens during the processing of either the `MsgChannelOpenInit` or `MsgChannelOpenTry`.
    Generated,

    /// Specifies that the handler reused a previously-allocated channel identifier.
    Reused,
}

#[derive(Clone, Debug)]
pub struct ChannelResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub channel_id_state: ChannelIdState,
    pub channel_end: ChannelEnd,
}

/// The attributes of the handshake event emitted for `channel_end` stored at
/// `(port_id, channel_id)`.
pub(crate) fn channel_event_attributes(
    port_id: &PortId,
    channel_id: &ChannelId,
    channel_end: &ChannelEnd,
) -> Attributes {
    Attributes {
        port_id: port_id.clone(),
        channel_id: Some(*channel_id),
        connection_id: channel_end
            .connection_hops()
            .first()
            .cloned()
            .unwrap_or_default(),
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().copied(),
    }
}

/// The module bound to an existing channel, with the capability it holds for it.
///
/// A channel that was never stored is reported as such, not as a missing capability.
fn module_for_channel<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(ModuleId, ChannelCapability), Error>
where
    Ctx: ChannelReader,
{
    ctx.channel_end(port_id, channel_id)?;
    ctx.lookup_module_by_channel(port_id, channel_id)
}

/// General entry point for processing any type of message related to the ICS4 channel open and
/// channel close handshake protocols.
///
/// Looks up the module owning the port, or the channel, together with the capability it holds
/// and runs the handler on behalf of that module.
pub fn channel_dispatch<Ctx>(
    ctx: &Ctx,
    msg: &ChannelMsg,
) -> Result<(ModuleId, HandlerOutput<ChannelResult>), Error>
where
    Ctx: ChannelReader + PortReader,
{
    let (module_id, output) = match msg {
        ChannelMsg::ChannelOpenInit(msg) => {
            let (module_id, port_cap) = ctx
                .lookup_module_by_port(&msg.port_id)
                .map_err(Error::ics05_port)?;
            (module_id, chan_open_init::process(ctx, &port_cap, msg)?)
        }
        ChannelMsg::ChannelOpenTry(msg) => {
            let (module_id, port_cap) = ctx
                .lookup_module_by_port(&msg.port_id)
                .map_err(Error::ics05_port)?;
            (module_id, chan_open_try::process(ctx, &port_cap, msg)?)
        }
        ChannelMsg::ChannelOpenAck(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.port_id, &msg.channel_id)?;
            (module_id, chan_open_ack::process(ctx, &chan_cap, msg)?)
        }
        ChannelMsg::ChannelOpenConfirm(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.port_id, &msg.channel_id)?;
            (module_id, chan_open_confirm::process(ctx, &chan_cap, msg)?)
        }
        ChannelMsg::ChannelCloseInit(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.port_id, &msg.channel_id)?;
            (module_id, chan_close_init::process(ctx, &chan_cap, msg)?)
        }
        ChannelMsg::ChannelCloseConfirm(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.port_id, &msg.channel_id)?;
            (module_id, chan_close_confirm::process(ctx, &chan_cap, msg)?)
        }
    };
    Ok((module_id, output))
}

/// Dispatcher for processing any type of message related to the ICS4 packet protocols.
///
/// A timeout is proven first and then executed, the result carries the effects of the latter.
pub fn packet_dispatch<Ctx>(
    ctx: &Ctx,
    msg: &PacketMsg,
) -> Result<(ModuleId, HandlerOutput<PacketResult>), Error>
where
    Ctx: ChannelReader,
{
    let (module_id, output) = match msg {
        PacketMsg::RecvPacket(msg) => {
            let (module_id, chan_cap) = module_for_channel(
                ctx,
                &msg.packet.destination_port,
                &msg.packet.destination_channel,
            )?;
            (module_id, recv_packet::process(ctx, &chan_cap, msg)?)
        }
        PacketMsg::AckPacket(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.packet.source_port, &msg.packet.source_channel)?;
            (module_id, acknowledgement::process(ctx, &chan_cap, msg)?)
        }
        PacketMsg::TimeoutPacket(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.packet.source_port, &msg.packet.source_channel)?;

            let mut output = HandlerOutput::builder();
            output.merge(timeout::process(ctx, msg)?);
            let result = output.merge(timeout_executed::process(
                ctx,
                &chan_cap,
                msg.packet.clone(),
            )?);
            (module_id, output.with_result(result))
        }
        PacketMsg::TimeoutOnClosePacket(msg) => {
            let (module_id, chan_cap) =
                module_for_channel(ctx, &msg.packet.source_port, &msg.packet.source_channel)?;

            let mut output = HandlerOutput::builder();
            output.merge(timeout_on_close::process(ctx, &chan_cap, msg)?);
            let result = output.merge(timeout_executed::process(
                ctx,
                &chan_cap,
                msg.packet.clone(),
            )?);
            (module_id, output.with_result(result))
        }
    };
    Ok((module_id, output))
}
