//! Routing of decoded messages to the ICS handlers and to the application modules owning the
//! ports and channels they touch.

use alloc::sync::Arc;

use ibc_proto::google::protobuf::Any;
use tracing::{debug, info};

use crate::core::ics02_client::msgs::ClientMsg;
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error as ChannelError;
use crate::core::ics04_channel::handler::{
    channel_dispatch, packet_dispatch, send_packet as send_packet_handler,
    write_acknowledgement as write_ack_handler, ChannelIdState,
};
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};
use crate::core::ics04_channel::packet::{Packet, PacketResult};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics26_routing::context::{
    Ics26Context, Module, ModuleId, ModuleOutputBuilder, Router,
};
use crate::core::ics26_routing::error::Error;
use crate::core::ics26_routing::msgs::Ics26Envelope::{
    self, Ics2Msg, Ics4ChannelMsg, Ics4PacketMsg,
};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerOutputBuilder};

/// What the host gets back for a successfully processed message.
#[derive(Clone, Debug, Default)]
pub struct MsgReceipt {
    pub events: Vec<IbcEvent>,
    pub log: Vec<String>,
}

/// Mimics the DeliverTx ABCI interface, but for a single message and at a slightly lower level.
/// No need for authentication info or signature checks here.
///
/// On error the context may hold partial writes of the failed message; hosts run each message
/// against a scratch copy of their state and drop it on failure.
pub fn deliver<Ctx>(ctx: &mut Ctx, message: Any) -> Result<MsgReceipt, Error>
where
    Ctx: Ics26Context,
{
    let envelope = decode(message)?;
    let HandlerOutput { log, events, .. } = dispatch(ctx, envelope)?;
    Ok(MsgReceipt { events, log })
}

/// Attempts to convert a message into a [Ics26Envelope] message
pub fn decode(message: Any) -> Result<Ics26Envelope, Error> {
    message.try_into()
}

/// Top-level ICS dispatch function. Routes incoming IBC messages to their corresponding module.
/// Returns a handler output with empty result of type `HandlerOutput<()>` which contains the log
/// and events produced after processing the input `msg`.
pub fn dispatch<Ctx>(ctx: &mut Ctx, msg: Ics26Envelope) -> Result<HandlerOutput<()>, Error>
where
    Ctx: Ics26Context,
{
    let output = match msg {
        Ics2Msg(ClientMsg::UpdateClient(msg)) => {
            let height = ctx
                .update_client(&msg.client_id, msg.header)
                .map_err(Error::ics02_client)?;
            HandlerOutput::builder()
                .with_log(vec![format!(
                    "client {} updated to height {}",
                    msg.client_id, height
                )])
                .with_result(())
        }

        Ics4ChannelMsg(msg) => channel_deliver(ctx, &msg).map_err(Error::ics04_channel)?,

        Ics4PacketMsg(msg) => packet_deliver(ctx, &msg).map_err(Error::ics04_channel)?,
    };

    Ok(output)
}

fn route<Ctx: Ics26Context>(
    ctx: &Ctx,
    module_id: &ModuleId,
) -> Result<Arc<dyn Module>, ChannelError> {
    ctx.router().get_route(module_id).ok_or_else(|| {
        ChannelError::app_module(format!("no module is registered under '{}'", module_id))
    })
}

/// Runs a handshake step: the channel handler first, then the owning module's callback, and
/// finally the state changes of both.
fn channel_deliver<Ctx>(ctx: &mut Ctx, msg: &ChannelMsg) -> Result<HandlerOutput<()>, ChannelError>
where
    Ctx: Ics26Context,
{
    let (module_id, handler_output) = channel_dispatch(&*ctx, msg)?;
    let module = route(ctx, &module_id)?;

    let mut output = HandlerOutputBuilder::new();
    let mut result = output.merge(handler_output);
    let mut module_output = ModuleOutputBuilder::new();

    let (port_id, channel_id) = (&result.port_id, &result.channel_id);
    match msg {
        ChannelMsg::ChannelOpenInit(msg) => {
            let version = module.on_chan_open_init(
                &mut module_output,
                *result.channel_end.ordering(),
                result.channel_end.connection_hops(),
                port_id,
                channel_id,
                result.channel_end.counterparty(),
                &msg.channel.version,
            )?;
            result.channel_end.set_version(version);
        }
        ChannelMsg::ChannelOpenTry(msg) => {
            let version = module.on_chan_open_try(
                &mut module_output,
                *result.channel_end.ordering(),
                result.channel_end.connection_hops(),
                port_id,
                channel_id,
                result.channel_end.counterparty(),
                &msg.channel.version,
                &msg.counterparty_version,
            )?;
            result.channel_end.set_version(version);
        }
        ChannelMsg::ChannelOpenAck(msg) => module.on_chan_open_ack(
            &mut module_output,
            port_id,
            channel_id,
            &msg.counterparty_version,
        )?,
        ChannelMsg::ChannelOpenConfirm(_) => {
            module.on_chan_open_confirm(&mut module_output, port_id, channel_id)?
        }
        ChannelMsg::ChannelCloseInit(_) => {
            module.on_chan_close_init(&mut module_output, port_id, channel_id)?
        }
        ChannelMsg::ChannelCloseConfirm(_) => {
            module.on_chan_close_confirm(&mut module_output, port_id, channel_id)?
        }
    }
    output.merge(module_output.with_result(()));

    if result.channel_id_state == ChannelIdState::Generated {
        ctx.new_channel_capability(&result.port_id, &result.channel_id)?;
        debug!(
            port_id = %result.port_id,
            channel_id = %result.channel_id,
            %module_id,
            "channel capability handed to module"
        );
    }
    ctx.store_channel_result(result)?;

    Ok(output.with_result(()))
}

/// Runs a relayed packet message: the packet handler, the owning module's callback, and the state
/// changes of both. A module acknowledging a received packet synchronously has its
/// acknowledgement written in the same step.
fn packet_deliver<Ctx>(ctx: &mut Ctx, msg: &PacketMsg) -> Result<HandlerOutput<()>, ChannelError>
where
    Ctx: Ics26Context,
{
    let (module_id, handler_output) = packet_dispatch(&*ctx, msg)?;
    let module = route(ctx, &module_id)?;

    let mut output = HandlerOutputBuilder::new();
    let result = output.merge(handler_output);
    let mut module_output = ModuleOutputBuilder::new();

    let mut write_ack = None;
    match msg {
        PacketMsg::RecvPacket(msg) => {
            let ack = module.on_recv_packet(&mut module_output, &msg.packet, &msg.signer);
            if let Some(ack) = ack.acknowledgement() {
                let (_, chan_cap) = ctx.lookup_module_by_channel(
                    &msg.packet.destination_port,
                    &msg.packet.destination_channel,
                )?;
                let ack_output =
                    write_ack_handler::process(&*ctx, &chan_cap, msg.packet.clone(), ack.clone())?;
                write_ack = Some(ack_output);
            }
        }
        PacketMsg::AckPacket(msg) => module.on_acknowledgement_packet(
            &mut module_output,
            &msg.packet,
            &msg.acknowledgement,
            &msg.signer,
        )?,
        PacketMsg::TimeoutPacket(msg) => {
            module.on_timeout_packet(&mut module_output, &msg.packet, &msg.signer)?
        }
        PacketMsg::TimeoutOnClosePacket(msg) => {
            module.on_timeout_packet(&mut module_output, &msg.packet, &msg.signer)?
        }
    }
    output.merge(module_output.with_result(()));

    ctx.store_packet_result(result)?;
    if let Some(ack_output) = write_ack {
        let ack_result = output.merge(ack_output);
        ctx.store_packet_result(ack_result)?;
    }

    Ok(output.with_result(()))
}

/// Sends `packet` on behalf of the module holding `chan_cap`: stores its commitment, advances
/// the send sequence and returns the `send_packet` event.
pub fn send_packet<Ctx>(
    ctx: &mut Ctx,
    chan_cap: &ChannelCapability,
    packet: Packet,
) -> Result<HandlerOutput<()>, ChannelError>
where
    Ctx: ChannelReader + ChannelKeeper,
{
    let mut output = HandlerOutputBuilder::new();
    let result = output.merge(send_packet_handler::process(&*ctx, chan_cap, packet)?);
    if let PacketResult::Send(res) = &result {
        info!(
            port_id = %res.port_id,
            channel_id = %res.channel_id,
            sequence = %res.seq,
            "packet sent"
        );
    }
    ctx.store_packet_result(result)?;
    Ok(output.with_result(()))
}

/// Writes the acknowledgement of a packet the module holding `chan_cap` received earlier without
/// acknowledging it right away.
pub fn write_acknowledgement<Ctx>(
    ctx: &mut Ctx,
    chan_cap: &ChannelCapability,
    packet: Packet,
    ack: Acknowledgement,
) -> Result<HandlerOutput<()>, ChannelError>
where
    Ctx: ChannelReader + ChannelKeeper,
{
    let mut output = HandlerOutputBuilder::new();
    let result = output.merge(write_ack_handler::process(&*ctx, chan_cap, packet, ack)?);
    ctx.store_packet_result(result)?;
    Ok(output.with_result(()))
}
