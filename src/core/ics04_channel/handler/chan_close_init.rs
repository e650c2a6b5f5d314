//! Protocol logic specific to ICS4 messages of type `MsgChannelCloseInit`.

use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_close_init::MsgChannelCloseInit;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgChannelCloseInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    ctx.authenticate_channel_capability(&msg.port_id, &msg.channel_id, chan_cap)?;

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    if !channel_end.state().can_transition_to(State::Closed) {
        return Err(Error::invalid_channel_state(
            msg.channel_id,
            *channel_end.state(),
        ));
    }

    // An OPEN IBC connection running on the local (host) chain should exist.
    if channel_end.connection_hops().len() != 1 {
        return Err(Error::invalid_connection_hops_length(
            1,
            channel_end.connection_hops().len(),
        ));
    }

    let conn_id = &channel_end.connection_hops()[0];
    let conn = ctx.connection_end(conn_id)?;
    if !conn.is_open() {
        return Err(Error::connection_not_open(conn_id.clone()));
    }

    output.log("success: channel close init ");

    // Transition the channel end to the new state & pick a version.
    channel_end.set_state(State::Closed);

    let event_attributes = channel_event_attributes(&msg.port_id, &msg.channel_id, &channel_end);
    output.emit(IbcEvent::CloseInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
