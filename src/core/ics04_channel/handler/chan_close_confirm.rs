//! Protocol logic specific to ICS4 messages of type `MsgChannelCloseConfirm`.

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_close_confirm::MsgChannelCloseConfirm;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgChannelCloseConfirm,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    ctx.authenticate_channel_capability(&msg.port_id, &msg.channel_id, chan_cap)?;

    // Retrieve the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    // Validate that the channel end is in a state where it can be closed.
    if channel_end.state_matches(&State::Closed) {
        return Err(Error::channel_closed(msg.channel_id));
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

    let counterparty_channel_id = channel_end.counterparty().channel_id().ok_or_else(|| {
        Error::invalid_counterparty(format!(
            "channel {} has no counterparty channel identifier",
            msg.channel_id
        ))
    })?;

    // Proof verification in two steps:
    // 1. Setup: build the Channel as we expect to find it on the other party.
    let expected_counterparty = Counterparty::new(msg.port_id.clone(), Some(msg.channel_id));

    let ccid = conn.counterparty().connection_id().ok_or_else(|| {
        Error::ics03_connection(ConnectionError::missing_counterparty_connection_id(
            conn_id.clone(),
        ))
    })?;
    let expected_connection_hops = vec![ccid.clone()];

    let expected_channel_end = ChannelEnd::new(
        State::Closed,
        *channel_end.ordering(),
        expected_counterparty,
        expected_connection_hops,
        channel_end.version().clone(),
    );

    // 2. Actual proofs are verified now.
    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &conn,
        channel_end.counterparty().port_id(),
        counterparty_channel_id,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;

    output.log("success: channel close confirm ");

    // Transition the channel end to the new state.
    channel_end.set_state(State::Closed);

    let event_attributes = channel_event_attributes(&msg.port_id, &msg.channel_id, &channel_end);
    output.emit(IbcEvent::CloseConfirmChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
