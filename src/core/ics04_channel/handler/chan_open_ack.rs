//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenAck`.

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgChannelOpenAck,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    // INIT (we started the handshake) or TRYOPEN (crossing hellos).
    if !channel_end.state().can_transition_to(State::Open) {
        return Err(Error::invalid_channel_state(
            msg.channel_id,
            *channel_end.state(),
        ));
    }

    ctx.authenticate_channel_capability(&msg.port_id, &msg.channel_id, chan_cap)?;

    // An end which already learnt its counterparty identifier only accepts that one.
    if let Some(stored) = channel_end.counterparty().channel_id() {
        if *stored != msg.counterparty_channel_id {
            return Err(Error::invalid_counterparty_channel_id(
                Some(*stored),
                msg.counterparty_channel_id,
            ));
        }
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
        State::TryOpen,
        *channel_end.ordering(),
        expected_counterparty,
        expected_connection_hops,
        msg.counterparty_version.clone(),
    );

    // 2. Actual proofs are verified now.
    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &conn,
        channel_end.counterparty().port_id(),
        &msg.counterparty_channel_id,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;

    output.log("success: channel open ack");

    // Transition the channel end to the new state & pick a version.
    channel_end.set_state(State::Open);
    channel_end.set_version(msg.counterparty_version.clone());
    channel_end.set_counterparty_channel_id(msg.counterparty_channel_id);

    let event_attributes = channel_event_attributes(&msg.port_id, &msg.channel_id, &channel_end);
    output.emit(IbcEvent::OpenAckChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
