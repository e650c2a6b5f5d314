//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenInit`.

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
use crate::core::ics05_port::capabilities::PortCapability;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    port_cap: &PortCapability,
    msg: &MsgChannelOpenInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    if msg.channel.connection_hops().len() != 1 {
        return Err(Error::invalid_connection_hops_length(
            1,
            msg.channel.connection_hops().len(),
        ));
    }

    // An IBC connection running on the local (host) chain should exist.
    let conn_id = &msg.channel.connection_hops()[0];
    let conn = ctx.connection_end(conn_id)?;

    let version = match conn.versions() {
        [version] => version,
        versions => {
            return Err(Error::ics03_connection(
                ConnectionError::single_version_required(conn_id.clone(), versions.len()),
            ))
        }
    };

    let channel_feature = msg.channel.ordering().as_str();
    if !version.is_supported_feature(channel_feature) {
        return Err(Error::ics03_connection(
            ConnectionError::channel_ordering_not_supported(
                conn_id.clone(),
                channel_feature.to_string(),
            ),
        ));
    }

    ctx.authenticate_port_capability(&msg.port_id, port_cap)?;

    // Channel identifier construction.
    let channel_id = ChannelId::new(ctx.channel_counter()?);
    if ctx.channel_end(&msg.port_id, &channel_id).is_ok() {
        return Err(Error::channel_exists(msg.port_id.clone(), channel_id));
    }

    output.log(format!(
        "success: generated new channel identifier: {}",
        channel_id
    ));

    let new_channel_end = ChannelEnd::new(
        State::Init,
        *msg.channel.ordering(),
        msg.channel.counterparty().clone(),
        msg.channel.connection_hops().clone(),
        msg.channel.version().clone(),
    );

    output.log("success: no channel found");

    let event_attributes = channel_event_attributes(&msg.port_id, &channel_id, &new_channel_end);
    output.emit(IbcEvent::OpenInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id,
        channel_id_state: ChannelIdState::Generated,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}
