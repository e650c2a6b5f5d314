//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenConfirm`.

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgChannelOpenConfirm,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    // Validate that the channel end is in a state where it can be confirmed.
    if !channel_end.state_matches(&State::TryOpen) {
        return Err(Error::invalid_channel_state(
            msg.channel_id,
            *channel_end.state(),
        ));
    }

    ctx.authenticate_channel_capability(&msg.port_id, &msg.channel_id, chan_cap)?;

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
            "channel {} in TRYOPEN has no counterparty channel identifier",
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
        State::Open,
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
    )
    .map_err(Error::chan_open_confirm_proof_verification)?;

    output.log("success: channel open confirm ");

    // Transition the channel end to the new state.
    channel_end.set_state(State::Open);

    let event_attributes = channel_event_attributes(&msg.port_id, &msg.channel_id, &channel_end);
    output.emit(IbcEvent::OpenConfirmChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::error;
    use crate::core::ics04_channel::handler::channel_dispatch;
    use crate::core::ics04_channel::msgs::chan_open_confirm::test_util::get_dummy_raw_msg_chan_open_confirm;
    use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics04_channel::Version;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::ChannelEndsPath;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{build_proofs, get_dummy_connection_end, get_store_proof};
    use crate::Height;

    #[test]
    fn chan_open_confirm_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: ChannelMsg,
            want_pass: bool,
        }

        let client_id = ClientId::default();
        let conn_id = ConnectionId::default();
        let proof_height = 10;
        let counterparty_port = PortId::transfer();
        let counterparty_chan = ChannelId::new(5);

        let conn_end = get_dummy_connection_end(ConnectionState::Open);

        let mut msg_chan_confirm = MsgChannelOpenConfirm::try_from(
            get_dummy_raw_msg_chan_open_confirm(proof_height),
        )
        .unwrap();

        let chan_end = ChannelEnd::new(
            State::TryOpen,
            Order::Unordered,
            Counterparty::new(counterparty_port.clone(), Some(counterparty_chan)),
            vec![conn_id.clone()],
            Version::ics20(),
        );

        let expected_counterparty_end = ChannelEnd::new(
            State::Open,
            Order::Unordered,
            Counterparty::new(
                msg_chan_confirm.port_id.clone(),
                Some(msg_chan_confirm.channel_id),
            ),
            vec![ConnectionId::new(1)],
            Version::ics20(),
        );
        msg_chan_confirm.proofs = build_proofs(
            get_store_proof(
                ChannelEndsPath(counterparty_port, counterparty_chan),
                expected_counterparty_end.encode_vec(),
            ),
            None,
            Height::new(0, proof_height).unwrap(),
        )
        .unwrap();

        let mut open_chan_end = chan_end.clone();
        open_chan_end.set_state(State::Open);

        let mut other_version_chan_end = chan_end.clone();
        other_version_chan_end.set_version(Version::from("ics20-2".to_string()));

        let context = MockContext::default()
            .with_client(&client_id, Height::new(0, proof_height).unwrap())
            .with_connection(conn_id, conn_end)
            .with_port(msg_chan_confirm.port_id.clone());

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because the channel is already open".to_string(),
                ctx: context.clone().with_channel(
                    msg_chan_confirm.port_id.clone(),
                    msg_chan_confirm.channel_id,
                    open_chan_end,
                ),
                msg: ChannelMsg::ChannelOpenConfirm(msg_chan_confirm.clone()),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the proof does not match the local version"
                    .to_string(),
                ctx: context.clone().with_channel(
                    msg_chan_confirm.port_id.clone(),
                    msg_chan_confirm.channel_id,
                    other_version_chan_end,
                ),
                msg: ChannelMsg::ChannelOpenConfirm(msg_chan_confirm.clone()),
                want_pass: false,
            },
            Test {
                name: "Good parameters".to_string(),
                ctx: context.with_channel(
                    msg_chan_confirm.port_id.clone(),
                    msg_chan_confirm.channel_id,
                    chan_end,
                ),
                msg: ChannelMsg::ChannelOpenConfirm(msg_chan_confirm),
                want_pass: true,
            },
        ]
        .into_iter()
        .collect();

        for test in tests {
            let res = channel_dispatch(&test.ctx, &test.msg);
            // Additionally check the events and the output objects in the result.
            match res {
                Ok((_, proto_output)) => {
                    assert!(
                        test.want_pass,
                        "chan_open_confirm: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert!(!proto_output.events.is_empty()); // Some events must exist.

                    // The object in the output is a ConnectionEnd, should have init state.
                    assert_eq!(
                        proto_output.result.channel_end.state().clone(),
                        State::Open
                    );

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenConfirmChannel(_)));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "chan_open_confirm: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
                        test.name,
                        test.msg,
                        test.ctx.clone(),
                        e,
                    );

                    if test.name.contains("proof") {
                        assert!(matches!(
                            e.detail(),
                            error::ErrorDetail::VerifyChannelFailed(_)
                        ));
                    }
                }
            }
        }
    }
}
