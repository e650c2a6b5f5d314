//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenTry`.

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{
    channel_event_attributes, ChannelIdState, ChannelResult,
};
use crate::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
use crate::core::ics05_port::capabilities::PortCapability;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process(
    ctx: &dyn ChannelReader,
    port_cap: &PortCapability,
    msg: &MsgChannelOpenTry,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    if msg.channel.connection_hops().len() != 1 {
        return Err(Error::invalid_connection_hops_length(
            1,
            msg.channel.connection_hops().len(),
        ));
    }

    // Unwrap the old channel end (if any) and validate it against the message.
    let (channel_id, channel_id_state) = match &msg.previous_channel_id {
        Some(prev_id) => {
            let old_channel_end = ctx.channel_end(&msg.port_id, prev_id).map_err(|_| {
                Error::invalid_channel(format!(
                    "previous channel ({}, {}) not found",
                    msg.port_id, prev_id
                ))
            })?;

            // Crossing hellos: the existing end must have been initialised with the exact
            // parameters the counterparty proposes.
            if !(old_channel_end.state_matches(&State::Init)
                && old_channel_end.order_matches(msg.channel.ordering())
                && old_channel_end.connection_hops_matches(msg.channel.connection_hops())
                && old_channel_end.counterparty().port_id() == msg.channel.counterparty().port_id()
                && old_channel_end.version_matches(msg.channel.version()))
            {
                return Err(Error::invalid_channel(format!(
                    "previous channel {} does not match the proposed channel {}",
                    old_channel_end, msg.channel
                )));
            }

            if old_channel_end.counterparty().channel_id().is_some() {
                return Err(Error::invalid_channel(format!(
                    "counterparty channel identifier of the previous channel {} must be empty",
                    prev_id
                )));
            }

            output.log(format!(
                "success: reusing previous channel identifier: {}",
                prev_id
            ));

            (*prev_id, ChannelIdState::Reused)
        }
        // No previous channel id was supplied. Create a new identifier.
        None => {
            let chan_id = ChannelId::new(ctx.channel_counter()?);
            if ctx.channel_end(&msg.port_id, &chan_id).is_ok() {
                return Err(Error::channel_exists(msg.port_id.clone(), chan_id));
            }

            output.log(format!(
                "success: generated new channel identifier: {}",
                chan_id
            ));

            (chan_id, ChannelIdState::Generated)
        }
    };

    ctx.authenticate_port_capability(&msg.port_id, port_cap)?;

    let conn_id = &msg.channel.connection_hops()[0];
    let conn = ctx.connection_end(conn_id)?;
    if !conn.is_open() {
        return Err(Error::connection_not_open(conn_id.clone()));
    }

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

    let counterparty_channel_id = msg.channel.counterparty().channel_id().ok_or_else(|| {
        Error::invalid_counterparty("counterparty channel identifier must be set".to_string())
    })?;

    // Proof verification in two steps:
    // 1. Setup: build the Channel as we expect to find it on the other party.
    //      the port should be identical with the port we're using; the channel id should not be set
    //      since the counterparty cannot know yet which ID did we choose.
    let expected_counterparty = Counterparty::new(msg.port_id.clone(), None);
    let ccid = conn
        .counterparty()
        .connection_id()
        .ok_or_else(|| {
            Error::ics03_connection(ConnectionError::missing_counterparty_connection_id(
                conn_id.clone(),
            ))
        })?;
    let expected_connection_hops = vec![ccid.clone()];

    // The other party should be storing a channel end in this configuration.
    let expected_channel_end = ChannelEnd::new(
        State::Init,
        *msg.channel.ordering(),
        expected_counterparty,
        expected_connection_hops,
        msg.counterparty_version.clone(),
    );

    // 2. Actual proofs are verified now.
    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &conn,
        msg.channel.counterparty().port_id(),
        counterparty_channel_id,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;

    output.log("success: channel open try");

    let new_channel_end = ChannelEnd::new(
        State::TryOpen,
        *msg.channel.ordering(),
        msg.channel.counterparty().clone(),
        msg.channel.connection_hops().clone(),
        msg.channel.version().clone(),
    );

    let event_attributes = channel_event_attributes(&msg.port_id, &channel_id, &new_channel_end);
    output.emit(IbcEvent::OpenTryChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id,
        channel_id_state,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::error as ics02_error;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics03_connection::error as ics03_error;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
    use crate::core::ics04_channel::error;
    use crate::core::ics04_channel::handler::{channel_dispatch, ChannelIdState};
    use crate::core::ics04_channel::msgs::chan_open_try::test_util::get_dummy_raw_msg_chan_open_try;
    use crate::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics04_channel::Version;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId};
    use crate::core::ics24_host::path::ChannelEndsPath;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{build_proofs, get_dummy_connection_end, get_store_proof};
    use crate::Height;

    #[test]
    fn chan_open_try_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: ChannelMsg,
            want_pass: bool,
            match_error: Box<dyn FnOnce(error::ErrorDetail)>,
        }

        // Some general-purpose variable to parametrize the messages and the context.
        let proof_height = 10;
        let conn_id = ConnectionId::default();
        let client_id = ClientId::default();

        // The context. We'll reuse this same one across all tests.
        let context = MockContext::default();

        // This is the connection underlying the channel we're trying to open.
        let conn_end = get_dummy_connection_end(ConnectionState::Open);

        // We're going to test message processing against this message.
        let mut msg =
            MsgChannelOpenTry::try_from(get_dummy_raw_msg_chan_open_try(proof_height)).unwrap();

        // The counterparty stores its INIT end at the channel named in the message.
        let expected_counterparty_end = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.port_id.clone(), None),
            vec![ConnectionId::new(1)],
            msg.counterparty_version.clone(),
        );
        msg.proofs = build_proofs(
            get_store_proof(
                ChannelEndsPath(
                    msg.channel.counterparty().port_id().clone(),
                    *msg.channel.counterparty().channel_id().unwrap(),
                ),
                expected_counterparty_end.encode_vec(),
            ),
            None,
            Height::new(0, proof_height).unwrap(),
        )
        .unwrap();

        // Assumption: an already existing `Init` channel should exist in the context for `msg`, and
        // this channel should depend on connection `conn_id`.
        let chan_id = ChannelId::new(24);
        msg.previous_channel_id = Some(chan_id);

        // This message does not assume a channel should already be initialized.
        let mut msg_vanilla = msg.clone();
        msg_vanilla.previous_channel_id = None;

        // A preloaded channel end that resides in the context. This is constructed so as to be
        // consistent with the incoming ChanOpenTry message `msg`.
        let correct_chan_end = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.channel.counterparty().port_id().clone(), None),
            msg.channel.connection_hops().clone(),
            msg.channel.version().clone(),
        );

        // A preloaded channel end that resides in the context. This is constructed so as to be
        // __inconsistent__ with the incoming ChanOpenTry message `msg` due to its version field.
        let version = Version::from(format!("{}-", msg.channel.version()));
        let incorrect_chan_end_ver = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.channel.counterparty().port_id().clone(), None),
            msg.channel.connection_hops().clone(),
            version,
        );

        // A preloaded channel end residing in the context, which will be __inconsistent__ with
        // the incoming ChanOpenTry message `msg` due to its connection hops field.
        let hops = vec![ConnectionId::new(9890)];
        let incorrect_chan_end_hops = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.channel.counterparty().port_id().clone(), None),
            hops,
            msg.channel.version().clone(),
        );

        // A preloaded channel end that already knows its counterparty channel.
        let chan_end_with_counterparty_id = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            msg.channel.counterparty().clone(),
            msg.channel.connection_hops().clone(),
            msg.channel.version().clone(),
        );

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no channel is preloaded in the context".to_string(),
                ctx: context.clone().with_port(msg.port_id.clone()),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::InvalidChannel(_) => {}
                    _ => panic!("Expected InvalidChannel, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because no connection exists in the context".to_string(),
                ctx: context.clone().with_port(msg.port_id.clone()),
                msg: ChannelMsg::ChannelOpenTry(msg_vanilla.clone()),
                want_pass: false,
                match_error: {
                    let connection_id = msg.channel.connection_hops()[0].clone();
                    Box::new(move |e| match e {
                        error::ErrorDetail::Ics03Connection(e) => {
                            assert_eq!(
                                e.source,
                                ics03_error::ErrorDetail::ConnectionNotFound(
                                    ics03_error::ConnectionNotFoundSubdetail { connection_id }
                                )
                            );
                        }
                        _ => {
                            panic!("Expected MissingConnection, instead got {}", e)
                        }
                    })
                },
            },
            Test {
                name: "Processing fails because the connection is not open".to_string(),
                ctx: context
                    .clone()
                    .with_port(msg.port_id.clone())
                    .with_connection(
                        conn_id.clone(),
                        get_dummy_connection_end(ConnectionState::TryOpen),
                    ),
                msg: ChannelMsg::ChannelOpenTry(msg_vanilla.clone()),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::ConnectionNotOpen(_) => {}
                    _ => panic!("Expected ConnectionNotOpen, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because of inconsistent version with preexisting channel"
                    .to_string(),
                ctx: context
                    .clone()
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone())
                    .with_channel(msg.port_id.clone(), chan_id, incorrect_chan_end_ver),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::InvalidChannel(_) => {}
                    _ => panic!("Expected InvalidChannel, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because of inconsistent connection hops".to_string(),
                ctx: context
                    .clone()
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone())
                    .with_channel(msg.port_id.clone(), chan_id, incorrect_chan_end_hops),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::InvalidChannel(_) => {}
                    _ => panic!("Expected InvalidChannel, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because the previous channel already has a counterparty"
                    .to_string(),
                ctx: context
                    .clone()
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone())
                    .with_channel(msg.port_id.clone(), chan_id, chan_end_with_counterparty_id),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::InvalidChannel(_) => {}
                    _ => panic!("Expected InvalidChannel, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails b/c the context has no client state".to_string(),
                ctx: context
                    .clone()
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone())
                    .with_channel(msg.port_id.clone(), chan_id, correct_chan_end.clone()),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: false,
                match_error: {
                    let client_id = client_id.clone();
                    Box::new(move |e| match e {
                        error::ErrorDetail::Ics02Client(e) => {
                            assert_eq!(
                                e.source,
                                ics02_error::ErrorDetail::ClientNotFound(
                                    ics02_error::ClientNotFoundSubdetail { client_id }
                                )
                            );
                        }
                        _ => {
                            panic!("Expected MissingClientState, instead got {}", e)
                        }
                    })
                },
            },
            Test {
                name: "Processing fails because the proof is for another channel end".to_string(),
                ctx: context
                    .clone()
                    .with_client(&client_id, Height::new(0, proof_height).unwrap())
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone()),
                msg: {
                    let mut msg = msg_vanilla.clone();
                    msg.counterparty_version = Version::from("ics20-2".to_string());
                    ChannelMsg::ChannelOpenTry(msg)
                },
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::VerifyChannelFailed(_) => {}
                    _ => panic!("Expected VerifyChannelFailed, instead got {}", e),
                }),
            },
            Test {
                name: "Processing is successful".to_string(),
                ctx: context
                    .clone()
                    .with_client(&client_id, Height::new(0, proof_height).unwrap())
                    .with_connection(conn_id.clone(), conn_end.clone())
                    .with_port(msg.port_id.clone())
                    .with_channel(msg.port_id.clone(), chan_id, correct_chan_end),
                msg: ChannelMsg::ChannelOpenTry(msg.clone()),
                want_pass: true,
                match_error: Box::new(|_| {}),
            },
            Test {
                name: "Processing is successful for a vanilla message".to_string(),
                ctx: context
                    .clone()
                    .with_client(&client_id, Height::new(0, proof_height).unwrap())
                    .with_connection(conn_id.clone(), conn_end)
                    .with_port(msg.port_id.clone()),
                msg: ChannelMsg::ChannelOpenTry(msg_vanilla.clone()),
                want_pass: true,
                match_error: Box::new(|_| {}),
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
                        "chan_open_try: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert!(!proto_output.events.is_empty()); // Some events must exist.

                    // The object in the output is a channel end, should have TryOpen state.
                    assert_eq!(
                        proto_output.result.channel_end.state().clone(),
                        State::TryOpen
                    );

                    if let ChannelMsg::ChannelOpenTry(msg) = &test.msg {
                        let expected_state = if msg.previous_channel_id.is_some() {
                            ChannelIdState::Reused
                        } else {
                            ChannelIdState::Generated
                        };
                        assert_eq!(proto_output.result.channel_id_state, expected_state);
                    }

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenTryChannel(_)));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "chan_open_try: did not pass test: {}, \nparams:\n\tmsg={:?}\n\tcontext={:?}\nerror: {:?}",
                        test.name,
                        test.msg,
                        test.ctx.clone(),
                        e,
                    );

                    (test.match_error)(e.0);
                }
            }
        }
    }

    /// Crossing hellos: the message reuses the identifier of the local INIT end.
    #[test]
    fn chan_open_try_reuses_the_previous_channel_identifier() {
        let proof_height = 10;
        let mut msg =
            MsgChannelOpenTry::try_from(get_dummy_raw_msg_chan_open_try(proof_height)).unwrap();

        let expected_counterparty_end = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.port_id.clone(), None),
            vec![ConnectionId::new(1)],
            msg.counterparty_version.clone(),
        );
        msg.proofs = build_proofs(
            get_store_proof(
                ChannelEndsPath(msg.channel.counterparty().port_id().clone(), ChannelId::new(0)),
                expected_counterparty_end.encode_vec(),
            ),
            None,
            Height::new(0, proof_height).unwrap(),
        )
        .unwrap();
        msg.previous_channel_id = Some(ChannelId::new(3));

        let init_end = ChannelEnd::new(
            State::Init,
            *msg.channel.ordering(),
            Counterparty::new(msg.channel.counterparty().port_id().clone(), None),
            msg.channel.connection_hops().clone(),
            msg.channel.version().clone(),
        );

        let ctx = MockContext::default()
            .with_client(&ClientId::default(), Height::new(0, proof_height).unwrap())
            .with_connection(
                ConnectionId::default(),
                get_dummy_connection_end(ConnectionState::Open),
            )
            .with_port(msg.port_id.clone())
            .with_channel(msg.port_id.clone(), ChannelId::new(3), init_end);

        let (_, output) = channel_dispatch(&ctx, &ChannelMsg::ChannelOpenTry(msg)).unwrap();
        assert_eq!(output.result.channel_id, ChannelId::new(3));
        assert_eq!(output.result.channel_id_state, ChannelIdState::Reused);
        assert_eq!(
            output.result.channel_end.counterparty().channel_id(),
            Some(&ChannelId::new(0))
        );
    }
}
