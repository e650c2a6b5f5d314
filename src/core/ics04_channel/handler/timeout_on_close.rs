use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::{
    verify_channel_proofs, verify_next_sequence_recv, verify_packet_receipt_absence,
};
use crate::core::ics04_channel::msgs::timeout_on_close::MsgTimeoutOnClose;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::proofs::ProofError;

/// Proves that `msg.packet` can no longer be received because the counterparty closed its end of
/// the channel. The timeout itself need not have elapsed.
pub fn process(
    ctx: &dyn ChannelReader,
    chan_cap: &ChannelCapability,
    msg: &MsgTimeoutOnClose,
) -> HandlerResult<(), Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    ctx.authenticate_channel_capability(&packet.source_port, &packet.source_channel, chan_cap)?;

    let counterparty = Counterparty::new(
        packet.destination_port.clone(),
        Some(packet.destination_channel),
    );

    if !source_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.destination_port.clone(),
            packet.destination_channel,
        ));
    }

    let connection_id = source_channel_end
        .connection_hops()
        .first()
        .ok_or_else(|| Error::invalid_connection_hops_length(1, 0))?;
    let connection_end = ctx.connection_end(connection_id)?;

    // verify packet commitment
    let packet_commitment = ctx
        .get_packet_commitment(&packet.source_port, &packet.source_channel, packet.sequence)
        .ok_or_else(|| Error::packet_commitment_not_found(packet.sequence))?;

    let expected_commitment = ctx.packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );
    if packet_commitment != expected_commitment {
        return Err(Error::incorrect_packet_commitment(packet.sequence));
    }

    let ccid = connection_end.counterparty().connection_id().ok_or_else(|| {
        Error::ics03_connection(ConnectionError::missing_counterparty_connection_id(
            connection_id.clone(),
        ))
    })?;

    // The counterparty end must be closed and still point back at this one.
    let expected_channel_end = ChannelEnd::new(
        State::Closed,
        *source_channel_end.ordering(),
        Counterparty::new(packet.source_port.clone(), Some(packet.source_channel)),
        vec![ccid.clone()],
        source_channel_end.version().clone(),
    );

    let proof_close = msg
        .proofs
        .other_proof()
        .as_ref()
        .ok_or_else(|| Error::invalid_proof(ProofError::empty_proof()))?;

    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &connection_end,
        &packet.destination_port,
        &packet.destination_channel,
        &expected_channel_end,
        proof_close,
    )?;

    if source_channel_end.order_matches(&Order::Ordered) {
        if packet.sequence < msg.next_sequence_recv {
            return Err(Error::packet_already_received(
                packet.sequence,
                msg.next_sequence_recv,
            ));
        }
        verify_next_sequence_recv(
            ctx,
            msg.proofs.height(),
            &connection_end,
            packet,
            msg.next_sequence_recv,
            &msg.proofs,
        )?;
    } else {
        verify_packet_receipt_absence(
            ctx,
            msg.proofs.height(),
            &connection_end,
            packet,
            &msg.proofs,
        )?;
    }

    output.log("success: packet timeout on close proven");

    Ok(output.with_result(()))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::error;
    use crate::core::ics04_channel::handler::timeout_on_close::process;
    use crate::core::ics04_channel::msgs::timeout_on_close::test_util::get_dummy_raw_msg_timeout_on_close;
    use crate::core::ics04_channel::msgs::timeout_on_close::MsgTimeoutOnClose;
    use crate::core::ics04_channel::Version;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::{ChannelEndsPath, ReceiptsPath};
    use crate::mock::context::MockContext;
    use crate::test_utils::{
        build_proofs, get_absence_proof, get_dummy_connection_end, get_store_proof,
    };
    use crate::Height;

    #[test]
    fn timeout_on_close_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgTimeoutOnClose,
            want_pass: bool,
            match_error: Box<dyn FnOnce(error::ErrorDetail)>,
        }

        let proof_height = Height::new(0, 5).unwrap();

        // The timeout lies far ahead: only the closed counterparty makes the packet undeliverable.
        let mut msg = MsgTimeoutOnClose::try_from(get_dummy_raw_msg_timeout_on_close(
            proof_height.revision_height() + 100,
            0,
        ))
        .unwrap();
        let packet = msg.packet.clone();

        let source_channel_end = ChannelEnd::new(
            State::Open,
            Order::default(),
            Counterparty::new(packet.destination_port.clone(), Some(packet.destination_channel)),
            vec![ConnectionId::default()],
            Version::ics20(),
        );

        let closed_counterparty_end = |state: State| {
            ChannelEnd::new(
                state,
                Order::default(),
                Counterparty::new(packet.source_port.clone(), Some(packet.source_channel)),
                vec![ConnectionId::new(1)],
                Version::ics20(),
            )
        };

        let proofs_for = |counterparty_end: ChannelEnd| {
            build_proofs(
                get_absence_proof(ReceiptsPath {
                    port_id: packet.destination_port.clone(),
                    channel_id: packet.destination_channel,
                    sequence: packet.sequence,
                }),
                Some(get_store_proof(
                    ChannelEndsPath(packet.destination_port.clone(), packet.destination_channel),
                    counterparty_end.encode_vec(),
                )),
                proof_height,
            )
            .unwrap()
        };

        msg.proofs = proofs_for(closed_counterparty_end(State::Closed));

        let mut msg_counterparty_open = msg.clone();
        msg_counterparty_open.proofs = proofs_for(closed_counterparty_end(State::Open));

        let context = MockContext::default()
            .with_client(&ClientId::default(), proof_height)
            .with_connection(
                ConnectionId::default(),
                get_dummy_connection_end(ConnectionState::Open),
            )
            .with_port(PortId::default())
            .with_channel(PortId::default(), ChannelId::default(), source_channel_end);

        let with_commitment = context.clone().with_packet_commitment(
            PortId::default(),
            ChannelId::default(),
            packet.sequence,
            compute_packet_commitment(&packet),
        );

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no packet commitment exists".to_string(),
                ctx: context,
                msg: msg.clone(),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::PacketCommitmentNotFound(_) => {}
                    _ => panic!("Expected PacketCommitmentNotFound, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because the counterparty channel is still open"
                    .to_string(),
                ctx: with_commitment.clone(),
                msg: msg_counterparty_open,
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::VerifyChannelFailed(_) => {}
                    _ => panic!("Expected VerifyChannelFailed, instead got {}", e),
                }),
            },
            Test {
                name: "Good parameters".to_string(),
                ctx: with_commitment,
                msg,
                want_pass: true,
                match_error: Box::new(|_| {}),
            },
        ]
        .into_iter()
        .collect();

        for test in tests {
            let chan_cap = test
                .ctx
                .channel_capability(&PortId::default(), &ChannelId::default())
                .unwrap();
            let res = process(&test.ctx, &chan_cap, &test.msg);
            match res {
                Ok(_) => {
                    assert!(
                        test.want_pass,
                        "TO_on_close_packet: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "timeout_on_close_packet: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone(),
                        e,
                    );

                    (test.match_error)(e.0);
                }
            }
        }
    }
}
