use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::verify::{
    verify_next_sequence_recv, verify_packet_receipt_absence,
};
use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
use crate::handler::{HandlerOutput, HandlerResult};

/// Proves that `msg.packet` timed out on the counterparty without being received. Nothing is
/// changed here; the effects of the timeout are computed by `timeout_executed`.
pub fn process(ctx: &dyn ChannelReader, msg: &MsgTimeout) -> HandlerResult<(), Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::channel_closed(packet.source_channel));
    }

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

    let client_id = connection_end.client_id().clone();

    // check that timeout height or timeout timestamp has passed on the other end
    let proof_height = msg.proofs.height();

    let consensus_state = ctx.client_consensus_state(&client_id, proof_height)?;

    let proof_timestamp = consensus_state.timestamp();

    if !packet.timed_out(&proof_timestamp, proof_height) {
        return Err(Error::packet_timeout_not_reached(
            packet.timeout_height,
            proof_height,
            packet.timeout_timestamp,
            proof_timestamp,
        ));
    }

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

    if source_channel_end.order_matches(&Order::Ordered) {
        if packet.sequence < msg.next_sequence_recv {
            return Err(Error::packet_already_received(
                packet.sequence,
                msg.next_sequence_recv,
            ));
        }
        verify_next_sequence_recv(
            ctx,
            proof_height,
            &connection_end,
            packet,
            msg.next_sequence_recv,
            &msg.proofs,
        )?;
    } else {
        verify_packet_receipt_absence(ctx, proof_height, &connection_end, packet, &msg.proofs)?;
    }

    output.log("success: packet timeout proven");

    Ok(output.with_result(()))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::error;
    use crate::core::ics04_channel::handler::timeout::process;
    use crate::core::ics04_channel::msgs::timeout::test_util::get_dummy_raw_msg_timeout;
    use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
    use crate::core::ics04_channel::Version;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::{ReceiptsPath, SeqRecvsPath};
    use crate::mock::context::MockContext;
    use crate::test_utils::{
        build_proofs, get_absence_proof, get_dummy_connection_end, get_store_proof,
    };
    use crate::Height;

    fn channel_end(order: Order) -> ChannelEnd {
        ChannelEnd::new(
            State::Open,
            order,
            Counterparty::new(PortId::default(), Some(ChannelId::default())),
            vec![ConnectionId::default()],
            Version::ics20(),
        )
    }

    fn context(proof_height: Height) -> MockContext {
        MockContext::default()
            .with_client(&ClientId::default(), proof_height)
            .with_connection(
                ConnectionId::default(),
                get_dummy_connection_end(ConnectionState::Open),
            )
            .with_port(PortId::default())
    }

    /// A timeout message for a packet with timeout height `timeout_height`, carrying a proof that
    /// the counterparty has no receipt for it at `proof_height`.
    fn unordered_msg(proof_height: Height, timeout_height: u64, timeout_ts: u64) -> MsgTimeout {
        let mut msg = MsgTimeout::try_from(get_dummy_raw_msg_timeout(
            proof_height.revision_height(),
            timeout_height,
            timeout_ts,
        ))
        .unwrap();
        let packet = &msg.packet;
        msg.proofs = build_proofs(
            get_absence_proof(ReceiptsPath {
                port_id: packet.destination_port.clone(),
                channel_id: packet.destination_channel,
                sequence: packet.sequence,
            }),
            None,
            proof_height,
        )
        .unwrap();
        msg
    }

    #[test]
    fn timeout_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgTimeout,
            want_pass: bool,
            match_error: Box<dyn FnOnce(error::ErrorDetail)>,
        }

        let proof_height = Height::new(0, 11).unwrap();

        let msg = unordered_msg(proof_height, 10, 0);
        let packet = msg.packet.clone();
        let commitment = compute_packet_commitment(&packet);

        // Neither the height (12) nor the timestamp (far ahead) has passed at height 11.
        let msg_not_timed_out = unordered_msg(proof_height, 12, 1_000_000_000_000);

        // The timestamp alone suffices: 5s is before the 11s of the consensus state.
        let msg_timestamp_only = unordered_msg(proof_height, 12, 5_000_000_000);

        let ctx_with_channel = context(proof_height).with_channel(
            PortId::default(),
            ChannelId::default(),
            channel_end(Order::Unordered),
        );

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no channel exists in the context".to_string(),
                ctx: context(proof_height),
                msg: msg.clone(),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::ChannelNotFound(_) => {}
                    _ => panic!("Expected ChannelNotFound, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because the client does not have a consensus state for the required height"
                    .to_string(),
                ctx: ctx_with_channel.clone().with_packet_commitment(
                    PortId::default(),
                    ChannelId::default(),
                    packet.sequence,
                    commitment.clone(),
                ),
                msg: unordered_msg(Height::new(0, 13).unwrap(), 10, 0),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::Ics02Client(_) => {}
                    _ => panic!("Expected Ics02Client, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because the packet timeout has not been reached"
                    .to_string(),
                ctx: ctx_with_channel.clone().with_packet_commitment(
                    PortId::default(),
                    ChannelId::default(),
                    packet.sequence,
                    compute_packet_commitment(&msg_not_timed_out.packet),
                ),
                msg: msg_not_timed_out,
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::PacketTimeoutNotReached(_) => {}
                    _ => panic!("Expected PacketTimeoutNotReached, instead got {}", e),
                }),
            },
            Test {
                name: "Processing fails because the packet was never sent".to_string(),
                ctx: ctx_with_channel.clone(),
                msg: msg.clone(),
                want_pass: false,
                match_error: Box::new(|e| match e {
                    error::ErrorDetail::PacketCommitmentNotFound(_) => {}
                    _ => panic!("Expected PacketCommitmentNotFound, instead got {}", e),
                }),
            },
            Test {
                name: "Timeout by timestamp".to_string(),
                ctx: ctx_with_channel.clone().with_packet_commitment(
                    PortId::default(),
                    ChannelId::default(),
                    packet.sequence,
                    compute_packet_commitment(&msg_timestamp_only.packet),
                ),
                msg: msg_timestamp_only,
                want_pass: true,
                match_error: Box::new(|_| {}),
            },
            Test {
                name: "Good parameters Unordered channel".to_string(),
                ctx: ctx_with_channel.with_packet_commitment(
                    PortId::default(),
                    ChannelId::default(),
                    packet.sequence,
                    commitment,
                ),
                msg,
                want_pass: true,
                match_error: Box::new(|_| {}),
            },
        ]
        .into_iter()
        .collect();

        for test in tests {
            let res = process(&test.ctx, &test.msg);
            match res {
                Ok(_) => {
                    assert!(
                        test.want_pass,
                        "TO_packet: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "timeout_packet: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
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

    #[test]
    fn timeout_on_ordered_channel_proves_the_next_receive_sequence() {
        let proof_height = Height::new(0, 11).unwrap();

        let mut msg =
            MsgTimeout::try_from(get_dummy_raw_msg_timeout(11, 10, 0)).unwrap();
        let packet = msg.packet.clone();
        msg.proofs = build_proofs(
            get_store_proof(
                SeqRecvsPath(packet.destination_port.clone(), packet.destination_channel),
                msg.next_sequence_recv.to_be_bytes().to_vec(),
            ),
            None,
            proof_height,
        )
        .unwrap();

        let ctx = context(proof_height)
            .with_channel(
                PortId::default(),
                ChannelId::default(),
                channel_end(Order::Ordered),
            )
            .with_packet_commitment(
                PortId::default(),
                ChannelId::default(),
                packet.sequence,
                compute_packet_commitment(&packet),
            );

        assert!(process(&ctx, &msg).is_ok());

        // The counterparty already moved past the packet.
        let mut received = msg.clone();
        received.next_sequence_recv = 2.into();
        let err = process(&ctx, &received).err().unwrap();
        match err.detail() {
            error::ErrorDetail::PacketAlreadyReceived(e) => {
                assert_eq!(e.next_sequence_recv, 2.into())
            }
            e => panic!("Expected PacketAlreadyReceived, instead got {}", e),
        }

        // A receipt-absence proof does not prove the receive sequence.
        let unordered_proof = unordered_msg(proof_height, 10, 0);
        let mut wrong_proof = msg;
        wrong_proof.proofs = unordered_proof.proofs;
        let err = process(&ctx, &wrong_proof).err().unwrap();
        assert!(matches!(
            err.detail(),
            error::ErrorDetail::PacketVerificationFailed(_)
        ));
    }
}
