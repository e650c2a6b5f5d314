//! Admission-time filter that keeps competing relayers from paying for packets another relayer
//! already delivered.

use ibc_proto::google::protobuf::Any;
use tracing::debug;

use crate::core::ics02_client::msgs::ClientMsg;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error as ChannelError;
use crate::core::ics04_channel::msgs::PacketMsg;
use crate::core::ics26_routing::error::Error;
use crate::core::ics26_routing::msgs::Ics26Envelope;

/// The phase of transaction processing the host is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// A new transaction is checked before entering the mempool.
    CheckTx,
    /// A mempool transaction is checked again after a block was committed.
    ReCheckTx,
    /// The transaction is executed as part of a block.
    DeliverTx,
}

impl ExecMode {
    pub fn is_check(&self) -> bool {
        matches!(self, ExecMode::CheckTx | ExecMode::ReCheckTx)
    }
}

/// Whether the effect of `msg` is already in the store. Only packet messages can be.
fn is_redundant<Ctx: ChannelReader + ?Sized>(ctx: &Ctx, msg: &PacketMsg) -> bool {
    match msg {
        PacketMsg::RecvPacket(msg) => ctx
            .get_packet_receipt(
                &msg.packet.destination_port,
                &msg.packet.destination_channel,
                msg.packet.sequence,
            )
            .is_some(),
        PacketMsg::AckPacket(msg) => ctx
            .get_packet_commitment(
                &msg.packet.source_port,
                &msg.packet.source_channel,
                msg.packet.sequence,
            )
            .is_none(),
        PacketMsg::TimeoutPacket(msg) => ctx
            .get_packet_commitment(
                &msg.packet.source_port,
                &msg.packet.source_channel,
                msg.packet.sequence,
            )
            .is_none(),
        PacketMsg::TimeoutOnClosePacket(msg) => ctx
            .get_packet_commitment(
                &msg.packet.source_port,
                &msg.packet.source_channel,
                msg.packet.sequence,
            )
            .is_none(),
    }
}

/// Rejects `msgs` with [`RedundantTx`](crate::core::ics04_channel::error::ErrorDetail::RedundantTx)
/// iff they hold at least one packet message and every packet message is redundant.
///
/// Client updates are neutral. Any other message admits the whole batch.
pub fn check_redundant_relay<Ctx>(ctx: &Ctx, msgs: &[Ics26Envelope]) -> Result<(), ChannelError>
where
    Ctx: ChannelReader + ?Sized,
{
    let mut packet_msgs = 0usize;
    let mut redundancies = 0usize;

    for msg in msgs {
        match msg {
            Ics26Envelope::Ics4PacketMsg(msg) => {
                packet_msgs += 1;
                if is_redundant(ctx, msg) {
                    redundancies += 1;
                }
            }
            Ics26Envelope::Ics2Msg(ClientMsg::UpdateClient(_)) => {}
            Ics26Envelope::Ics4ChannelMsg(_) => return Ok(()),
        }
    }

    if packet_msgs > 0 && redundancies == packet_msgs {
        debug!(packet_msgs, "rejecting transaction: every packet message is redundant");
        return Err(ChannelError::redundant_tx());
    }
    Ok(())
}

/// Ante decorator running [`check_redundant_relay`] on the messages of a transaction.
///
/// The check only runs while checking transactions for the mempool and never when simulating.
#[derive(Clone, Debug, Default)]
pub struct RedundantRelayDecorator;

impl RedundantRelayDecorator {
    pub fn ante_handle<Ctx>(
        &self,
        ctx: &Ctx,
        tx_msgs: &[Any],
        mode: ExecMode,
        simulate: bool,
    ) -> Result<(), Error>
    where
        Ctx: ChannelReader + ?Sized,
    {
        if !mode.is_check() || simulate {
            return Ok(());
        }

        let mut envelopes = Vec::with_capacity(tx_msgs.len());
        for any_msg in tx_msgs {
            match Ics26Envelope::try_from(any_msg.clone()) {
                Ok(envelope) => envelopes.push(envelope),
                // Not an IBC message: the transaction does more than relaying.
                Err(e) if e.is_unknown_type_url() => return Ok(()),
                Err(e) => return Err(e),
            }
        }

        check_redundant_relay(ctx, &envelopes).map_err(Error::ics04_channel)
    }
}
