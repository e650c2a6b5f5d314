use ibc_proto::google::protobuf::Any;
use ibc_proto::ibc::core::client::v1::MsgUpdateClient as RawMsgUpdateClient;
use prost::Message;

use crate::core::ics02_client::msgs::{ClientMsg, MsgUpdateClient, UPDATE_CLIENT_TYPE_URL};
use crate::core::ics04_channel::error::Error as ChannelError;
use crate::core::ics04_channel::msgs::{
    acknowledgement, chan_close_confirm, chan_close_init, chan_open_ack, chan_open_confirm,
    chan_open_init, chan_open_try, recv_packet, timeout, timeout_on_close, ChannelMsg, PacketMsg,
};
use crate::core::ics26_routing::error::Error;
use crate::tx_msg::Msg;

/// Enumeration of all messages that the local ICS26 module is capable of routing.
#[derive(Clone, Debug, PartialEq)]
pub enum Ics26Envelope {
    Ics2Msg(ClientMsg),
    Ics4ChannelMsg(ChannelMsg),
    Ics4PacketMsg(PacketMsg),
}

impl TryFrom<Any> for Ics26Envelope {
    type Error = Error;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        match any_msg.type_url.as_str() {
            // ICS2 messages
            UPDATE_CLIENT_TYPE_URL => {
                let raw = decode::<RawMsgUpdateClient>(&any_msg.value)?;
                let domain_msg = MsgUpdateClient::try_from(raw).map_err(Error::ics02_client)?;
                Ok(Ics26Envelope::Ics2Msg(ClientMsg::UpdateClient(domain_msg)))
            }

            // ICS4 channel messages
            chan_open_init::TYPE_URL => {
                let domain_msg = channel_msg::<chan_open_init::MsgChannelOpenInit>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenInit(
                    domain_msg,
                )))
            }
            chan_open_try::TYPE_URL => {
                let domain_msg = channel_msg::<chan_open_try::MsgChannelOpenTry>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenTry(
                    domain_msg,
                )))
            }
            chan_open_ack::TYPE_URL => {
                let domain_msg = channel_msg::<chan_open_ack::MsgChannelOpenAck>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenAck(
                    domain_msg,
                )))
            }
            chan_open_confirm::TYPE_URL => {
                let domain_msg =
                    channel_msg::<chan_open_confirm::MsgChannelOpenConfirm>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(
                    ChannelMsg::ChannelOpenConfirm(domain_msg),
                ))
            }
            chan_close_init::TYPE_URL => {
                let domain_msg = channel_msg::<chan_close_init::MsgChannelCloseInit>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelCloseInit(
                    domain_msg,
                )))
            }
            chan_close_confirm::TYPE_URL => {
                let domain_msg =
                    channel_msg::<chan_close_confirm::MsgChannelCloseConfirm>(&any_msg)?;
                Ok(Ics26Envelope::Ics4ChannelMsg(
                    ChannelMsg::ChannelCloseConfirm(domain_msg),
                ))
            }

            // ICS4 packet messages
            recv_packet::TYPE_URL => {
                let domain_msg = channel_msg::<recv_packet::MsgRecvPacket>(&any_msg)?;
                Ok(Ics26Envelope::Ics4PacketMsg(PacketMsg::RecvPacket(
                    domain_msg,
                )))
            }
            acknowledgement::TYPE_URL => {
                let domain_msg = channel_msg::<acknowledgement::MsgAcknowledgement>(&any_msg)?;
                Ok(Ics26Envelope::Ics4PacketMsg(PacketMsg::AckPacket(
                    domain_msg,
                )))
            }
            timeout::TYPE_URL => {
                let domain_msg = channel_msg::<timeout::MsgTimeout>(&any_msg)?;
                Ok(Ics26Envelope::Ics4PacketMsg(PacketMsg::TimeoutPacket(
                    domain_msg,
                )))
            }
            timeout_on_close::TYPE_URL => {
                let domain_msg = channel_msg::<timeout_on_close::MsgTimeoutOnClose>(&any_msg)?;
                Ok(Ics26Envelope::Ics4PacketMsg(
                    PacketMsg::TimeoutOnClosePacket(domain_msg),
                ))
            }

            _ => Err(Error::unknown_message_type_url(any_msg.type_url)),
        }
    }
}

fn decode<R: Message + Default>(bytes: &[u8]) -> Result<R, Error> {
    R::decode(bytes).map_err(Error::malformed_message_bytes)
}

/// Decodes an ICS4 message from its raw protobuf form.
fn channel_msg<M>(any_msg: &Any) -> Result<M, Error>
where
    M: Msg + TryFrom<<M as Msg>::Raw, Error = ChannelError>,
    <M as Msg>::Raw: Default,
{
    let raw = decode::<<M as Msg>::Raw>(&any_msg.value)?;
    M::try_from(raw).map_err(Error::ics04_channel)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use ibc_proto::google::protobuf::Any;

    use super::Ics26Envelope;
    use crate::core::ics04_channel::msgs::recv_packet::test_util::get_dummy_raw_msg_recv_packet;
    use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics26_routing::error::ErrorDetail;
    use crate::tx_msg::Msg;

    #[test]
    fn envelopes_are_picked_by_type_url() {
        let msg = MsgRecvPacket::try_from(get_dummy_raw_msg_recv_packet(15)).unwrap();
        let envelope = Ics26Envelope::try_from(msg.clone().to_any()).unwrap();
        assert_eq!(
            envelope,
            Ics26Envelope::Ics4PacketMsg(PacketMsg::RecvPacket(msg))
        );

        let unknown = Any {
            type_url: "/ibc.core.connection.v1.MsgConnectionOpenInit".to_string(),
            value: vec![],
        };
        let err = Ics26Envelope::try_from(unknown).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnknownMessageTypeUrl(_)));

        let garbage = Any {
            type_url: crate::core::ics04_channel::msgs::recv_packet::TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };
        assert!(Ics26Envelope::try_from(garbage).is_err());
    }
}
