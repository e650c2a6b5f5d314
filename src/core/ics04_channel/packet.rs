use core::str::FromStr;

use ibc_proto::ibc::core::channel::v1::{Packet as RawPacket, PacketState as RawPacketState};
use serde_derive::{Deserialize, Serialize};

use super::handler::{
    acknowledgement::AckPacketResult, recv_packet::RecvPacketResult,
    send_packet::SendPacketResult, timeout_executed::TimeoutPacketResult,
    write_acknowledgement::WriteAckPacketResult,
};
use super::timeout::TimeoutHeight;
use crate::core::ics04_channel::error::Error;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::timestamp::{Expiry::Expired, Timestamp};
use crate::Height;

/// Enumeration of proof carrying ICS4 message, helper for relayer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketMsgType {
    Recv,
    Ack,
    TimeoutUnordered,
    TimeoutOrdered,
    TimeoutOnClose,
}

impl core::fmt::Display for PacketMsgType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PacketMsgType::Recv => write!(f, "(PacketMsgType::Recv)"),
            PacketMsgType::Ack => write!(f, "(PacketMsgType::Ack)"),
            PacketMsgType::TimeoutUnordered => write!(f, "(PacketMsgType::TimeoutUnordered)"),
            PacketMsgType::TimeoutOrdered => write!(f, "(PacketMsgType::TimeoutOrdered)"),
            PacketMsgType::TimeoutOnClose => write!(f, "(PacketMsgType::TimeoutOnClose)"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum PacketResult {
    Send(SendPacketResult),
    Recv(RecvPacketResult),
    WriteAck(WriteAckPacketResult),
    Ack(AckPacketResult),
    Timeout(TimeoutPacketResult),
}

/// Receiver-side marker that an unordered packet was received. Stored as the single byte `0x01`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receipt {
    Ok,
}

impl Receipt {
    pub const SENTINEL: u8 = 1;

    pub fn as_bytes(&self) -> Vec<u8> {
        vec![Self::SENTINEL]
    }
}

/// The sequence number of a packet enforces ordering among packets from the same source.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
pub struct Sequence(u64);

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.parse::<u64>().map_err(|e| {
            Error::invalid_string_as_sequence(s.to_string(), e)
        })?))
    }
}

impl Sequence {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn increment(&self) -> Result<Sequence, Error> {
        self.0
            .checked_add(1)
            .map(Sequence)
            .ok_or_else(|| Error::sequence_overflow(*self))
    }

    /// Big-endian encoding, the form in which sequence counters are stored.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 8] = bytes.try_into().ok()?;
        Some(Self(u64::from_be_bytes(array)))
    }
}

impl From<u64> for Sequence {
    fn from(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl From<Sequence> for u64 {
    fn from(s: Sequence) -> u64 {
        s.0
    }
}

impl core::fmt::Display for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Default, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct Packet {
    pub sequence: Sequence,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub destination_port: PortId,
    pub destination_channel: ChannelId,
    #[serde(
        serialize_with = "crate::serializers::ser_hex_upper",
        deserialize_with = "crate::serializers::deser_hex_upper"
    )]
    pub data: Vec<u8>,
    pub timeout_height: TimeoutHeight,
    pub timeout_timestamp: Timestamp,
}

struct PacketData<'a>(&'a [u8]);

impl<'a> core::fmt::Debug for PacketData<'a> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(formatter, "{:?}", self.0)
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        // Remember: if you alter the definition of `Packet`,
        // 1. update the formatter debug struct builder calls (return object of
        //    this function)
        // 2. update this destructuring assignment accordingly
        let Packet {
            sequence: _,
            source_port: _,
            source_channel: _,
            destination_port: _,
            destination_channel: _,
            data,
            timeout_height: _,
            timeout_timestamp: _,
        } = self;
        let data_wrapper = PacketData(data);

        formatter
            .debug_struct("Packet")
            .field("sequence", &self.sequence)
            .field("source_port", &self.source_port)
            .field("source_channel", &self.source_channel)
            .field("destination_port", &self.destination_port)
            .field("destination_channel", &self.destination_channel)
            .field("data", &data_wrapper)
            .field("timeout_height", &self.timeout_height)
            .field("timeout_timestamp", &self.timeout_timestamp)
            .finish()
    }
}

impl Packet {
    /// Checks whether the packet is timed-out relative to the current state of the
    /// destination chain, given its timestamp `dst_chain_ts` and height `dst_chain_height`.
    ///
    /// A timed-out packet should be relayed as a
    /// [`MsgTimeout`](crate::core::ics04_channel::msgs::timeout::MsgTimeout) instead of a
    /// [`MsgRecvPacket`](crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket).
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout_height.has_expired(dst_chain_height)
            || (self.timeout_timestamp.is_set()
                && dst_chain_ts.check_expiry(&self.timeout_timestamp) == Expired)
    }

    /// Stateless validity: a non-zero sequence, at least one timeout and non-empty data.
    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.sequence.is_zero() {
            return Err(Error::zero_packet_sequence());
        }
        if !self.timeout_height.is_set() && !self.timeout_timestamp.is_set() {
            return Err(Error::zero_packet_timeout());
        }
        if self.data.is_empty() {
            return Err(Error::zero_packet_data());
        }
        Ok(())
    }
}

/// Custom display output to omit the packet data
impl core::fmt::Display for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "seq:{}, path:{}/{}->{}/{}, toh:{}, tos:{})",
            self.sequence,
            self.source_channel,
            self.source_port,
            self.destination_channel,
            self.destination_port,
            self.timeout_height,
            self.timeout_timestamp
        )
    }
}

impl TryFrom<RawPacket> for Packet {
    type Error = Error;

    fn try_from(raw_pkt: RawPacket) -> Result<Self, Self::Error> {
        let timeout_height = TimeoutHeight::try_from(raw_pkt.timeout_height)
            .map_err(Error::invalid_timeout_height)?;

        let timeout_timestamp = Timestamp::from_nanoseconds(raw_pkt.timeout_timestamp)
            .map_err(Error::invalid_packet_timestamp)?;

        let packet = Packet {
            sequence: Sequence::from(raw_pkt.sequence),
            source_port: raw_pkt.source_port.parse().map_err(Error::identifier)?,
            source_channel: raw_pkt.source_channel.parse().map_err(Error::identifier)?,
            destination_port: raw_pkt
                .destination_port
                .parse()
                .map_err(Error::identifier)?,
            destination_channel: raw_pkt
                .destination_channel
                .parse()
                .map_err(Error::identifier)?,
            data: raw_pkt.data,
            timeout_height,
            timeout_timestamp,
        };

        packet.validate_basic()?;

        Ok(packet)
    }
}

impl From<Packet> for RawPacket {
    fn from(packet: Packet) -> Self {
        RawPacket {
            sequence: packet.sequence.0,
            source_port: packet.source_port.to_string(),
            source_channel: packet.source_channel.to_string(),
            destination_port: packet.destination_port.to_string(),
            destination_channel: packet.destination_channel.to_string(),
            data: packet.data,
            timeout_height: packet.timeout_height.into(),
            timeout_timestamp: packet.timeout_timestamp.nanoseconds(),
        }
    }
}

/// A piece of packet state (commitment, receipt or acknowledgement) together with its location,
/// as exported in the genesis state and returned by paginated queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketState {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
    #[serde(
        serialize_with = "crate::serializers::ser_hex_upper",
        deserialize_with = "crate::serializers::deser_hex_upper"
    )]
    pub data: Vec<u8>,
}

impl TryFrom<RawPacketState> for PacketState {
    type Error = Error;

    fn try_from(raw: RawPacketState) -> Result<Self, Self::Error> {
        Ok(PacketState {
            port_id: raw.port_id.parse().map_err(Error::identifier)?,
            channel_id: raw.channel_id.parse().map_err(Error::identifier)?,
            sequence: raw.sequence.into(),
            data: raw.data,
        })
    }
}

impl From<PacketState> for RawPacketState {
    fn from(state: PacketState) -> Self {
        RawPacketState {
            port_id: state.port_id.to_string(),
            channel_id: state.channel_id.to_string(),
            sequence: state.sequence.into(),
            data: state.data,
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
    use ibc_proto::ibc::core::client::v1::Height as RawHeight;

    use crate::core::ics24_host::identifier::{ChannelId, PortId};

    /// Returns a dummy `RawPacket`, for testing only!
    pub fn get_dummy_raw_packet(timeout_height: u64, timeout_timestamp: u64) -> RawPacket {
        RawPacket {
            sequence: 1,
            source_port: PortId::default().to_string(),
            source_channel: ChannelId::default().to_string(),
            destination_port: PortId::default().to_string(),
            destination_channel: ChannelId::default().to_string(),
            data: vec![0],
            timeout_height: Some(RawHeight {
                revision_number: 0,
                revision_height: timeout_height,
            }),
            timeout_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
    use test_log::test;

    use super::Sequence;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::Packet;
    use crate::core::ics04_channel::timeout::TimeoutHeight;
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn packet_try_from_raw() {
        struct Test {
            name: String,
            raw: RawPacket,
            want_pass: bool,
        }

        let proof_height = 10;
        let default_raw_msg = get_dummy_raw_packet(proof_height, 0);

        let tests: Vec<Test> = vec![
            Test {
                name: "Good parameters".to_string(),
                raw: default_raw_msg.clone(),
                want_pass: true,
            },
            Test {
                name: "Src port validation: correct".to_string(),
                raw: RawPacket {
                    source_port: "srcportp34".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: true,
            },
            Test {
                name: "Bad src port, name too short".to_string(),
                raw: RawPacket {
                    source_port: "p".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Bad dst port, name too long".to_string(),
                raw: RawPacket {
                    destination_port: "abcdefghijasdfasdfasdfasdfasdfasdfasdfasdfasdfasdfadgasgasdfasdfasdfasdfaklmnopqrstuabcdefghijasdfasdfasdfasdfasdfasdfasdfasdfasdfasdfadgasgasdfas".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Src channel validation: correct".to_string(),
                raw: RawPacket {
                    source_channel: "channel-1".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: true,
            },
            Test {
                name: "Bad src channel, not of the form channel-<N>".to_string(),
                raw: RawPacket {
                    source_channel: "chan-1".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Bad dst channel, leading zero".to_string(),
                raw: RawPacket {
                    destination_channel: "channel-034".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Bad dst channel, counter overflows u64".to_string(),
                raw: RawPacket {
                    destination_channel: "channel-18446744073709551616".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Zero sequence".to_string(),
                raw: RawPacket {
                    sequence: 0,
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Empty data".to_string(),
                raw: RawPacket {
                    data: vec![],
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Both timeouts zero".to_string(),
                raw: get_dummy_raw_packet(0, 0),
                want_pass: false,
            },
            Test {
                name: "Only timeout timestamp set".to_string(),
                raw: get_dummy_raw_packet(0, 1_000),
                want_pass: true,
            },
            Test {
                name: "Missing timeout height with a timestamp".to_string(),
                raw: RawPacket {
                    timeout_height: None,
                    timeout_timestamp: 1_000,
                    ..default_raw_msg
                },
                want_pass: true,
            },
        ];

        for test in tests {
            let res_msg = Packet::try_from(test.raw.clone());

            assert_eq!(
                test.want_pass,
                res_msg.is_ok(),
                "Packet::try_from failed for test {}, \nraw packet {:?} with error {:?}",
                test.name,
                test.raw,
                res_msg.err(),
            );
        }
    }

    #[test]
    fn to_and_from() {
        let raw = get_dummy_raw_packet(15, 0);
        let msg = Packet::try_from(raw.clone()).unwrap();
        let raw_back = RawPacket::from(msg.clone());
        let msg_back = Packet::try_from(raw_back.clone()).unwrap();
        assert_eq!(raw, raw_back);
        assert_eq!(msg, msg_back);
    }

    #[test]
    fn timed_out_relative_to_destination() {
        let packet = Packet {
            timeout_height: TimeoutHeight::At(Height::new(0, 10).unwrap()),
            timeout_timestamp: Timestamp::from_nanoseconds(500).unwrap(),
            ..Default::default()
        };
        let early = Timestamp::from_nanoseconds(100).unwrap();
        let late = Timestamp::from_nanoseconds(500).unwrap();

        assert!(!packet.timed_out(&early, Height::new(0, 9).unwrap()));
        assert!(packet.timed_out(&early, Height::new(0, 10).unwrap()));
        assert!(packet.timed_out(&late, Height::new(0, 1).unwrap()));
    }

    #[test]
    fn sequence_store_encoding() {
        let seq = Sequence::from(258);
        assert_eq!(seq.to_be_bytes(), [0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(Sequence::from_be_slice(&seq.to_be_bytes()), Some(seq));
        assert_eq!(Sequence::from_be_slice(&[1, 2]), None);
    }
}
