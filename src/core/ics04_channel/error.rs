use flex_error::{define_error, TraceError};

use super::channel::State;
use super::packet::Sequence;
use super::timeout::TimeoutHeight;
use crate::core::ics02_client::error as client_error;
use crate::core::ics03_connection::error as connection_error;
use crate::core::ics05_port::error as port_error;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::proofs::ProofError;
use crate::signer::SignerError;
use crate::timestamp::{ParseTimestampError, Timestamp};
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Ics02Client
            [ client_error::Error ]
            | _ | { "ics02 client error" },

        Ics03Connection
            [ connection_error::Error ]
            | _ | { "ics03 connection error" },

        Ics05Port
            [ port_error::Error ]
            | _ | { "ics05 port error" },

        Identifier
            [ ValidationError ]
            | _ | { "identifier error" },

        UnknownState
            { state: i32 }
            | e | { format_args!("channel state unknown: {}", e.state) },

        UnknownOrderType
            { type_id: String }
            | e | { format_args!("channel order type unknown: {}", e.type_id) },

        InvalidConnectionHopsLength
            { expected: usize, actual: usize }
            | e | {
                format_args!(
                    "invalid connection hops length: expected {0}; actual {1}",
                    e.expected, e.actual)
            },

        InvalidPacketCounterparty
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "packet port {0} and channel {1} don't match the channel's counterparty",
                    e.port_id, e.channel_id)
            },

        Signer
            [ SignerError ]
            | _ | { "invalid signer address" },

        InvalidProof
            [ ProofError ]
            | _ | { "invalid proof" },

        MissingHeight
            | _ | { "invalid proof: missing height" },

        ZeroPacketSequence
            | _ | { "packet sequence cannot be 0" },

        ZeroPacketData
            | _ | { "packet data bytes cannot be empty" },

        ZeroPacketTimeout
            | _ | { "packet timeout height and packet timeout timestamp cannot both be 0" },

        InvalidTimeoutHeight
            [ client_error::Error ]
            | _ | { "invalid timeout height for the packet" },

        InvalidPacketTimestamp
            [ ParseTimestampError ]
            | _ | { "invalid packet timeout timestamp value" },

        MissingPacket
            | _ | { "there is no packet in this message" },

        MissingCounterparty
            | _ | { "missing counterparty" },

        MissingChannel
            | _ | { "missing channel end" },

        InvalidCounterparty
            { reason: String }
            | e | { format_args!("invalid counterparty: {0}", e.reason) },

        InvalidCounterpartyChannelId
            {
                expected: Option<ChannelId>,
                actual: ChannelId,
            }
            | e | {
                format_args!(
                    "counterparty channel identifier {0} does not match the stored {1:?}",
                    e.actual, e.expected)
            },

        ChannelExists
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "the channel end ({0}, {1}) already exists",
                    e.port_id, e.channel_id)
            },

        ChannelNotFound
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "the channel end ({0}, {1}) does not exist",
                    e.port_id, e.channel_id)
            },

        InvalidChannel
            { reason: String }
            | e | { format_args!("invalid channel: {0}", e.reason) },

        InvalidChannelState
            { channel_id: ChannelId, state: State }
            | e | {
                format_args!(
                    "channel {0} should not be in state {1}",
                    e.channel_id, e.state)
            },

        ChannelClosed
            { channel_id: ChannelId }
            | e | {
                format_args!(
                    "channel {0} is closed",
                    e.channel_id)
            },

        ConnectionNotOpen
            { connection_id: ConnectionId }
            | e | {
                format_args!(
                    "the associated connection {0} is not OPEN",
                    e.connection_id)
            },

        InvalidChannelCapability
            { port_id: PortId, channel_id: ChannelId }
            [ port_error::Error ]
            | e | {
                format_args!(
                    "caller does not own the capability for channel ({0}, {1})",
                    e.port_id, e.channel_id)
            },

        InvalidPortCapability
            { port_id: PortId }
            | e | {
                format_args!(
                    "caller does not own the capability for port {0}",
                    e.port_id)
            },

        ChannelCapabilityNotFound
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!(
                    "no capability is registered for channel ({0}, {1})",
                    e.port_id, e.channel_id)
            },

        PacketVerificationFailed
            { sequence: Sequence }
            [ client_error::Error ]
            | e | {
                format_args!(
                    "verification fails for the packet with the sequence number {0}",
                    e.sequence)
            },

        VerifyChannelFailed
            [ client_error::Error ]
            | _ | { "error verifying channel state" },

        InvalidAcknowledgement
            | _ | { "acknowledgement cannot be empty" },

        AcknowledgementExists
            { sequence: Sequence }
            | e | {
                format_args!(
                    "packet acknowledgement exists for the packet with the sequence {0}",
                    e.sequence)
            },

        MissingNextSendSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!("missing sequence number for sending packets on port {0} and channel {1}",
                    e.port_id, e.channel_id)
            },

        MissingNextRecvSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!("missing sequence number for receiving packets on port {0} and channel {1}",
                    e.port_id, e.channel_id)
            },

        MissingNextAckSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!("missing sequence number for ack packets on port {0} and channel {1}",
                    e.port_id, e.channel_id)
            },

        MissingNextChannelSequence
            | _ | { "the next channel sequence is not initialised; the store is corrupted" },

        InvalidStringAsSequence
            { value: String }
            [ TraceError<core::num::ParseIntError> ]
            | e | {
                format_args!(
                    "string {0} cannot be converted to packet sequence",
                    e.value)
            },

        InvalidPacketSequence
            {
                given_sequence: Sequence,
                next_sequence: Sequence
            }
            | e | {
                format_args!(
                    "invalid packet sequence {0} != next sequence {1}",
                    e.given_sequence, e.next_sequence)
            },

        LowPacketHeight
            {
                chain_height: Height,
                timeout_height: TimeoutHeight
            }
            | e | {
                format_args!(
                    "chain height {0} >= packet timeout height {1}",
                    e.chain_height, e.timeout_height)
            },

        LowPacketTimestamp
            {
                chain_timestamp: Timestamp,
                timeout_timestamp: Timestamp
            }
            | e | {
                format_args!(
                    "chain timestamp {0} >= packet timeout timestamp {1}",
                    e.chain_timestamp, e.timeout_timestamp)
            },

        PacketTimeoutNotReached
            {
                timeout_height: TimeoutHeight,
                chain_height: Height,
                timeout_timestamp: Timestamp,
                chain_timestamp: Timestamp,
            }
            | e | {
                format_args!(
                    "packet timeout height {0} > counterparty height {1} and packet timeout timestamp {2} > counterparty timestamp {3}",
                    e.timeout_height, e.chain_height, e.timeout_timestamp, e.chain_timestamp)
            },

        FrozenClient
            { client_id: ClientId }
            | e | {
                format_args!(
                    "client with id {0} is frozen",
                    e.client_id)
            },

        PacketCommitmentNotFound
            { sequence: Sequence }
            | e | {
                format_args!(
                    "commitment for the packet {0} not found",
                    e.sequence)
            },

        IncorrectPacketCommitment
            { sequence: Sequence }
            | e | {
                format_args!(
                    "the stored commitment of the packet {0} is incorrect",
                    e.sequence)
            },

        PacketReceived
            { sequence: Sequence }
            | e | {
                format_args!(
                    "packet with the sequence {0} has already been received",
                    e.sequence)
            },

        PacketAlreadyReceived
            {
                sequence: Sequence,
                next_sequence_recv: Sequence,
            }
            | e | {
                format_args!(
                    "packet with the sequence {0} was received by the counterparty (next receive sequence {1})",
                    e.sequence, e.next_sequence_recv)
            },

        RedundantTx
            | _ | { "packet messages are redundant" },

        PacketAcknowledgementNotFound
            { sequence: Sequence }
            | e | {
                format_args!(
                    "acknowledgement for the packet {0} not found",
                    e.sequence)
            },

        InvalidPagination
            { reason: String }
            | e | { format_args!("invalid pagination request: {0}", e.reason) },

        InvalidStoredValue
            { path: String, reason: String }
            | e | {
                format_args!(
                    "the value stored under {0} cannot be decoded: {1}",
                    e.path, e.reason)
            },

        InvalidGenesis
            { reason: String }
            | e | { format_args!("invalid channel genesis state: {0}", e.reason) },

        AppModule
            { description: String }
            | e | {
                format_args!(
                    "application module error: {0}",
                    e.description)
            },

        SequenceOverflow
            { sequence: Sequence }
            | e | { format_args!("sequence {0} is the last one and cannot be advanced", e.sequence) },

        ImplementationSpecific
            | _ | { "implementation specific error" },
    }
}

impl ErrorDetail {
    /// Stable error code within the channel codespace. Errors raised by the neighbouring
    /// modules keep the code of their own codespace, see [`ErrorDetail::codespace`].
    pub fn code(&self) -> u32 {
        match self {
            ErrorDetail::Ics02Client(e) => e.source.code(),
            ErrorDetail::Ics03Connection(e) => e.source.code(),
            ErrorDetail::Ics05Port(e) => e.source.code(),
            ErrorDetail::ChannelExists(_) => 2,
            ErrorDetail::ChannelNotFound(_) => 3,
            ErrorDetail::InvalidChannel(_)
            | ErrorDetail::MissingChannel(_)
            | ErrorDetail::UnknownState(_)
            | ErrorDetail::VerifyChannelFailed(_)
            | ErrorDetail::InvalidStoredValue(_) => 4,
            ErrorDetail::InvalidChannelState(_)
            | ErrorDetail::ChannelClosed(_)
            | ErrorDetail::ConnectionNotOpen(_) => 5,
            ErrorDetail::UnknownOrderType(_) => 6,
            ErrorDetail::InvalidCounterparty(_) | ErrorDetail::MissingCounterparty(_) => 7,
            ErrorDetail::InvalidChannelCapability(_) | ErrorDetail::InvalidPortCapability(_) => 8,
            ErrorDetail::ChannelCapabilityNotFound(_) => 9,
            ErrorDetail::MissingNextSendSeq(_) => 10,
            ErrorDetail::MissingNextRecvSeq(_) => 11,
            ErrorDetail::MissingNextAckSeq(_) => 12,
            ErrorDetail::InvalidPacketCounterparty(_)
            | ErrorDetail::ZeroPacketSequence(_)
            | ErrorDetail::ZeroPacketData(_)
            | ErrorDetail::ZeroPacketTimeout(_)
            | ErrorDetail::InvalidTimeoutHeight(_)
            | ErrorDetail::InvalidPacketTimestamp(_)
            | ErrorDetail::MissingPacket(_)
            | ErrorDetail::InvalidStringAsSequence(_)
            | ErrorDetail::IncorrectPacketCommitment(_)
            | ErrorDetail::PacketVerificationFailed(_)
            | ErrorDetail::FrozenClient(_) => 13,
            ErrorDetail::LowPacketHeight(_)
            | ErrorDetail::LowPacketTimestamp(_)
            | ErrorDetail::PacketTimeoutNotReached(_) => 14,
            ErrorDetail::InvalidConnectionHopsLength(_) => 15,
            ErrorDetail::InvalidAcknowledgement(_) => 16,
            ErrorDetail::AcknowledgementExists(_) => 17,
            ErrorDetail::Identifier(_) | ErrorDetail::InvalidCounterpartyChannelId(_) => 18,
            ErrorDetail::PacketReceived(_) | ErrorDetail::PacketAlreadyReceived(_) => 19,
            ErrorDetail::PacketCommitmentNotFound(_)
            | ErrorDetail::PacketAcknowledgementNotFound(_) => 20,
            ErrorDetail::InvalidPacketSequence(_) => 21,
            ErrorDetail::RedundantTx(_) => 22,
            ErrorDetail::Signer(_)
            | ErrorDetail::InvalidProof(_)
            | ErrorDetail::MissingHeight(_)
            | ErrorDetail::MissingNextChannelSequence(_)
            | ErrorDetail::SequenceOverflow(_)
            | ErrorDetail::InvalidPagination(_)
            | ErrorDetail::InvalidGenesis(_)
            | ErrorDetail::AppModule(_)
            | ErrorDetail::ImplementationSpecific(_) => 1,
        }
    }

    /// The module whose code table [`ErrorDetail::code`] refers to.
    pub fn codespace(&self) -> &'static str {
        match self {
            ErrorDetail::Ics02Client(_) => "client",
            ErrorDetail::Ics03Connection(_) => "connection",
            ErrorDetail::Ics05Port(_) => "port",
            _ => "channel",
        }
    }
}

impl Error {
    pub fn code(&self) -> u32 {
        self.detail().code()
    }

    pub fn codespace(&self) -> &'static str {
        self.detail().codespace()
    }

    pub fn chan_open_confirm_proof_verification(e: Error) -> Error {
        e.add_trace(&"handshake proof verification fails at ChannelOpenConfirm")
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::Error;
    use crate::core::ics03_connection::error::Error as ConnectionError;
    use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};

    #[test]
    fn codes_are_stable() {
        let port_id = PortId::transfer();
        let channel_id = ChannelId::new(0);

        assert_eq!(
            Error::channel_exists(port_id.clone(), channel_id).code(),
            2
        );
        assert_eq!(
            Error::channel_not_found(port_id.clone(), channel_id).code(),
            3
        );
        assert_eq!(
            Error::missing_next_send_seq(port_id, channel_id).code(),
            10
        );
        assert_eq!(Error::zero_packet_data().code(), 13);
        assert_eq!(Error::redundant_tx().code(), 22);
        assert_eq!(Error::redundant_tx().codespace(), "channel");

        let wrapped = Error::ics03_connection(ConnectionError::connection_not_found(
            ConnectionId::default(),
        ));
        assert_eq!(wrapped.codespace(), "connection");
        assert_eq!(wrapped.code(), 3);
    }
}
