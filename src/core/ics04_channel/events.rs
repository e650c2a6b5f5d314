//! Types for the IBC events emitted by the channels module.
//!
//! Event type strings and attribute keys are read by relayers and must not change.

use core::str::FromStr;

use serde_derive::Serialize;
use subtle_encoding::hex;

use crate::core::ics04_channel::channel::Order;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::events::{AbciEvent, Error as EventError, EventAttribute, IbcEvent, IbcEventType};
use crate::timestamp::Timestamp;

/// Channel event attribute keys
pub const CONNECTION_ID_ATTRIBUTE_KEY: &str = "connection_id";
pub const CHANNEL_ID_ATTRIBUTE_KEY: &str = "channel_id";
pub const PORT_ID_ATTRIBUTE_KEY: &str = "port_id";
pub const COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY: &str = "counterparty_channel_id";
pub const COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY: &str = "counterparty_port_id";

/// Packet event attribute keys
pub const PKT_SEQ_ATTRIBUTE_KEY: &str = "packet_sequence";
pub const PKT_DATA_ATTRIBUTE_KEY: &str = "packet_data";
pub const PKT_DATA_HEX_ATTRIBUTE_KEY: &str = "packet_data_hex";
pub const PKT_SRC_PORT_ATTRIBUTE_KEY: &str = "packet_src_port";
pub const PKT_SRC_CHANNEL_ATTRIBUTE_KEY: &str = "packet_src_channel";
pub const PKT_DST_PORT_ATTRIBUTE_KEY: &str = "packet_dst_port";
pub const PKT_DST_CHANNEL_ATTRIBUTE_KEY: &str = "packet_dst_channel";
pub const PKT_CHANNEL_ORDERING_ATTRIBUTE_KEY: &str = "packet_channel_ordering";
pub const PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY: &str = "packet_timeout_height";
pub const PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "packet_timeout_timestamp";
pub const PKT_ACK_ATTRIBUTE_KEY: &str = "packet_ack";
pub const PKT_ACK_HEX_ATTRIBUTE_KEY: &str = "packet_ack_hex";
pub const PKT_CONNECTION_ID_ATTRIBUTE_KEY: &str = "packet_connection";

/// The attributes shared by every handshake event.
#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attributes {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
    pub connection_id: ConnectionId,
    pub counterparty_port_id: PortId,
    pub counterparty_channel_id: Option<ChannelId>,
}

impl Attributes {
    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }
    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

/// Unset channel identifiers are emitted as empty strings.
impl From<Attributes> for Vec<EventAttribute> {
    fn from(a: Attributes) -> Self {
        let opt_to_string = |id: Option<ChannelId>| id.map(|id| id.to_string()).unwrap_or_default();

        vec![
            EventAttribute::new(PORT_ID_ATTRIBUTE_KEY, a.port_id.to_string()),
            EventAttribute::new(CHANNEL_ID_ATTRIBUTE_KEY, opt_to_string(a.channel_id)),
            EventAttribute::new(
                COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY,
                a.counterparty_port_id.to_string(),
            ),
            EventAttribute::new(
                COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY,
                opt_to_string(a.counterparty_channel_id),
            ),
            EventAttribute::new(CONNECTION_ID_ATTRIBUTE_KEY, a.connection_id.to_string()),
        ]
    }
}

fn required<'a>(abci_event: &'a AbciEvent, key: &str) -> Result<&'a str, EventError> {
    abci_event
        .attribute(key)
        .ok_or_else(|| EventError::missing_key(key.to_string()))
}

fn optional_channel_id(value: &str) -> Result<Option<ChannelId>, EventError> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some).map_err(EventError::parse)
    }
}

pub(crate) fn channel_attributes_from_abci(
    abci_event: &AbciEvent,
) -> Result<Attributes, EventError> {
    Ok(Attributes {
        port_id: required(abci_event, PORT_ID_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        channel_id: optional_channel_id(required(abci_event, CHANNEL_ID_ATTRIBUTE_KEY)?)?,
        connection_id: required(abci_event, CONNECTION_ID_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        counterparty_port_id: required(abci_event, COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        counterparty_channel_id: optional_channel_id(required(
            abci_event,
            COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY,
        )?)?,
    })
}

macro_rules! impl_channel_event {
    ($($event:ident => $variant:ident),* $(,)?) => {
        $(
            #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
            pub struct $event(Attributes);

            impl $event {
                pub fn attributes(&self) -> &Attributes {
                    &self.0
                }
                pub fn port_id(&self) -> &PortId {
                    &self.0.port_id
                }
                pub fn channel_id(&self) -> Option<&ChannelId> {
                    self.0.channel_id.as_ref()
                }
                pub fn counterparty_port_id(&self) -> &PortId {
                    &self.0.counterparty_port_id
                }
                pub fn counterparty_channel_id(&self) -> Option<&ChannelId> {
                    self.0.counterparty_channel_id.as_ref()
                }
                pub fn connection_id(&self) -> &ConnectionId {
                    &self.0.connection_id
                }
            }

            impl From<Attributes> for $event {
                fn from(attrs: Attributes) -> Self {
                    Self(attrs)
                }
            }

            impl From<$event> for IbcEvent {
                fn from(v: $event) -> Self {
                    IbcEvent::$variant(v)
                }
            }

            impl From<$event> for AbciEvent {
                fn from(v: $event) -> Self {
                    AbciEvent {
                        type_str: IbcEventType::$variant.as_str().to_string(),
                        attributes: v.0.into(),
                    }
                }
            }
        )*
    };
}

impl_channel_event! {
    OpenInit => OpenInitChannel,
    OpenTry => OpenTryChannel,
    OpenAck => OpenAckChannel,
    OpenConfirm => OpenConfirmChannel,
    CloseInit => CloseInitChannel,
    CloseConfirm => CloseConfirmChannel,
}

/// The packet attributes carried by every packet event. Data is emitted twice: lossily as
/// UTF-8 for display and hex-encoded for exact recovery.
fn packet_attributes(
    packet: Packet,
    channel_ordering: Order,
    connection_id: &ConnectionId,
) -> Vec<EventAttribute> {
    let data_hex = String::from_utf8(hex::encode(&packet.data)).unwrap_or_default();

    vec![
        EventAttribute::new(
            PKT_DATA_ATTRIBUTE_KEY,
            String::from_utf8_lossy(&packet.data).into_owned(),
        ),
        EventAttribute::new(PKT_DATA_HEX_ATTRIBUTE_KEY, data_hex),
        EventAttribute::new(
            PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY,
            String::from(packet.timeout_height),
        ),
        EventAttribute::new(
            PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
            packet.timeout_timestamp.nanoseconds().to_string(),
        ),
        EventAttribute::new(PKT_SEQ_ATTRIBUTE_KEY, packet.sequence.to_string()),
        EventAttribute::new(PKT_SRC_PORT_ATTRIBUTE_KEY, packet.source_port.to_string()),
        EventAttribute::new(
            PKT_SRC_CHANNEL_ATTRIBUTE_KEY,
            packet.source_channel.to_string(),
        ),
        EventAttribute::new(
            PKT_DST_PORT_ATTRIBUTE_KEY,
            packet.destination_port.to_string(),
        ),
        EventAttribute::new(
            PKT_DST_CHANNEL_ATTRIBUTE_KEY,
            packet.destination_channel.to_string(),
        ),
        EventAttribute::new(PKT_CHANNEL_ORDERING_ATTRIBUTE_KEY, channel_ordering.as_str()),
        EventAttribute::new(PKT_CONNECTION_ID_ATTRIBUTE_KEY, connection_id.to_string()),
    ]
}

fn decode_hex(value: &str) -> Result<Vec<u8>, EventError> {
    hex::decode(value).map_err(|e| EventError::decode(e.to_string()))
}

fn packet_from_abci(abci_event: &AbciEvent) -> Result<(Packet, Order, ConnectionId), EventError> {
    let timeout_height = match required(abci_event, PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY)? {
        "0-0" => TimeoutHeight::Never,
        height => TimeoutHeight::At(height.parse().map_err(EventError::height)?),
    };

    let packet = Packet {
        sequence: Sequence::from_str(required(abci_event, PKT_SEQ_ATTRIBUTE_KEY)?)
            .map_err(EventError::channel)?,
        source_port: required(abci_event, PKT_SRC_PORT_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        source_channel: required(abci_event, PKT_SRC_CHANNEL_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        destination_port: required(abci_event, PKT_DST_PORT_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        destination_channel: required(abci_event, PKT_DST_CHANNEL_ATTRIBUTE_KEY)?
            .parse()
            .map_err(EventError::parse)?,
        data: decode_hex(required(abci_event, PKT_DATA_HEX_ATTRIBUTE_KEY)?)?,
        timeout_height,
        timeout_timestamp: Timestamp::from_str(required(
            abci_event,
            PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
        )?)
        .map_err(EventError::timestamp)?,
    };

    let ordering = Order::from_str(required(abci_event, PKT_CHANNEL_ORDERING_ATTRIBUTE_KEY)?)
        .map_err(EventError::channel)?;

    let connection_id = required(abci_event, PKT_CONNECTION_ID_ATTRIBUTE_KEY)?
        .parse()
        .map_err(EventError::parse)?;

    Ok((packet, ordering, connection_id))
}

macro_rules! impl_packet_event {
    ($($event:ident => $variant:ident / $event_type:ident),* $(,)?) => {
        $(
            #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
            pub struct $event {
                pub packet: Packet,
                pub channel_ordering: Order,
                pub connection_id: ConnectionId,
            }

            impl $event {
                pub fn new(
                    packet: Packet,
                    channel_ordering: Order,
                    connection_id: ConnectionId,
                ) -> Self {
                    Self {
                        packet,
                        channel_ordering,
                        connection_id,
                    }
                }
                pub fn src_port_id(&self) -> &PortId {
                    &self.packet.source_port
                }
                pub fn src_channel_id(&self) -> &ChannelId {
                    &self.packet.source_channel
                }
                pub fn dst_port_id(&self) -> &PortId {
                    &self.packet.destination_port
                }
                pub fn dst_channel_id(&self) -> &ChannelId {
                    &self.packet.destination_channel
                }
            }

            impl core::fmt::Display for $event {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
                    write!(f, "{} {}", IbcEventType::$event_type.as_str(), self.packet)
                }
            }

            impl From<$event> for IbcEvent {
                fn from(v: $event) -> Self {
                    IbcEvent::$variant(v)
                }
            }

            impl From<$event> for AbciEvent {
                fn from(v: $event) -> Self {
                    AbciEvent {
                        type_str: IbcEventType::$event_type.as_str().to_string(),
                        attributes: packet_attributes(
                            v.packet,
                            v.channel_ordering,
                            &v.connection_id,
                        ),
                    }
                }
            }

            impl TryFrom<&AbciEvent> for $event {
                type Error = EventError;

                fn try_from(abci_event: &AbciEvent) -> Result<Self, Self::Error> {
                    let (packet, channel_ordering, connection_id) = packet_from_abci(abci_event)?;
                    Ok(Self::new(packet, channel_ordering, connection_id))
                }
            }
        )*
    };
}

impl_packet_event! {
    SendPacket => SendPacket / SendPacket,
    ReceivePacket => ReceivePacket / ReceivePacket,
    AcknowledgePacket => AcknowledgePacket / AckPacket,
    TimeoutPacket => TimeoutPacket / Timeout,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    pub packet: Packet,
    #[serde(serialize_with = "crate::serializers::ser_hex_upper")]
    pub ack: Vec<u8>,
    pub channel_ordering: Order,
    pub connection_id: ConnectionId,
}

impl WriteAcknowledgement {
    pub fn new(
        packet: Packet,
        ack: Vec<u8>,
        channel_ordering: Order,
        connection_id: ConnectionId,
    ) -> Self {
        Self {
            packet,
            ack,
            channel_ordering,
            connection_id,
        }
    }

    pub fn src_port_id(&self) -> &PortId {
        &self.packet.source_port
    }
    pub fn src_channel_id(&self) -> &ChannelId {
        &self.packet.source_channel
    }
    pub fn dst_port_id(&self) -> &PortId {
        &self.packet.destination_port
    }
    pub fn dst_channel_id(&self) -> &ChannelId {
        &self.packet.destination_channel
    }
}

impl core::fmt::Display for WriteAcknowledgement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "{} {} ack: {}",
            IbcEventType::WriteAck.as_str(),
            self.packet,
            String::from_utf8_lossy(&self.ack)
        )
    }
}

impl From<WriteAcknowledgement> for IbcEvent {
    fn from(v: WriteAcknowledgement) -> Self {
        IbcEvent::WriteAcknowledgement(v)
    }
}

impl From<WriteAcknowledgement> for AbciEvent {
    fn from(v: WriteAcknowledgement) -> Self {
        let mut attributes = packet_attributes(v.packet, v.channel_ordering, &v.connection_id);
        let ack_hex = String::from_utf8(hex::encode(&v.ack)).unwrap_or_default();
        attributes.push(EventAttribute::new(
            PKT_ACK_ATTRIBUTE_KEY,
            String::from_utf8_lossy(&v.ack).into_owned(),
        ));
        attributes.push(EventAttribute::new(PKT_ACK_HEX_ATTRIBUTE_KEY, ack_hex));
        AbciEvent {
            type_str: IbcEventType::WriteAck.as_str().to_string(),
            attributes,
        }
    }
}

impl TryFrom<&AbciEvent> for WriteAcknowledgement {
    type Error = EventError;

    fn try_from(abci_event: &AbciEvent) -> Result<Self, Self::Error> {
        let (packet, channel_ordering, connection_id) = packet_from_abci(abci_event)?;
        let ack = decode_hex(required(abci_event, PKT_ACK_HEX_ATTRIBUTE_KEY)?)?;
        if ack.is_empty() {
            return Err(EventError::channel(Error::invalid_acknowledgement()));
        }
        Ok(Self::new(packet, ack, channel_ordering, connection_id))
    }
}
