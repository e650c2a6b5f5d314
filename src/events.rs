use core::fmt;
use core::str::FromStr;

use flex_error::define_error;
use serde_derive::{Deserialize, Serialize};

use crate::core::ics02_client::height::HeightError;
use crate::core::ics04_channel::error as channel_error;
use crate::core::ics04_channel::events as ChannelEvents;
use crate::core::ics24_host::error::ValidationError;
use crate::timestamp::ParseTimestampError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Height
            [ HeightError ]
            | _ | { "error parsing height" },

        Parse
            [ ValidationError ]
            | _ | { "error parsing an identifier" },

        Channel
            [ channel_error::Error ]
            | _ | { "channel error" },

        Timestamp
            [ ParseTimestampError ]
            | _ | { "error parsing a timestamp" },

        Decode
            { reason: String }
            | e | { format_args!("error decoding hex-encoded packet data: {}", e.reason) },

        MissingKey
            { key: String }
            | e | { format_args!("missing event attribute '{}'", e.key) },

        IncorrectEventType
            { event: String }
            | e | { format_args!("incorrect event type: {}", e.event) },

        UnsupportedAbciEvent
            { event_type: String }
            | e | { format_args!("Unable to parse abci event type '{}' into IbcEvent", e.event_type) },
    }
}

/// Events whose data is not included in the app state and must be extracted using tendermint RPCs
/// (i.e. /tx_search or /block_search)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithBlockDataType {
    SendPacket,
    WriteAck,
}

impl WithBlockDataType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            WithBlockDataType::SendPacket => "send_packet",
            WithBlockDataType::WriteAck => "write_acknowledgement",
        }
    }
}

const CHANNEL_OPEN_INIT_EVENT: &str = "channel_open_init";
const CHANNEL_OPEN_TRY_EVENT: &str = "channel_open_try";
const CHANNEL_OPEN_ACK_EVENT: &str = "channel_open_ack";
const CHANNEL_OPEN_CONFIRM_EVENT: &str = "channel_open_confirm";
const CHANNEL_CLOSE_INIT_EVENT: &str = "channel_close_init";
const CHANNEL_CLOSE_CONFIRM_EVENT: &str = "channel_close_confirm";
const SEND_PACKET_EVENT: &str = "send_packet";
const RECEIVE_PACKET_EVENT: &str = "recv_packet";
const WRITE_ACK_EVENT: &str = "write_acknowledgement";
const ACK_PACKET_EVENT: &str = "acknowledge_packet";
const TIMEOUT_EVENT: &str = "timeout_packet";

/// Events types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IbcEventType {
    OpenInitChannel,
    OpenTryChannel,
    OpenAckChannel,
    OpenConfirmChannel,
    CloseInitChannel,
    CloseConfirmChannel,
    SendPacket,
    ReceivePacket,
    WriteAck,
    AckPacket,
    Timeout,
    AppModule,
}

impl IbcEventType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            IbcEventType::OpenInitChannel => CHANNEL_OPEN_INIT_EVENT,
            IbcEventType::OpenTryChannel => CHANNEL_OPEN_TRY_EVENT,
            IbcEventType::OpenAckChannel => CHANNEL_OPEN_ACK_EVENT,
            IbcEventType::OpenConfirmChannel => CHANNEL_OPEN_CONFIRM_EVENT,
            IbcEventType::CloseInitChannel => CHANNEL_CLOSE_INIT_EVENT,
            IbcEventType::CloseConfirmChannel => CHANNEL_CLOSE_CONFIRM_EVENT,
            IbcEventType::SendPacket => SEND_PACKET_EVENT,
            IbcEventType::ReceivePacket => RECEIVE_PACKET_EVENT,
            IbcEventType::WriteAck => WRITE_ACK_EVENT,
            IbcEventType::AckPacket => ACK_PACKET_EVENT,
            IbcEventType::Timeout => TIMEOUT_EVENT,
            IbcEventType::AppModule => "app_module",
        }
    }
}

impl FromStr for IbcEventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CHANNEL_OPEN_INIT_EVENT => Ok(IbcEventType::OpenInitChannel),
            CHANNEL_OPEN_TRY_EVENT => Ok(IbcEventType::OpenTryChannel),
            CHANNEL_OPEN_ACK_EVENT => Ok(IbcEventType::OpenAckChannel),
            CHANNEL_OPEN_CONFIRM_EVENT => Ok(IbcEventType::OpenConfirmChannel),
            CHANNEL_CLOSE_INIT_EVENT => Ok(IbcEventType::CloseInitChannel),
            CHANNEL_CLOSE_CONFIRM_EVENT => Ok(IbcEventType::CloseConfirmChannel),
            SEND_PACKET_EVENT => Ok(IbcEventType::SendPacket),
            RECEIVE_PACKET_EVENT => Ok(IbcEventType::ReceivePacket),
            WRITE_ACK_EVENT => Ok(IbcEventType::WriteAck),
            ACK_PACKET_EVENT => Ok(IbcEventType::AckPacket),
            TIMEOUT_EVENT => Ok(IbcEventType::Timeout),
            // from_str() for `APP_MODULE_EVENT` MUST fail because a `ModuleEvent`'s type isn't constant
            _ => Err(Error::incorrect_event_type(s.to_string())),
        }
    }
}

/// A key-value pair of an [`AbciEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

impl EventAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The host-neutral form in which events leave the state machine: a type string and an ordered
/// list of string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbciEvent {
    pub type_str: String,
    pub attributes: Vec<EventAttribute>,
}

impl AbciEvent {
    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IbcEvent {
    OpenInitChannel(ChannelEvents::OpenInit),
    OpenTryChannel(ChannelEvents::OpenTry),
    OpenAckChannel(ChannelEvents::OpenAck),
    OpenConfirmChannel(ChannelEvents::OpenConfirm),
    CloseInitChannel(ChannelEvents::CloseInit),
    CloseConfirmChannel(ChannelEvents::CloseConfirm),

    SendPacket(ChannelEvents::SendPacket),
    ReceivePacket(ChannelEvents::ReceivePacket),
    WriteAcknowledgement(ChannelEvents::WriteAcknowledgement),
    AcknowledgePacket(ChannelEvents::AcknowledgePacket),
    TimeoutPacket(ChannelEvents::TimeoutPacket),

    AppModule(ModuleEvent),
}

impl fmt::Display for IbcEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IbcEvent::OpenInitChannel(ev) => write!(f, "OpenInitChannel({:?})", ev),
            IbcEvent::OpenTryChannel(ev) => write!(f, "OpenTryChannel({:?})", ev),
            IbcEvent::OpenAckChannel(ev) => write!(f, "OpenAckChannel({:?})", ev),
            IbcEvent::OpenConfirmChannel(ev) => write!(f, "OpenConfirmChannel({:?})", ev),
            IbcEvent::CloseInitChannel(ev) => write!(f, "CloseInitChannel({:?})", ev),
            IbcEvent::CloseConfirmChannel(ev) => write!(f, "CloseConfirmChannel({:?})", ev),

            IbcEvent::SendPacket(ev) => write!(f, "SendPacket({})", ev),
            IbcEvent::ReceivePacket(ev) => write!(f, "ReceivePacket({})", ev),
            IbcEvent::WriteAcknowledgement(ev) => write!(f, "WriteAcknowledgement({})", ev),
            IbcEvent::AcknowledgePacket(ev) => write!(f, "AcknowledgePacket({})", ev),
            IbcEvent::TimeoutPacket(ev) => write!(f, "TimeoutPacket({})", ev),

            IbcEvent::AppModule(ev) => write!(f, "AppModuleEvent({:?})", ev),
        }
    }
}

impl From<IbcEvent> for AbciEvent {
    fn from(event: IbcEvent) -> Self {
        match event {
            IbcEvent::OpenInitChannel(event) => event.into(),
            IbcEvent::OpenTryChannel(event) => event.into(),
            IbcEvent::OpenAckChannel(event) => event.into(),
            IbcEvent::OpenConfirmChannel(event) => event.into(),
            IbcEvent::CloseInitChannel(event) => event.into(),
            IbcEvent::CloseConfirmChannel(event) => event.into(),
            IbcEvent::SendPacket(event) => event.into(),
            IbcEvent::ReceivePacket(event) => event.into(),
            IbcEvent::WriteAcknowledgement(event) => event.into(),
            IbcEvent::AcknowledgePacket(event) => event.into(),
            IbcEvent::TimeoutPacket(event) => event.into(),
            IbcEvent::AppModule(event) => event.into(),
        }
    }
}

/// Parses an event emitted by the channel layer back into its typed form, as a relayer
/// listening to a chain would.
impl TryFrom<&AbciEvent> for IbcEvent {
    type Error = Error;

    fn try_from(abci_event: &AbciEvent) -> Result<Self, Self::Error> {
        let event_type = IbcEventType::from_str(&abci_event.type_str)
            .map_err(|_| Error::unsupported_abci_event(abci_event.type_str.clone()))?;

        match event_type {
            IbcEventType::OpenInitChannel => Ok(IbcEvent::OpenInitChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::OpenTryChannel => Ok(IbcEvent::OpenTryChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::OpenAckChannel => Ok(IbcEvent::OpenAckChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::OpenConfirmChannel => Ok(IbcEvent::OpenConfirmChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::CloseInitChannel => Ok(IbcEvent::CloseInitChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::CloseConfirmChannel => Ok(IbcEvent::CloseConfirmChannel(
                ChannelEvents::channel_attributes_from_abci(abci_event)?.into(),
            )),
            IbcEventType::SendPacket => Ok(IbcEvent::SendPacket(
                ChannelEvents::SendPacket::try_from(abci_event)?,
            )),
            IbcEventType::ReceivePacket => Ok(IbcEvent::ReceivePacket(
                ChannelEvents::ReceivePacket::try_from(abci_event)?,
            )),
            IbcEventType::WriteAck => Ok(IbcEvent::WriteAcknowledgement(
                ChannelEvents::WriteAcknowledgement::try_from(abci_event)?,
            )),
            IbcEventType::AckPacket => Ok(IbcEvent::AcknowledgePacket(
                ChannelEvents::AcknowledgePacket::try_from(abci_event)?,
            )),
            IbcEventType::Timeout => Ok(IbcEvent::TimeoutPacket(
                ChannelEvents::TimeoutPacket::try_from(abci_event)?,
            )),
            IbcEventType::AppModule => {
                Err(Error::unsupported_abci_event(abci_event.type_str.clone()))
            }
        }
    }
}

/// An event emitted by an application module from one of its channel callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEvent {
    pub kind: String,
    pub module_name: String,
    pub attributes: Vec<ModuleEventAttribute>,
}

impl From<ModuleEvent> for AbciEvent {
    fn from(event: ModuleEvent) -> Self {
        let attributes = event
            .attributes
            .into_iter()
            .map(|attr| EventAttribute::new(attr.key, attr.value))
            .collect();
        AbciEvent {
            type_str: event.kind,
            attributes,
        }
    }
}

impl From<ModuleEvent> for IbcEvent {
    fn from(e: ModuleEvent) -> Self {
        IbcEvent::AppModule(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEventAttribute {
    pub key: String,
    pub value: String,
}

impl<K: ToString, V: ToString> From<(K, V)> for ModuleEventAttribute {
    fn from((k, v): (K, V)) -> Self {
        Self {
            key: k.to_string(),
            value: v.to_string(),
        }
    }
}
