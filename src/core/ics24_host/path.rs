//! Path-space as listed in ICS-024
//! https://github.com/cosmos/ibc/tree/master/spec/core/ics-024-host-requirements#path-space
//!
//! Counterparty chains verify proofs of these keys, so their string form must be byte-exact.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use derive_more::Display as DeriveDisplay;

use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::Height;

/// IBC Query Path is hard-coded
pub const IBC_QUERY_PATH: &str = "store/ibc/key";

/// The Path enum abstracts out the different sub-paths.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Path {
    ClientState(ClientStatePath),
    ClientConsensusState(ClientConsensusStatePath),
    Connections(ConnectionsPath),
    Ports(PortsPath),
    ChannelEnds(ChannelEndsPath),
    SeqSends(SeqSendsPath),
    SeqRecvs(SeqRecvsPath),
    SeqAcks(SeqAcksPath),
    Commitments(CommitmentsPath),
    Acks(AcksPath),
    Receipts(ReceiptsPath),
    NextChannelSequence(NextChannelSequencePath),
    ChannelCapability(ChannelCapabilityPath),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "clients/{}/clientState", _0)]
pub struct ClientStatePath(pub ClientId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "clients/{}/consensusStates/{}-{}", client_id, epoch, height)]
pub struct ClientConsensusStatePath {
    pub client_id: ClientId,
    pub epoch: u64,
    pub height: u64,
}

impl ClientConsensusStatePath {
    pub fn new(client_id: ClientId, height: Height) -> Self {
        Self {
            client_id,
            epoch: height.revision_number(),
            height: height.revision_height(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "connections/{}", _0)]
pub struct ConnectionsPath(pub ConnectionId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "ports/{}", _0)]
pub struct PortsPath(pub PortId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "channelEnds/ports/{}/channels/{}", _0, _1)]
pub struct ChannelEndsPath(pub PortId, pub ChannelId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "nextSequenceSend/ports/{}/channels/{}", _0, _1)]
pub struct SeqSendsPath(pub PortId, pub ChannelId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "nextSequenceRecv/ports/{}/channels/{}", _0, _1)]
pub struct SeqRecvsPath(pub PortId, pub ChannelId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "nextSequenceAck/ports/{}/channels/{}", _0, _1)]
pub struct SeqAcksPath(pub PortId, pub ChannelId);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(
    fmt = "commitments/ports/{}/channels/{}/sequences/{}",
    port_id,
    channel_id,
    sequence
)]
pub struct CommitmentsPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(
    fmt = "acks/ports/{}/channels/{}/sequences/{}",
    port_id,
    channel_id,
    sequence
)]
pub struct AcksPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(
    fmt = "receipts/ports/{}/channels/{}/sequences/{}",
    port_id,
    channel_id,
    sequence
)]
pub struct ReceiptsPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "nextChannelSequence")]
pub struct NextChannelSequencePath;

/// The name under which the capability of a channel is registered with the capability store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveDisplay)]
#[display(fmt = "capabilities/ports/{}/channels/{}", _0, _1)]
pub struct ChannelCapabilityPath(pub PortId, pub ChannelId);

/// The store prefix shared by every commitment on the given channel.
pub fn commitments_prefix(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("commitments/ports/{}/channels/{}/sequences/", port_id, channel_id)
}

/// The store prefix shared by every acknowledgement on the given channel.
pub fn acks_prefix(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("acks/ports/{}/channels/{}/sequences/", port_id, channel_id)
}

/// The store prefix shared by every receipt on the given channel.
pub fn receipts_prefix(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("receipts/ports/{}/channels/{}/sequences/", port_id, channel_id)
}

impl Path {
    /// Indication if the path is provable.
    pub fn is_provable(&self) -> bool {
        !matches!(
            &self,
            Path::Ports(_) | Path::ChannelCapability(_) | Path::NextChannelSequence(_)
        )
    }

    /// into_bytes implementation
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

/// The Display trait adds the `.to_string()` method to the Path struct.
/// This is where the different path strings are constructed.
impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Path::ClientState(path) => write!(f, "{}", path),
            Path::ClientConsensusState(path) => write!(f, "{}", path),
            Path::Connections(path) => write!(f, "{}", path),
            Path::Ports(path) => write!(f, "{}", path),
            Path::ChannelEnds(path) => write!(f, "{}", path),
            Path::SeqSends(path) => write!(f, "{}", path),
            Path::SeqRecvs(path) => write!(f, "{}", path),
            Path::SeqAcks(path) => write!(f, "{}", path),
            Path::Commitments(path) => write!(f, "{}", path),
            Path::Acks(path) => write!(f, "{}", path),
            Path::Receipts(path) => write!(f, "{}", path),
            Path::NextChannelSequence(path) => write!(f, "{}", path),
            Path::ChannelCapability(path) => write!(f, "{}", path),
        }
    }
}

macro_rules! impl_into_path {
    ($($variant:ident => $path:ty),* $(,)?) => {
        $(
            impl From<$path> for Path {
                fn from(path: $path) -> Self {
                    Path::$variant(path)
                }
            }
        )*
    };
}

impl_into_path! {
    ClientState => ClientStatePath,
    ClientConsensusState => ClientConsensusStatePath,
    Connections => ConnectionsPath,
    Ports => PortsPath,
    ChannelEnds => ChannelEndsPath,
    SeqSends => SeqSendsPath,
    SeqRecvs => SeqRecvsPath,
    SeqAcks => SeqAcksPath,
    Commitments => CommitmentsPath,
    Acks => AcksPath,
    Receipts => ReceiptsPath,
    NextChannelSequence => NextChannelSequencePath,
    ChannelCapability => ChannelCapabilityPath,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathParseError {
    pub path: String,
}

impl Display for PathParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a channel store path", self.path)
    }
}

/// Parses the channel-layer paths back into their typed form. Used when walking the store by
/// prefix.
impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PathParseError {
            path: s.to_string(),
        };

        if s == "nextChannelSequence" {
            return Ok(NextChannelSequencePath.into());
        }

        let components: Vec<&str> = s.split('/').collect();

        match components.as_slice() {
            [kind, "ports", port, "channels", channel] => {
                let port_id = PortId::from_str(port).map_err(|_| err())?;
                let channel_id = ChannelId::from_str(channel).map_err(|_| err())?;
                match *kind {
                    "channelEnds" => Ok(ChannelEndsPath(port_id, channel_id).into()),
                    "nextSequenceSend" => Ok(SeqSendsPath(port_id, channel_id).into()),
                    "nextSequenceRecv" => Ok(SeqRecvsPath(port_id, channel_id).into()),
                    "nextSequenceAck" => Ok(SeqAcksPath(port_id, channel_id).into()),
                    _ => Err(err()),
                }
            }
            [kind, "ports", port, "channels", channel, "sequences", seq] => {
                let port_id = PortId::from_str(port).map_err(|_| err())?;
                let channel_id = ChannelId::from_str(channel).map_err(|_| err())?;
                let sequence = Sequence::from_str(seq).map_err(|_| err())?;
                match *kind {
                    "commitments" => Ok(CommitmentsPath {
                        port_id,
                        channel_id,
                        sequence,
                    }
                    .into()),
                    "acks" => Ok(AcksPath {
                        port_id,
                        channel_id,
                        sequence,
                    }
                    .into()),
                    "receipts" => Ok(ReceiptsPath {
                        port_id,
                        channel_id,
                        sequence,
                    }
                    .into()),
                    _ => Err(err()),
                }
            }
            _ => Err(err()),
        }
    }
}
