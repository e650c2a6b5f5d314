use ibc_proto::google::protobuf::Any;
use prost::Message;

use crate::core::ics02_client::error::Error;
use crate::timestamp::Timestamp;
use crate::Height;

pub const MOCK_HEADER_TYPE_URL: &str = "/ibc.mock.Header";

/// Wire form of a [`MockHeader`].
#[derive(Clone, PartialEq, Eq, Message)]
pub struct RawMockHeader {
    #[prost(uint64, tag = "1")]
    pub revision_number: u64,
    #[prost(uint64, tag = "2")]
    pub revision_height: u64,
    #[prost(uint64, tag = "3")]
    pub timestamp: u64,
}

/// A header of the mock chain: a height and the block time at that height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockHeader {
    pub height: Height,
    pub timestamp: Timestamp,
}

impl MockHeader {
    /// A header whose block time is its height, in seconds.
    pub fn new(height: Height) -> Self {
        Self {
            height,
            timestamp: block_time(height),
        }
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Block time of the mock chain at `height`: one block per second since the epoch.
pub fn block_time(height: Height) -> Timestamp {
    Timestamp::from_nanoseconds(height.revision_height().saturating_mul(1_000_000_000))
        .unwrap_or_else(|_| Timestamp::none())
}

impl TryFrom<RawMockHeader> for MockHeader {
    type Error = Error;

    fn try_from(raw: RawMockHeader) -> Result<Self, Self::Error> {
        let height = Height::new(raw.revision_number, raw.revision_height)?;
        let timestamp = Timestamp::from_nanoseconds(raw.timestamp)
            .map_err(|e| Error::invalid_client_message(e.to_string()))?;
        Ok(Self { height, timestamp })
    }
}

impl From<MockHeader> for RawMockHeader {
    fn from(header: MockHeader) -> Self {
        RawMockHeader {
            revision_number: header.height.revision_number(),
            revision_height: header.height.revision_height(),
            timestamp: header.timestamp.nanoseconds(),
        }
    }
}

impl From<MockHeader> for Any {
    fn from(header: MockHeader) -> Self {
        Any {
            type_url: MOCK_HEADER_TYPE_URL.to_string(),
            value: RawMockHeader::from(header).encode_to_vec(),
        }
    }
}

impl TryFrom<Any> for MockHeader {
    type Error = Error;

    fn try_from(any: Any) -> Result<Self, Self::Error> {
        if any.type_url != MOCK_HEADER_TYPE_URL {
            return Err(Error::invalid_client_message(format!(
                "unexpected header type {}",
                any.type_url
            )));
        }
        let raw = RawMockHeader::decode(any.value.as_slice())
            .map_err(|e| Error::invalid_client_message(e.to_string()))?;
        Self::try_from(raw)
    }
}
