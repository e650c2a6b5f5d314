//! Packet and acknowledgement commitments: the digests a chain stores, and the counterparty
//! proves, in place of the packet data and acknowledgement bytes themselves.

use core::fmt;

use serde_derive::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use super::packet::Packet;
use super::timeout::TimeoutHeight;
use crate::timestamp::Timestamp;

/// Packet commitment
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PacketCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = String::from_utf8(hex::encode_upper(&self.0)).unwrap_or_default();
        f.debug_tuple("PacketCommitment").field(&hex).finish()
    }
}

/// Acknowledgement commitment to be stored
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for AcknowledgementCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = String::from_utf8(hex::encode_upper(&self.0)).unwrap_or_default();
        f.debug_tuple("AcknowledgementCommitment")
            .field(&hex)
            .finish()
    }
}

/// The bytes hashed into a packet commitment:
/// `timeout_timestamp || timeout_revision_number || timeout_revision_height || data`,
/// integers big-endian. An unset timeout contributes zeroes.
pub fn packet_commitment_bytes(
    data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &Timestamp,
) -> Vec<u8> {
    let mut input = Vec::with_capacity(24 + data.len());
    input.extend_from_slice(&timeout_timestamp.nanoseconds().to_be_bytes());
    input.extend_from_slice(&timeout_height.commitment_revision_number().to_be_bytes());
    input.extend_from_slice(&timeout_height.commitment_revision_height().to_be_bytes());
    input.extend_from_slice(data);
    input
}

/// SHA-256, the digest used for commitments by chains of the Cosmos SDK family.
pub fn sha256(value: &[u8]) -> Vec<u8> {
    Sha256::digest(value).to_vec()
}

/// Commitment of `packet` under SHA-256.
pub fn compute_packet_commitment(packet: &Packet) -> PacketCommitment {
    sha256(&packet_commitment_bytes(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    ))
    .into()
}

/// Commitment of the acknowledgement bytes under SHA-256.
pub fn compute_ack_commitment(ack: &[u8]) -> AcknowledgementCommitment {
    sha256(ack).into()
}
