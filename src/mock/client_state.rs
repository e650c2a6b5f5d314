use alloc::collections::BTreeMap;

use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics23_commitment::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics24_host::path::{
    AcksPath, ChannelEndsPath, CommitmentsPath, ReceiptsPath, SeqRecvsPath,
};
use crate::core::ics24_host::Path;
use crate::mock::header::MockHeader;
use crate::store::StoreProof;
use crate::timestamp::Timestamp;
use crate::Height;

/// A mock of an IBC client record as it is stored in a mock context.
#[derive(Clone, Debug)]
pub struct MockClientRecord {
    pub client_state: MockClientState,

    /// Mapping of heights to consensus states for this client.
    pub consensus_states: BTreeMap<Height, MockConsensusState>,
}

/// A light client that trusts whatever [`StoreProof`] it is handed: a proof verifies iff it was
/// produced for the expected path and records the expected value (or its absence).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockClientState {
    pub header: MockHeader,
    pub frozen_height: Option<Height>,
}

impl MockClientState {
    pub fn new(header: MockHeader) -> Self {
        Self {
            header,
            frozen_height: None,
        }
    }

    pub fn with_frozen_height(self, frozen_height: Height) -> Self {
        Self {
            frozen_height: Some(frozen_height),
            ..self
        }
    }

    fn decode_proof(&self, proof: &CommitmentProofBytes) -> Result<StoreProof, Error> {
        StoreProof::decode_vec(proof.as_bytes())
            .map_err(|e| Error::malformed_proof(self.client_type(), e.to_string()))
    }

    fn verify_membership(
        &self,
        proof: &CommitmentProofBytes,
        path: Path,
        value: &[u8],
    ) -> Result<(), Error> {
        let proof = self.decode_proof(proof)?;
        let path = path.to_string();

        if proof.key != path {
            return Err(Error::proof_verification_failure(
                self.client_type(),
                path,
                format!("proof is for '{}'", proof.key),
            ));
        }
        if !proof.exists {
            return Err(Error::proof_verification_failure(
                self.client_type(),
                path,
                "no value is stored under the path".to_string(),
            ));
        }
        if proof.value != value {
            return Err(Error::proof_verification_failure(
                self.client_type(),
                path,
                "stored value differs from the expected one".to_string(),
            ));
        }
        Ok(())
    }

    fn verify_non_membership(
        &self,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), Error> {
        let proof = self.decode_proof(proof)?;
        let path = path.to_string();

        if proof.key != path || proof.exists {
            return Err(Error::proof_verification_failure(
                self.client_type(),
                path,
                "proof does not attest the absence of the path".to_string(),
            ));
        }
        Ok(())
    }
}

impl ClientState for MockClientState {
    fn client_type(&self) -> ClientType {
        ClientType::mock()
    }

    fn latest_height(&self) -> Height {
        self.header.height()
    }

    fn frozen_height(&self) -> Option<Height> {
        self.frozen_height
    }

    fn verify_channel_state(
        &self,
        _height: Height,
        _prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        expected_channel_end: &ChannelEnd,
    ) -> Result<(), Error> {
        let path = ChannelEndsPath(port_id.clone(), *channel_id);
        self.verify_membership(proof, path.into(), &expected_channel_end.encode_vec())
    }

    fn verify_packet_data(
        &self,
        _height: Height,
        _prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error> {
        let path = CommitmentsPath {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_membership(proof, path.into(), commitment.as_bytes())
    }

    fn verify_packet_acknowledgement(
        &self,
        _height: Height,
        _prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        ack: AcknowledgementCommitment,
    ) -> Result<(), Error> {
        let path = AcksPath {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_membership(proof, path.into(), ack.as_bytes())
    }

    fn verify_next_sequence_recv(
        &self,
        _height: Height,
        _prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error> {
        let path = SeqRecvsPath(port_id.clone(), *channel_id);
        self.verify_membership(proof, path.into(), &sequence.to_be_bytes())
    }

    fn verify_packet_receipt_absence(
        &self,
        _height: Height,
        _prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error> {
        let path = ReceiptsPath {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_non_membership(proof, path.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockConsensusState {
    pub header: MockHeader,
    pub root: CommitmentRoot,
}

impl MockConsensusState {
    pub fn new(header: MockHeader) -> Self {
        MockConsensusState {
            header,
            root: CommitmentRoot::from(vec![0]),
        }
    }
}

impl ConsensusState for MockConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::mock()
    }

    fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    fn timestamp(&self) -> Timestamp {
        self.header.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::store::{InMemoryStore, KvStore, ProvableStore};

    fn proof_bytes(bytes: Vec<u8>) -> CommitmentProofBytes {
        CommitmentProofBytes::try_from(bytes).unwrap()
    }

    #[test]
    fn mock_client_checks_path_and_value() {
        let client = MockClientState::new(MockHeader::new(Height::new(0, 5).unwrap()));
        let height = client.latest_height();
        let (port_id, channel_id) = (PortId::transfer(), ChannelId::new(0));
        let commitment = PacketCommitment::from(vec![7; 32]);

        let path = CommitmentsPath {
            port_id: port_id.clone(),
            channel_id,
            sequence: 1.into(),
        };
        let mut store = InMemoryStore::default();
        store.set(Path::from(path.clone()).into_bytes(), commitment.clone().into_vec());

        let proof = proof_bytes(store.get_proof(&Path::from(path).into_bytes()));
        let root = CommitmentRoot::from(store.root_hash());
        let prefix = CommitmentPrefix::default();

        assert!(client
            .verify_packet_data(
                height, &prefix, &proof, &root, &port_id, &channel_id, 1.into(),
                commitment.clone()
            )
            .is_ok());

        // Same proof, other sequence.
        let err = client
            .verify_packet_data(
                height, &prefix, &proof, &root, &port_id, &channel_id, 2.into(),
                commitment
            )
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ProofVerificationFailure(_)));

        // Nothing is stored under the receipt path.
        let absent = proof_bytes(store.get_proof(b"receipts/ports/transfer/channels/channel-0/sequences/1"));
        assert!(client
            .verify_packet_receipt_absence(
                height, &prefix, &absent, &root, &port_id, &channel_id, 1.into()
            )
            .is_ok());
    }

    #[test]
    fn mock_client_rejects_undecodable_proofs() {
        let client = MockClientState::new(MockHeader::new(Height::new(0, 5).unwrap()));
        let err = client
            .verify_next_sequence_recv(
                client.latest_height(),
                &CommitmentPrefix::default(),
                &proof_bytes(vec![0xff, 0xff, 0xff]),
                &CommitmentRoot::from(vec![0]),
                &PortId::transfer(),
                &ChannelId::new(0),
                1.into(),
            )
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::MalformedProof(_)));
        assert!(!client.is_frozen());
        assert!(client.with_frozen_height(client.latest_height()).is_frozen());
    }
}
