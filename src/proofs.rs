use flex_error::define_error;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use serde::Serialize;

use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    ProofError {
        ZeroHeight
            | _ | { format_args!("proof height cannot be zero") },

        EmptyProof
            | _ | { format_args!("proof cannot be empty") },
    }
}

/// Structure comprising proofs in a message. Proofs are present in the messages of the ICS4
/// channel (open and close) handshake, as well as in packet receipts, acknowledgements and
/// timeouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Proofs {
    object_proof: CommitmentProofBytes,
    /// Currently used for proof_close for MsgTimeoutOnClose where object_proof is proof_unreceived
    other_proof: Option<CommitmentProofBytes>,
    /// Height for the commitment root for proving the proofs above.
    height: Height,
}

impl Proofs {
    pub fn new(
        object_proof: CommitmentProofBytes,
        other_proof: Option<CommitmentProofBytes>,
        height: Height,
    ) -> Self {
        Self {
            object_proof,
            other_proof,
            height,
        }
    }

    /// Builds the proofs from their wire form, rejecting empty proofs and a missing or zero
    /// proof height.
    pub fn from_raw(
        object_proof: Vec<u8>,
        other_proof: Option<Vec<u8>>,
        height: Option<RawHeight>,
    ) -> Result<Self, ProofError> {
        let object_proof =
            CommitmentProofBytes::try_from(object_proof).map_err(|_| ProofError::empty_proof())?;

        let other_proof = other_proof
            .map(CommitmentProofBytes::try_from)
            .transpose()
            .map_err(|_| ProofError::empty_proof())?;

        let height = height
            .and_then(|raw| Height::try_from(raw).ok())
            .ok_or_else(ProofError::zero_height)?;

        Ok(Self::new(object_proof, other_proof, height))
    }

    /// Getter for the height field of this proof (i.e., the consensus height where this proof was
    /// created).
    pub fn height(&self) -> Height {
        self.height
    }

    /// Getter for the object-specific proof (e.g., proof for channel state or packet commitment).
    pub fn object_proof(&self) -> &CommitmentProofBytes {
        &self.object_proof
    }

    /// Getter for the other_proof.
    pub fn other_proof(&self) -> &Option<CommitmentProofBytes> {
        &self.other_proof
    }
}
