use flex_error::define_error;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::height::Height;
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::ClientId;
use crate::signer::SignerError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        ClientNotFound
            { client_id: ClientId }
            | e | { format_args!("client not found: {0}", e.client_id) },

        ClientFrozen
            { client_id: ClientId }
            | e | { format_args!("client is frozen: {0}", e.client_id) },

        ConsensusStateNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("consensus state not found at: {0} at height {1}",
                    e.client_id, e.height)
            },

        InvalidHeight
            | _ | { "invalid height; cannot be zero or negative" },

        MissingRawHeight
            | _ | { "missing height" },

        InvalidClientIdentifier
            [ ValidationError ]
            | _ | { "invalid client identifier" },

        InvalidCommitmentProof
            [ Ics23Error ]
            | _ | { "invalid commitment proof bytes" },

        MalformedProof
            { client_type: ClientType, reason: String }
            | e | {
                format_args!("{0} could not decode the proof: {1}",
                    e.client_type, e.reason)
            },

        ProofVerificationFailure
            { client_type: ClientType, path: String, reason: String }
            | e | {
                format_args!("{0} failed to verify the proof for path '{1}': {2}",
                    e.client_type, e.path, e.reason)
            },

        MissingRawHeader
            | _ | { "missing raw header" },

        Signer
            [ SignerError ]
            | _ | { "failed to parse signer" },

        InvalidClientMessage
            { reason: String }
            | e | { format_args!("invalid client update message: {0}", e.reason) },

        LowHeaderHeight
            {
                header_height: Height,
                latest_height: Height
            }
            | e | {
                format!("received header height ({:?}) is lower than (or equal to) client latest height ({:?})",
                    e.header_height, e.latest_height)
            },
    }
}

impl ErrorDetail {
    /// Stable error code within the client codespace.
    pub fn code(&self) -> u32 {
        match self {
            ErrorDetail::ClientNotFound(_) => 4,
            ErrorDetail::ClientFrozen(_) => 6,
            ErrorDetail::ConsensusStateNotFound(_) => 7,
            ErrorDetail::InvalidHeight(_) | ErrorDetail::MissingRawHeight(_) => 10,
            ErrorDetail::InvalidClientIdentifier(_) => 11,
            ErrorDetail::InvalidCommitmentProof(_) | ErrorDetail::MalformedProof(_) => 12,
            ErrorDetail::ProofVerificationFailure(_) => 13,
            ErrorDetail::InvalidClientMessage(_) | ErrorDetail::MissingRawHeader(_) => 14,
            ErrorDetail::Signer(_) => 1,
            ErrorDetail::LowHeaderHeight(_) => 15,
        }
    }
}

impl Error {
    pub fn code(&self) -> u32 {
        self.detail().code()
    }
}
