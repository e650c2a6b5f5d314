use core::fmt::Debug;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::timestamp::Timestamp;

/// The state of a counterparty chain as tracked by a client at one height.
pub trait ConsensusState: Debug + Send + Sync {
    /// Type of client associated with this consensus state (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// Commitment root of the consensus state, which is used for key-value pair verification.
    fn root(&self) -> &CommitmentRoot;

    /// The timestamp of the counterparty block this consensus state was taken from.
    fn timestamp(&self) -> Timestamp;
}
