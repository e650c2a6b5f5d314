//! ICS 02: Client implementation for verifying remote IBC-enabled chains.
//!
//! Only the surface the channel layer consumes lives here: heights, the client type tag, and
//! the client/consensus state interfaces through which counterparty proofs are verified. The
//! light-client algorithms themselves are provided by the host, behind `ClientKeeper`.

pub mod client_consensus;
pub mod client_state;
pub mod client_type;
pub mod context;
pub mod error;
pub mod height;
pub mod msgs;
