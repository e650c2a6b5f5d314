//! ICS 23: Vector Commitment Scheme. Only the opaque byte carriers the channel layer passes
//! between relayers and light clients are defined here.

pub mod commitment;
pub mod error;
