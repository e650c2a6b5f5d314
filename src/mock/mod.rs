//! Implementation of mocks for context, host chain, and client.

pub mod client_state;
pub mod context;
pub mod header;
