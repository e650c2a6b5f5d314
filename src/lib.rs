#![allow(clippy::large_enum_variant)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Implementation of the ICS 04 channel layer of the Inter-Blockchain Communication protocol,
//! together with the slices of the neighbouring ICS modules it depends on:
//!
//! - ICS 02: Client (heights and the light-client verification interface)
//! - ICS 03: Connection (connection ends and negotiated versions)
//! - ICS 04: Channel (handshake, packet lifecycle, stores, queries, genesis)
//! - ICS 05: Port (capabilities)
//! - ICS 23: Vector Commitment Scheme (prefixes, roots and proof bytes)
//! - ICS 24: Host Requirements (identifiers and store paths)
//! - ICS 26: Routing (message envelopes, module callbacks, the redundant-relay filter)

extern crate alloc;

pub mod core;
pub mod events;
pub mod handler;
pub mod keys;
pub mod proofs;
pub mod query;
pub mod signer;
pub mod store;
pub mod timestamp;
pub mod tx_msg;

mod serializers;

/// Re-export of ICS 002 Height domain type
pub type Height = crate::core::ics02_client::height::Height;

#[cfg(any(test, feature = "mocks"))]
pub mod test_utils;

#[cfg(any(test, feature = "mocks"))]
pub mod mock; // Mock host chain and light client, for testing the handlers.
