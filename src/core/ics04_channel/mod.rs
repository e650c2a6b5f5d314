//! ICS 04: Channel implementation that facilitates communication between
//! applications and the chains those applications are built upon.

pub mod channel;
pub mod commitment;
pub mod context;
pub mod error;
pub mod events;
pub mod genesis;
pub mod handler;
pub mod msgs;
pub mod packet;
pub mod query;
pub mod store;
pub mod timeout;
pub mod version;

pub use version::Version;
