//! The designs and logic pertaining to the transport, authentication, and
//! ordering layers of the IBC protocol.

pub mod ics02_client;
pub mod ics03_connection;
pub mod ics04_channel;
pub mod ics05_port;
pub mod ics23_commitment;
pub mod ics24_host;
pub mod ics26_routing;
