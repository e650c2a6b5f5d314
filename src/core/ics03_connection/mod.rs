//! ICS 03: Connection. The channel layer reads connection ends that the connection
//! handshake (performed elsewhere) has established; it never writes them.

pub mod connection;
pub mod error;
pub mod version;
