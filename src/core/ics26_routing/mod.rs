//! ICS 26: Routing module keeps track of the modules bound to ports and channels, and routes
//! relayed messages to them.

pub mod ante;
pub mod context;
pub mod error;
pub mod handler;
pub mod msgs;
