//! ICS 05: Port. Ports are bound by application modules; binding a port, and every channel
//! opened on it, mints a capability that the owning module must present to act on it.

pub mod capabilities;
pub mod context;
pub mod error;
