//! ICS 24: Host defines the minimal set of interfaces that a
//! state machine hosting an IBC-enabled chain must implement.

pub use path::{Path, IBC_QUERY_PATH};

pub mod error;
pub mod identifier;
pub mod path;
pub mod validate;
