use flex_error::define_error;

use crate::core::ics24_host::identifier::PortId;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        UnknownPort
            { port_id: PortId }
            | e | { format_args!("port '{0}' is unknown", e.port_id) },

        PortAlreadyBound
            { port_id: PortId }
            | e | { format_args!("port '{0}' is already bound", e.port_id) },

        ModuleNotFound
            { port_id: PortId }
            | e | { format_args!("could not retrieve module from port '{0}'", e.port_id) },

        InvalidCapabilityName
            | _ | { "capability name cannot be blank" },

        CapabilityNotFound
            { name: String }
            | e | { format_args!("no capability is registered under '{0}'", e.name) },

        CapabilityTaken
            { name: String }
            | e | { format_args!("capability '{0}' is already taken", e.name) },

        CapabilityNotOwned
            { name: String }
            | e | { format_args!("the presented capability does not own '{0}'", e.name) },

        ImplementationSpecific
            | _ | { "implementation specific error" },
    }
}

impl ErrorDetail {
    /// Stable error code within the port codespace.
    pub fn code(&self) -> u32 {
        match self {
            ErrorDetail::PortAlreadyBound(_) => 2,
            ErrorDetail::UnknownPort(_) => 3,
            ErrorDetail::InvalidCapabilityName(_) => 4,
            ErrorDetail::ModuleNotFound(_) => 5,
            ErrorDetail::CapabilityTaken(_) => 6,
            ErrorDetail::CapabilityNotOwned(_) => 7,
            ErrorDetail::CapabilityNotFound(_) => 8,
            ErrorDetail::ImplementationSpecific(_) => 1,
        }
    }
}

impl Error {
    pub fn code(&self) -> u32 {
        self.detail().code()
    }
}
