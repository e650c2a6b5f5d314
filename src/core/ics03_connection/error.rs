use flex_error::define_error;

use crate::core::ics03_connection::connection::State;
use crate::core::ics24_host::identifier::ConnectionId;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        ConnectionNotFound
            { connection_id: ConnectionId }
            | e | {
                format_args!("no connection was found for the previous connection id provided {0}",
                    e.connection_id)
            },

        ConnectionNotOpen
            { connection_id: ConnectionId, state: State }
            | e | {
                format_args!("the connection {0} is not OPEN (got {1})",
                    e.connection_id, e.state)
            },

        MissingCounterpartyConnectionId
            { connection_id: ConnectionId }
            | e | {
                format_args!("the counterparty of connection {0} has no connection identifier",
                    e.connection_id)
            },

        SingleVersionRequired
            { connection_id: ConnectionId, count: usize }
            | e | {
                format_args!("single version must be negotiated on connection {0} before opening a channel, got {1}",
                    e.connection_id, e.count)
            },

        ChannelOrderingNotSupported
            { connection_id: ConnectionId, ordering: String }
            | e | {
                format_args!("connection {0} does not support channel ordering {1}",
                    e.connection_id, e.ordering)
            },
    }
}

impl ErrorDetail {
    /// Stable error code within the connection codespace.
    pub fn code(&self) -> u32 {
        match self {
            ErrorDetail::ConnectionNotFound(_) => 3,
            ErrorDetail::ConnectionNotOpen(_) => 5,
            ErrorDetail::MissingCounterpartyConnectionId(_) => 6,
            ErrorDetail::SingleVersionRequired(_)
            | ErrorDetail::ChannelOrderingNotSupported(_) => 9,
        }
    }
}

impl Error {
    pub fn code(&self) -> u32 {
        self.detail().code()
    }
}
