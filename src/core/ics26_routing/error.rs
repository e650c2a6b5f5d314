use flex_error::{define_error, TraceError};

use crate::core::ics02_client;
use crate::core::ics04_channel;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Ics02Client
            [ ics02_client::error::Error ]
            | _ | { "ICS02 client error" },

        Ics04Channel
            [ ics04_channel::error::Error ]
            | _ | { "ICS04 channel error" },

        UnknownMessageTypeUrl
            { url: String }
            | e | { format_args!("unknown type URL {0}", e.url) },

        MalformedMessageBytes
            [ TraceError<prost::DecodeError> ]
            | _ | { "the message is malformed and cannot be decoded" },
    }
}

impl Error {
    /// The channel error behind this one, if any.
    pub fn channel_error(&self) -> Option<&ics04_channel::error::ErrorDetail> {
        match self.detail() {
            ErrorDetail::Ics04Channel(e) => Some(&e.source),
            _ => None,
        }
    }

    pub fn is_unknown_type_url(&self) -> bool {
        matches!(self.detail(), ErrorDetail::UnknownMessageTypeUrl(_))
    }
}
