use ibc_proto::ibc::core::channel::v1::MsgChannelOpenInit as RawMsgChannelOpenInit;

use crate::core::ics04_channel::channel::{ChannelEnd, State};
use crate::core::ics04_channel::error::Error;
use crate::core::ics24_host::identifier::PortId;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.channel.v1.MsgChannelOpenInit";

///
/// Message definition for the first step in the channel open handshake (`ChanOpenInit` datagram).
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenInit {
    pub port_id: PortId,
    pub channel: ChannelEnd,
    pub signer: Signer,
}

impl MsgChannelOpenInit {
    pub fn new(port_id: PortId, channel: ChannelEnd, signer: Signer) -> Self {
        Self {
            port_id,
            channel,
            signer,
        }
    }
}

impl Msg for MsgChannelOpenInit {
    type ValidationError = Error;
    type Raw = RawMsgChannelOpenInit;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }

    fn validate_basic(&self) -> Result<(), Self::ValidationError> {
        if !self.channel.state_matches(&State::Init) {
            return Err(Error::invalid_channel(format!(
                "channel state must be INIT, got {}",
                self.channel.state()
            )));
        }
        if self.channel.counterparty().channel_id().is_some() {
            return Err(Error::invalid_counterparty(
                "counterparty channel identifier must be empty".to_string(),
            ));
        }
        self.channel.validate_basic()
    }
}

impl TryFrom<RawMsgChannelOpenInit> for MsgChannelOpenInit {
    type Error = Error;

    fn try_from(raw_msg: RawMsgChannelOpenInit) -> Result<Self, Self::Error> {
        let msg = MsgChannelOpenInit {
            port_id: raw_msg.port_id.parse().map_err(Error::identifier)?,
            channel: raw_msg
                .channel
                .ok_or_else(Error::missing_channel)?
                .try_into()?,
            signer: raw_msg.signer.parse().map_err(Error::signer)?,
        };
        msg.validate_basic()?;
        Ok(msg)
    }
}

impl From<MsgChannelOpenInit> for RawMsgChannelOpenInit {
    fn from(domain_msg: MsgChannelOpenInit) -> Self {
        RawMsgChannelOpenInit {
            port_id: domain_msg.port_id.to_string(),
            channel: Some(domain_msg.channel.into()),
            signer: domain_msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_util {
    use ibc_proto::ibc::core::channel::v1::MsgChannelOpenInit as RawMsgChannelOpenInit;

    use crate::core::ics04_channel::channel::test_util::get_dummy_raw_channel_end;
    use crate::core::ics24_host::identifier::PortId;
    use crate::test_utils::get_dummy_bech32_account;

    /// Returns a dummy `RawMsgChannelOpenInit`, for testing only!
    pub fn get_dummy_raw_msg_chan_open_init() -> RawMsgChannelOpenInit {
        let mut channel = get_dummy_raw_channel_end();
        if let Some(counterparty) = channel.counterparty.as_mut() {
            counterparty.channel_id = String::new();
        }
        RawMsgChannelOpenInit {
            port_id: PortId::default().to_string(),
            channel: Some(channel),
            signer: get_dummy_bech32_account(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use ibc_proto::ibc::core::channel::v1::MsgChannelOpenInit as RawMsgChannelOpenInit;

    use crate::core::ics04_channel::channel::test_util::get_dummy_raw_counterparty;
    use crate::core::ics04_channel::msgs::chan_open_init::test_util::get_dummy_raw_msg_chan_open_init;
    use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;

    #[test]
    fn parse_channel_open_init_msg() {
        struct Test {
            name: String,
            raw: RawMsgChannelOpenInit,
            want_pass: bool,
        }

        let default_raw_msg = get_dummy_raw_msg_chan_open_init();
        let channel_with = |f: &dyn Fn(&mut ibc_proto::ibc::core::channel::v1::Channel)| {
            let mut raw = default_raw_msg.clone();
            if let Some(channel) = raw.channel.as_mut() {
                f(channel);
            }
            raw
        };

        let tests: Vec<Test> = vec![
            Test {
                name: "Good parameters".to_string(),
                raw: default_raw_msg.clone(),
                want_pass: true,
            },
            Test {
                name: "Incorrect port identifier, slash (separator) prohibited".to_string(),
                raw: RawMsgChannelOpenInit {
                    port_id: "p34/".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Missing channel".to_string(),
                raw: RawMsgChannelOpenInit {
                    channel: None,
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Counterparty channel identifier already set".to_string(),
                raw: channel_with(&|c| c.counterparty = Some(get_dummy_raw_counterparty())),
                want_pass: false,
            },
            Test {
                name: "Channel not in INIT".to_string(),
                raw: channel_with(&|c| c.state = 2),
                want_pass: false,
            },
            Test {
                name: "Two connection hops".to_string(),
                raw: channel_with(&|c| c.connection_hops.push("connection-1".to_string())),
                want_pass: false,
            },
            Test {
                name: "Ordering NONE".to_string(),
                raw: channel_with(&|c| c.ordering = 0),
                want_pass: false,
            },
            Test {
                name: "Empty signer".to_string(),
                raw: RawMsgChannelOpenInit {
                    signer: "".to_string(),
                    ..default_raw_msg.clone()
                },
                want_pass: false,
            },
        ];

        for test in tests {
            let res = MsgChannelOpenInit::try_from(test.raw.clone());

            assert_eq!(
                test.want_pass,
                res.is_ok(),
                "MsgChannelOpenInit::try_from failed for test {}, \nraw msg {:?} with error {:?}",
                test.name,
                test.raw,
                res.err(),
            );
        }
    }

    #[test]
    fn to_and_from() {
        let raw = get_dummy_raw_msg_chan_open_init();
        let msg = MsgChannelOpenInit::try_from(raw.clone()).unwrap();
        let raw_back = RawMsgChannelOpenInit::from(msg.clone());
        let msg_back = MsgChannelOpenInit::try_from(raw_back.clone()).unwrap();
        assert_eq!(raw, raw_back);
        assert_eq!(msg, msg_back);
    }
}
