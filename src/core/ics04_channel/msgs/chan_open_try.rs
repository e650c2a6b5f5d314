use ibc_proto::ibc::core::channel::v1::MsgChannelOpenTry as RawMsgChannelOpenTry;

use crate::core::ics04_channel::channel::{ChannelEnd, State};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::version::Version;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::proofs::Proofs;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.channel.v1.MsgChannelOpenTry";

///
/// Message definition for the second step in the channel open handshake (`ChanOpenTry` datagram).
///
/// `previous_channel_id` is set by the relayer when this chain already holds an `INIT` end for
/// the same channel (crossing hellos); the handshake then continues on that end.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenTry {
    pub port_id: PortId,
    pub previous_channel_id: Option<ChannelId>,
    pub channel: ChannelEnd,
    pub counterparty_version: Version,
    pub proofs: Proofs,
    pub signer: Signer,
}

impl MsgChannelOpenTry {
    pub fn new(
        port_id: PortId,
        previous_channel_id: Option<ChannelId>,
        channel: ChannelEnd,
        counterparty_version: Version,
        proofs: Proofs,
        signer: Signer,
    ) -> Self {
        Self {
            port_id,
            previous_channel_id,
            channel,
            counterparty_version,
            proofs,
            signer,
        }
    }
}

impl Msg for MsgChannelOpenTry {
    type ValidationError = Error;
    type Raw = RawMsgChannelOpenTry;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }

    fn validate_basic(&self) -> Result<(), Self::ValidationError> {
        if !self.channel.state_matches(&State::TryOpen) {
            return Err(Error::invalid_channel(format!(
                "channel state must be TRYOPEN, got {}",
                self.channel.state()
            )));
        }
        if self.channel.counterparty().channel_id().is_none() {
            return Err(Error::invalid_counterparty(
                "counterparty channel identifier cannot be empty".to_string(),
            ));
        }
        self.channel.validate_basic()
    }
}

impl TryFrom<RawMsgChannelOpenTry> for MsgChannelOpenTry {
    type Error = Error;

    fn try_from(raw_msg: RawMsgChannelOpenTry) -> Result<Self, Self::Error> {
        let previous_channel_id = Some(raw_msg.previous_channel_id)
            .filter(|id| !id.is_empty())
            .map(|id| id.parse::<ChannelId>())
            .transpose()
            .map_err(Error::identifier)?;

        let proofs = Proofs::from_raw(raw_msg.proof_init, None, raw_msg.proof_height)
            .map_err(Error::invalid_proof)?;

        let msg = MsgChannelOpenTry {
            port_id: raw_msg.port_id.parse().map_err(Error::identifier)?,
            previous_channel_id,
            channel: raw_msg
                .channel
                .ok_or_else(Error::missing_channel)?
                .try_into()?,
            counterparty_version: raw_msg.counterparty_version.into(),
            proofs,
            signer: raw_msg.signer.parse().map_err(Error::signer)?,
        };
        msg.validate_basic()?;
        Ok(msg)
    }
}

impl From<MsgChannelOpenTry> for RawMsgChannelOpenTry {
    fn from(domain_msg: MsgChannelOpenTry) -> Self {
        RawMsgChannelOpenTry {
            port_id: domain_msg.port_id.to_string(),
            previous_channel_id: domain_msg
                .previous_channel_id
                .map_or_else(String::new, |id| id.to_string()),
            channel: Some(domain_msg.channel.into()),
            counterparty_version: domain_msg.counterparty_version.to_string(),
            proof_init: domain_msg.proofs.object_proof().clone().into(),
            proof_height: Some(domain_msg.proofs.height().into()),
            signer: domain_msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_util {
    use ibc_proto::ibc::core::channel::v1::MsgChannelOpenTry as RawMsgChannelOpenTry;
    use ibc_proto::ibc::core::client::v1::Height as RawHeight;

    use crate::core::ics04_channel::channel::test_util::get_dummy_raw_channel_end;
    use crate::core::ics24_host::identifier::PortId;
    use crate::test_utils::{get_dummy_bech32_account, get_dummy_proof};

    /// Returns a dummy `RawMsgChannelOpenTry`, for testing only!
    pub fn get_dummy_raw_msg_chan_open_try(proof_height: u64) -> RawMsgChannelOpenTry {
        let mut channel = get_dummy_raw_channel_end();
        channel.state = 2;
        RawMsgChannelOpenTry {
            port_id: PortId::default().to_string(),
            previous_channel_id: String::new(),
            channel: Some(channel),
            counterparty_version: "ics20".to_string(),
            proof_init: get_dummy_proof(),
            proof_height: Some(RawHeight {
                revision_number: 0,
                revision_height: proof_height,
            }),
            signer: get_dummy_bech32_account(),
        }
    }
}
