//! Import and export of the whole channel state, as carried in a chain's genesis file.

use ibc_proto::ibc::core::channel::v1::{
    GenesisState as RawGenesisState, PacketSequence as RawPacketSequence,
};
use serde_derive::{Deserialize, Serialize};
use tracing::info;

use crate::core::ics04_channel::channel::IdentifiedChannelEnd;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{PacketState, Receipt, Sequence};
use crate::core::ics04_channel::store::ChannelStore;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::store::KvStore;

/// The value of one sequence counter of a channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSequence {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl TryFrom<RawPacketSequence> for PacketSequence {
    type Error = Error;

    fn try_from(raw: RawPacketSequence) -> Result<Self, Self::Error> {
        Ok(PacketSequence {
            port_id: raw.port_id.parse().map_err(Error::identifier)?,
            channel_id: raw.channel_id.parse().map_err(Error::identifier)?,
            sequence: raw.sequence.into(),
        })
    }
}

impl From<PacketSequence> for RawPacketSequence {
    fn from(seq: PacketSequence) -> Self {
        RawPacketSequence {
            port_id: seq.port_id.to_string(),
            channel_id: seq.channel_id.to_string(),
            sequence: seq.sequence.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub channels: Vec<IdentifiedChannelEnd>,
    pub acknowledgements: Vec<PacketState>,
    pub commitments: Vec<PacketState>,
    pub receipts: Vec<PacketState>,
    pub send_sequences: Vec<PacketSequence>,
    pub recv_sequences: Vec<PacketSequence>,
    pub ack_sequences: Vec<PacketSequence>,
    pub next_channel_sequence: u64,
}

impl GenesisState {
    /// Checks the state before it is loaded into a store.
    ///
    /// Gaps in the used channel identifiers are accepted; the only requirement on the counter is
    /// that it never hands out an identifier already in use.
    pub fn validate(&self) -> Result<(), Error> {
        let mut max_channel_sequence = None;

        for (i, channel) in self.channels.iter().enumerate() {
            channel.channel_end.validate_basic().map_err(|e| {
                Error::invalid_genesis(format!("invalid channel {}: {}", i, e))
            })?;
            let used = channel.channel_id.sequence();
            max_channel_sequence = max_channel_sequence.max(Some(used));
        }

        let packet_states = [
            ("acknowledgement", &self.acknowledgements),
            ("commitment", &self.commitments),
            ("receipt", &self.receipts),
        ];
        for (kind, states) in packet_states {
            for (i, state) in states.iter().enumerate() {
                if state.data.is_empty() {
                    return Err(Error::invalid_genesis(format!(
                        "invalid {} {}: data bytes cannot be empty",
                        kind, i
                    )));
                }
                if state.sequence.is_zero() {
                    return Err(Error::invalid_genesis(format!(
                        "invalid {} {}: packet sequence cannot be 0",
                        kind, i
                    )));
                }
            }
        }

        let sequences = [
            ("send", &self.send_sequences),
            ("recv", &self.recv_sequences),
            ("ack", &self.ack_sequences),
        ];
        for (kind, seqs) in sequences {
            for (i, seq) in seqs.iter().enumerate() {
                if seq.sequence.is_zero() {
                    return Err(Error::invalid_genesis(format!(
                        "invalid {} sequence {}: sequence cannot be 0",
                        kind, i
                    )));
                }
            }
        }

        if let Some(max) = max_channel_sequence {
            if max >= self.next_channel_sequence {
                return Err(Error::invalid_genesis(format!(
                    "next channel sequence {} must be greater than maximum sequence used in channel identifier {}",
                    self.next_channel_sequence, max
                )));
            }
        }

        Ok(())
    }
}

impl TryFrom<RawGenesisState> for GenesisState {
    type Error = Error;

    fn try_from(raw: RawGenesisState) -> Result<Self, Self::Error> {
        fn convert<R, T>(raw: Vec<R>) -> Result<Vec<T>, Error>
        where
            T: TryFrom<R, Error = Error>,
        {
            raw.into_iter().map(T::try_from).collect()
        }

        Ok(GenesisState {
            channels: convert(raw.channels)?,
            acknowledgements: convert(raw.acknowledgements)?,
            commitments: convert(raw.commitments)?,
            receipts: convert(raw.receipts)?,
            send_sequences: convert(raw.send_sequences)?,
            recv_sequences: convert(raw.recv_sequences)?,
            ack_sequences: convert(raw.ack_sequences)?,
            next_channel_sequence: raw.next_channel_sequence,
        })
    }
}

impl From<GenesisState> for RawGenesisState {
    fn from(state: GenesisState) -> Self {
        fn convert<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
            items.into_iter().map(R::from).collect()
        }

        RawGenesisState {
            channels: convert(state.channels),
            acknowledgements: convert(state.acknowledgements),
            commitments: convert(state.commitments),
            receipts: convert(state.receipts),
            send_sequences: convert(state.send_sequences),
            recv_sequences: convert(state.recv_sequences),
            ack_sequences: convert(state.ack_sequences),
            next_channel_sequence: state.next_channel_sequence,
        }
    }
}

/// Validates `state` and writes all of it into `store`.
pub fn init_genesis<S: KvStore>(
    store: &mut ChannelStore<S>,
    state: &GenesisState,
) -> Result<(), Error> {
    state.validate()?;

    for channel in &state.channels {
        store.set_channel(&channel.port_id, &channel.channel_id, &channel.channel_end);
    }
    for ack in &state.acknowledgements {
        store.set_packet_acknowledgement(
            &ack.port_id,
            &ack.channel_id,
            ack.sequence,
            ack.data.clone().into(),
        );
    }
    for commitment in &state.commitments {
        store.set_packet_commitment(
            &commitment.port_id,
            &commitment.channel_id,
            commitment.sequence,
            commitment.data.clone().into(),
        );
    }
    for receipt in &state.receipts {
        store.set_packet_receipt(
            &receipt.port_id,
            &receipt.channel_id,
            receipt.sequence,
            &Receipt::Ok,
        );
    }
    for seq in &state.send_sequences {
        store.set_next_sequence_send(&seq.port_id, &seq.channel_id, seq.sequence);
    }
    for seq in &state.recv_sequences {
        store.set_next_sequence_recv(&seq.port_id, &seq.channel_id, seq.sequence);
    }
    for seq in &state.ack_sequences {
        store.set_next_sequence_ack(&seq.port_id, &seq.channel_id, seq.sequence);
    }
    store.set_next_channel_sequence(state.next_channel_sequence);

    info!(
        channels = state.channels.len(),
        next_channel_sequence = state.next_channel_sequence,
        "channel genesis state imported"
    );

    Ok(())
}

/// Reads the whole channel state out of `store`, in key order.
pub fn export_genesis<S: KvStore>(store: &ChannelStore<S>) -> Result<GenesisState, Error> {
    Ok(GenesisState {
        channels: store.channels()?,
        acknowledgements: store.all_packet_acknowledgements()?,
        commitments: store.all_packet_commitments()?,
        receipts: store.all_packet_receipts()?,
        send_sequences: store.send_sequences()?,
        recv_sequences: store.recv_sequences()?,
        ack_sequences: store.ack_sequences()?,
        next_channel_sequence: store.next_channel_sequence()?,
    })
}
