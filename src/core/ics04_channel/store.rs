//! Typed access to the channel state kept in the host store: channel ends, the three sequence
//! counters of every channel, packet commitments, receipts and acknowledgements, and the
//! counter from which channel identifiers are allocated.
//!
//! Every key is the ICS 24 path of the value, so that the store can prove it to a counterparty.

use core::str::FromStr;

use tracing::trace;

use crate::core::ics04_channel::channel::{ChannelEnd, IdentifiedChannelEnd};
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::genesis::PacketSequence;
use crate::core::ics04_channel::packet::{PacketState, Receipt, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::core::ics24_host::path::{
    acks_prefix, commitments_prefix, receipts_prefix, AcksPath, ChannelEndsPath, CommitmentsPath,
    NextChannelSequencePath, ReceiptsPath, SeqAcksPath, SeqRecvsPath, SeqSendsPath,
};
use crate::core::ics24_host::Path;
use crate::store::KvStore;

const CHANNEL_ENDS_PREFIX: &str = "channelEnds/ports/";
const SEQ_SENDS_PREFIX: &str = "nextSequenceSend/ports/";
const SEQ_RECVS_PREFIX: &str = "nextSequenceRecv/ports/";
const SEQ_ACKS_PREFIX: &str = "nextSequenceAck/ports/";
const COMMITMENTS_PREFIX: &str = "commitments/ports/";
const ACKS_PREFIX: &str = "acks/ports/";
const RECEIPTS_PREFIX: &str = "receipts/ports/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SequenceKind {
    Send,
    Recv,
    Ack,
}

impl SequenceKind {
    fn key(self, port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
        let (port_id, channel_id) = (port_id.clone(), *channel_id);
        let path: Path = match self {
            SequenceKind::Send => SeqSendsPath(port_id, channel_id).into(),
            SequenceKind::Recv => SeqRecvsPath(port_id, channel_id).into(),
            SequenceKind::Ack => SeqAcksPath(port_id, channel_id).into(),
        };
        path.into_bytes()
    }

    fn prefix(self) -> &'static str {
        match self {
            SequenceKind::Send => SEQ_SENDS_PREFIX,
            SequenceKind::Recv => SEQ_RECVS_PREFIX,
            SequenceKind::Ack => SEQ_ACKS_PREFIX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PacketStateKind {
    Commitment,
    Receipt,
    Ack,
}

impl PacketStateKind {
    fn key(self, port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Vec<u8> {
        let (port_id, channel_id) = (port_id.clone(), *channel_id);
        let path: Path = match self {
            PacketStateKind::Commitment => CommitmentsPath {
                port_id,
                channel_id,
                sequence,
            }
            .into(),
            PacketStateKind::Receipt => ReceiptsPath {
                port_id,
                channel_id,
                sequence,
            }
            .into(),
            PacketStateKind::Ack => AcksPath {
                port_id,
                channel_id,
                sequence,
            }
            .into(),
        };
        path.into_bytes()
    }

    fn channel_prefix(self, port_id: &PortId, channel_id: &ChannelId) -> String {
        match self {
            PacketStateKind::Commitment => commitments_prefix(port_id, channel_id),
            PacketStateKind::Receipt => receipts_prefix(port_id, channel_id),
            PacketStateKind::Ack => acks_prefix(port_id, channel_id),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            PacketStateKind::Commitment => COMMITMENTS_PREFIX,
            PacketStateKind::Receipt => RECEIPTS_PREFIX,
            PacketStateKind::Ack => ACKS_PREFIX,
        }
    }
}

fn key_to_string(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

fn parse_key(key: &[u8]) -> Result<Path, Error> {
    let raw = core::str::from_utf8(key)
        .map_err(|e| Error::invalid_stored_value(key_to_string(key), e.to_string()))?;
    Path::from_str(raw).map_err(|e| Error::invalid_stored_value(raw.to_string(), e.to_string()))
}

fn decode_sequence(key: &[u8], value: &[u8]) -> Result<Sequence, Error> {
    Sequence::from_be_slice(value).ok_or_else(|| {
        Error::invalid_stored_value(
            key_to_string(key),
            format!("expected 8 big-endian bytes, found {}", value.len()),
        )
    })
}

/// The channel layer's view of a host [`KvStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelStore<S> {
    store: S,
}

impl<S: KvStore> ChannelStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // Channel identifier allocation

    pub fn next_channel_sequence(&self) -> Result<u64, Error> {
        let key = Path::from(NextChannelSequencePath).into_bytes();
        let value = self
            .store
            .get(&key)
            .ok_or_else(Error::missing_next_channel_sequence)?;
        decode_sequence(&key, &value).map(u64::from)
    }

    pub fn set_next_channel_sequence(&mut self, sequence: u64) {
        let key = Path::from(NextChannelSequencePath).into_bytes();
        self.store.set(key, sequence.to_be_bytes().to_vec());
    }

    /// Allocates `channel-<N>` from the persistent counter and advances the counter.
    pub fn generate_channel_identifier(&mut self) -> Result<ChannelId, Error> {
        let sequence = self.next_channel_sequence()?;
        let next = Sequence::from(sequence).increment()?;
        self.set_next_channel_sequence(next.into());
        let channel_id = ChannelId::new(sequence);
        trace!(%channel_id, "allocated channel identifier");
        Ok(channel_id)
    }

    // Channel ends

    pub fn channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelEnd>, Error> {
        let key = Path::from(ChannelEndsPath(port_id.clone(), *channel_id)).into_bytes();
        self.store
            .get(&key)
            .map(|bytes| {
                ChannelEnd::decode_vec(&bytes)
                    .map_err(|e| Error::invalid_stored_value(key_to_string(&key), e.to_string()))
            })
            .transpose()
    }

    pub fn set_channel(&mut self, port_id: &PortId, channel_id: &ChannelId, channel: &ChannelEnd) {
        let key = Path::from(ChannelEndsPath(port_id.clone(), *channel_id)).into_bytes();
        self.store.set(key, channel.encode_vec());
    }

    /// Every stored channel end, in key order.
    pub fn channels(&self) -> Result<Vec<IdentifiedChannelEnd>, Error> {
        self.store
            .prefix_iter(CHANNEL_ENDS_PREFIX.as_bytes())
            .into_iter()
            .map(|(key, value)| match parse_key(&key)? {
                Path::ChannelEnds(ChannelEndsPath(port_id, channel_id)) => {
                    let channel_end = ChannelEnd::decode_vec(&value).map_err(|e| {
                        Error::invalid_stored_value(key_to_string(&key), e.to_string())
                    })?;
                    Ok(IdentifiedChannelEnd::new(port_id, channel_id, channel_end))
                }
                _ => Err(Error::invalid_stored_value(
                    key_to_string(&key),
                    "not a channel end path".to_string(),
                )),
            })
            .collect()
    }

    /// The channels whose connection hop is `connection_id`.
    pub fn connection_channels(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<IdentifiedChannelEnd>, Error> {
        Ok(self
            .channels()?
            .into_iter()
            .filter(|c| c.channel_end.connection_hops().first() == Some(connection_id))
            .collect())
    }

    // Sequence counters

    fn sequence(
        &self,
        kind: SequenceKind,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Sequence>, Error> {
        let key = kind.key(port_id, channel_id);
        self.store
            .get(&key)
            .map(|value| decode_sequence(&key, &value))
            .transpose()
    }

    fn set_sequence(
        &mut self,
        kind: SequenceKind,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) {
        let key = kind.key(port_id, channel_id);
        self.store.set(key, sequence.to_be_bytes().to_vec());
    }

    fn sequences(&self, kind: SequenceKind) -> Result<Vec<PacketSequence>, Error> {
        self.store
            .prefix_iter(kind.prefix().as_bytes())
            .into_iter()
            .map(|(key, value)| {
                let (port_id, channel_id) = match parse_key(&key)? {
                    Path::SeqSends(SeqSendsPath(p, c))
                    | Path::SeqRecvs(SeqRecvsPath(p, c))
                    | Path::SeqAcks(SeqAcksPath(p, c)) => (p, c),
                    _ => {
                        return Err(Error::invalid_stored_value(
                            key_to_string(&key),
                            "not a sequence path".to_string(),
                        ))
                    }
                };
                Ok(PacketSequence {
                    port_id,
                    channel_id,
                    sequence: decode_sequence(&key, &value)?,
                })
            })
            .collect()
    }

    pub fn next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Sequence>, Error> {
        self.sequence(SequenceKind::Send, port_id, channel_id)
    }

    pub fn next_sequence_recv(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Sequence>, Error> {
        self.sequence(SequenceKind::Recv, port_id, channel_id)
    }

    pub fn next_sequence_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Sequence>, Error> {
        self.sequence(SequenceKind::Ack, port_id, channel_id)
    }

    pub fn set_next_sequence_send(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) {
        self.set_sequence(SequenceKind::Send, port_id, channel_id, seq)
    }

    pub fn set_next_sequence_recv(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) {
        self.set_sequence(SequenceKind::Recv, port_id, channel_id, seq)
    }

    pub fn set_next_sequence_ack(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        seq: Sequence,
    ) {
        self.set_sequence(SequenceKind::Ack, port_id, channel_id, seq)
    }

    pub fn send_sequences(&self) -> Result<Vec<PacketSequence>, Error> {
        self.sequences(SequenceKind::Send)
    }

    pub fn recv_sequences(&self) -> Result<Vec<PacketSequence>, Error> {
        self.sequences(SequenceKind::Recv)
    }

    pub fn ack_sequences(&self) -> Result<Vec<PacketSequence>, Error> {
        self.sequences(SequenceKind::Ack)
    }

    // Packet state

    fn packet_states_under(&self, prefix: &str) -> Result<Vec<PacketState>, Error> {
        self.store
            .prefix_iter(prefix.as_bytes())
            .into_iter()
            .map(|(key, data)| {
                let (port_id, channel_id, sequence) = match parse_key(&key)? {
                    Path::Commitments(CommitmentsPath {
                        port_id,
                        channel_id,
                        sequence,
                    })
                    | Path::Acks(AcksPath {
                        port_id,
                        channel_id,
                        sequence,
                    })
                    | Path::Receipts(ReceiptsPath {
                        port_id,
                        channel_id,
                        sequence,
                    }) => (port_id, channel_id, sequence),
                    _ => {
                        return Err(Error::invalid_stored_value(
                            key_to_string(&key),
                            "not a packet state path".to_string(),
                        ))
                    }
                };
                Ok(PacketState {
                    port_id,
                    channel_id,
                    sequence,
                    data,
                })
            })
            .collect()
    }

    /// Missing and zero-length commitments both read as `None`.
    pub fn packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<PacketCommitment> {
        self.store
            .get(&PacketStateKind::Commitment.key(port_id, channel_id, sequence))
            .filter(|bytes| !bytes.is_empty())
            .map(PacketCommitment::from)
    }

    pub fn has_packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> bool {
        self.packet_commitment(port_id, channel_id, sequence)
            .is_some()
    }

    pub fn set_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) {
        let key = PacketStateKind::Commitment.key(port_id, channel_id, sequence);
        self.store.set(key, commitment.into_vec());
    }

    pub fn delete_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) {
        let key = PacketStateKind::Commitment.key(port_id, channel_id, sequence);
        self.store.delete(&key);
    }

    pub fn packet_receipt(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Receipt> {
        self.store
            .get(&PacketStateKind::Receipt.key(port_id, channel_id, sequence))
            .map(|_| Receipt::Ok)
    }

    pub fn set_packet_receipt(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        receipt: &Receipt,
    ) {
        let key = PacketStateKind::Receipt.key(port_id, channel_id, sequence);
        self.store.set(key, receipt.as_bytes());
    }

    pub fn packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<AcknowledgementCommitment> {
        self.store
            .get(&PacketStateKind::Ack.key(port_id, channel_id, sequence))
            .filter(|bytes| !bytes.is_empty())
            .map(AcknowledgementCommitment::from)
    }

    pub fn has_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> bool {
        self.packet_acknowledgement(port_id, channel_id, sequence)
            .is_some()
    }

    pub fn set_packet_acknowledgement(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) {
        let key = PacketStateKind::Ack.key(port_id, channel_id, sequence);
        self.store.set(key, ack_commitment.into_vec());
    }

    /// The commitments of a channel, in ascending key order.
    ///
    /// Keys order lexicographically, so `10` sorts before `2`.
    pub fn packet_commitments(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(&PacketStateKind::Commitment.channel_prefix(port_id, channel_id))
    }

    pub fn packet_acknowledgements(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(&PacketStateKind::Ack.channel_prefix(port_id, channel_id))
    }

    pub fn packet_receipts(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(&PacketStateKind::Receipt.channel_prefix(port_id, channel_id))
    }

    pub fn all_packet_commitments(&self) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(PacketStateKind::Commitment.prefix())
    }

    pub fn all_packet_acknowledgements(&self) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(PacketStateKind::Ack.prefix())
    }

    pub fn all_packet_receipts(&self) -> Result<Vec<PacketState>, Error> {
        self.packet_states_under(PacketStateKind::Receipt.prefix())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics04_channel::channel::{Counterparty, Order, State};
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::version::Version;
    use crate::store::InMemoryStore;

    fn channel_on(connection_id: ConnectionId) -> ChannelEnd {
        ChannelEnd::new(
            State::Init,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), None),
            vec![connection_id],
            Version::ics20(),
        )
    }

    #[test]
    fn channel_identifiers_are_allocated_in_order() {
        let mut store = ChannelStore::new(InMemoryStore::default());
        assert!(store.generate_channel_identifier().is_err());

        store.set_next_channel_sequence(0);
        let first = store.generate_channel_identifier().unwrap();
        let second = store.generate_channel_identifier().unwrap();

        assert_eq!(first.to_string(), "channel-0");
        assert_eq!(second.to_string(), "channel-1");
        assert_eq!(store.next_channel_sequence().unwrap(), 2);
        assert_eq!(
            store.inner().get(b"nextChannelSequence"),
            Some(2u64.to_be_bytes().to_vec())
        );
    }

    #[test]
    fn exhausted_channel_counter_is_an_error() {
        let mut store = ChannelStore::new(InMemoryStore::default());
        store.set_next_channel_sequence(u64::MAX);

        let err = store.generate_channel_identifier().unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::SequenceOverflow(_)));
        assert_eq!(store.next_channel_sequence().unwrap(), u64::MAX);
    }

    #[test]
    fn channels_are_listed_and_filtered_by_connection() {
        let mut store = ChannelStore::new(InMemoryStore::default());
        let port_id = PortId::transfer();

        store.set_channel(&port_id, &ChannelId::new(0), &channel_on(ConnectionId::new(0)));
        store.set_channel(&port_id, &ChannelId::new(1), &channel_on(ConnectionId::new(1)));
        store.set_channel(&port_id, &ChannelId::new(2), &channel_on(ConnectionId::new(0)));

        assert_eq!(store.channels().unwrap().len(), 3);

        let on_zero: Vec<ChannelId> = store
            .connection_channels(&ConnectionId::new(0))
            .unwrap()
            .into_iter()
            .map(|c| c.channel_id)
            .collect();
        assert_eq!(on_zero, vec![ChannelId::new(0), ChannelId::new(2)]);

        assert_eq!(
            store.channel(&port_id, &ChannelId::new(7)).unwrap(),
            None
        );
    }

    #[test]
    fn sequences_are_stored_big_endian() {
        let mut store = ChannelStore::new(InMemoryStore::default());
        let (port_id, channel_id) = (PortId::transfer(), ChannelId::new(0));

        assert_eq!(store.next_sequence_recv(&port_id, &channel_id).unwrap(), None);
        store.set_next_sequence_recv(&port_id, &channel_id, 5.into());

        assert_eq!(
            store.inner().get(b"nextSequenceRecv/ports/transfer/channels/channel-0"),
            Some(vec![0, 0, 0, 0, 0, 0, 0, 5])
        );
        assert_eq!(
            store.next_sequence_recv(&port_id, &channel_id).unwrap(),
            Some(5.into())
        );
        assert_eq!(store.recv_sequences().unwrap().len(), 1);
        assert!(store.send_sequences().unwrap().is_empty());
    }

    #[test]
    fn packet_state_lifecycle() {
        let mut store = ChannelStore::new(InMemoryStore::default());
        let (port_id, channel_id) = (PortId::transfer(), ChannelId::new(0));
        let seq = Sequence::from(1);

        store.set_packet_commitment(&port_id, &channel_id, seq, vec![1, 2].into());
        assert!(store.has_packet_commitment(&port_id, &channel_id, seq));
        store.delete_packet_commitment(&port_id, &channel_id, seq);
        assert!(!store.has_packet_commitment(&port_id, &channel_id, seq));

        // A zero-length value reads as absent.
        store.set_packet_commitment(&port_id, &channel_id, seq, Vec::new().into());
        assert!(store.packet_commitment(&port_id, &channel_id, seq).is_none());

        store.set_packet_receipt(&port_id, &channel_id, seq, &Receipt::Ok);
        store.set_packet_receipt(&port_id, &channel_id, seq, &Receipt::Ok);
        assert_eq!(
            store.packet_receipt(&port_id, &channel_id, seq),
            Some(Receipt::Ok)
        );
        assert_eq!(
            store.inner().get(b"receipts/ports/transfer/channels/channel-0/sequences/1"),
            Some(vec![1])
        );

        store.set_packet_acknowledgement(&port_id, &channel_id, seq, vec![9].into());
        store.set_packet_acknowledgement(&port_id, &channel_id, 2.into(), vec![8].into());
        let acks = store.packet_acknowledgements(&port_id, &channel_id).unwrap();
        assert_eq!(acks.len(), 2);
        assert_eq!(acks[0].sequence, seq);
        assert_eq!(acks[1].data, vec![8]);
        assert!(store
            .packet_acknowledgements(&port_id, &ChannelId::new(1))
            .unwrap()
            .is_empty());
    }
}
