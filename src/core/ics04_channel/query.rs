//! Read-only projections of the channel stores served to relayers and explorers.
//!
//! Every response records the host height it was read at. When a proof is requested it proves
//! the value (or its absence) under its ICS 24 path at that height.

use tracing::trace;

use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics04_channel::channel::{ChannelEnd, IdentifiedChannelEnd};
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{PacketState, Sequence};
use crate::core::ics04_channel::store::ChannelStore;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::path::{
    AcksPath, ChannelEndsPath, CommitmentsPath, ReceiptsPath, SeqRecvsPath,
};
use crate::core::ics24_host::Path;
use crate::query::{paginate, IncludeProof, PageRequest, PageResponse};
use crate::store::ProvableStore;
use crate::Height;

/// A host able to answer channel queries: the channel reader, plus the provable store the
/// channel state lives in.
pub trait QueryContext: ChannelReader {
    type Store: ProvableStore;

    fn channel_store(&self) -> &ChannelStore<Self::Store>;
}

fn prove<Ctx: QueryContext>(
    ctx: &Ctx,
    path: impl Into<Path>,
    include_proof: IncludeProof,
) -> Option<Vec<u8>> {
    include_proof
        .to_bool()
        .then(|| ctx.channel_store().inner().get_proof(&path.into().into_bytes()))
}

fn non_zero(sequence: Sequence) -> Result<Sequence, Error> {
    if sequence.is_zero() {
        Err(Error::zero_packet_sequence())
    } else {
        Ok(sequence)
    }
}

fn packet_states_page(
    states: Vec<PacketState>,
    to_path: impl Fn(&PacketState) -> Path,
    pagination: Option<&PageRequest>,
) -> Result<(Vec<PacketState>, PageResponse), Error> {
    let entries = states
        .into_iter()
        .map(|state| (to_path(&state).into_bytes(), state))
        .collect();
    paginate(entries, pagination)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryChannelRequest {
    pub port_id: PortId,
    pub channel_id: ChannelId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryChannelResponse {
    pub channel: ChannelEnd,
    pub proof: Option<Vec<u8>>,
    pub proof_height: Height,
}

pub fn query_channel<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryChannelRequest,
    include_proof: IncludeProof,
) -> Result<QueryChannelResponse, Error> {
    let channel = ctx.channel_end(&request.port_id, &request.channel_id)?;
    let proof = prove(
        ctx,
        ChannelEndsPath(request.port_id.clone(), request.channel_id),
        include_proof,
    );

    Ok(QueryChannelResponse {
        channel,
        proof,
        proof_height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryChannelsRequest {
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryChannelsResponse {
    pub channels: Vec<IdentifiedChannelEnd>,
    pub pagination: PageResponse,
    pub height: Height,
}

fn channels_page(
    channels: Vec<IdentifiedChannelEnd>,
    pagination: Option<&PageRequest>,
) -> Result<(Vec<IdentifiedChannelEnd>, PageResponse), Error> {
    let entries = channels
        .into_iter()
        .map(|c| {
            let key = Path::from(ChannelEndsPath(c.port_id.clone(), c.channel_id)).into_bytes();
            (key, c)
        })
        .collect();
    paginate(entries, pagination)
}

/// Every channel of the host, one page at a time.
pub fn query_channels<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryChannelsRequest,
) -> Result<QueryChannelsResponse, Error> {
    let (channels, pagination) =
        channels_page(ctx.channel_store().channels()?, request.pagination.as_ref())?;

    trace!(count = channels.len(), "queried channels");

    Ok(QueryChannelsResponse {
        channels,
        pagination,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConnectionChannelsRequest {
    pub connection_id: ConnectionId,
    pub pagination: Option<PageRequest>,
}

/// The channels running over one connection, one page at a time.
pub fn query_connection_channels<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryConnectionChannelsRequest,
) -> Result<QueryChannelsResponse, Error> {
    let channels = ctx
        .channel_store()
        .connection_channels(&request.connection_id)?;
    let (channels, pagination) = channels_page(channels, request.pagination.as_ref())?;

    Ok(QueryChannelsResponse {
        channels,
        pagination,
        height: ctx.host_height(),
    })
}

#[derive(Debug)]
pub struct QueryChannelClientStateResponse {
    pub client_id: ClientId,
    pub client_state: Box<dyn ClientState>,
    pub height: Height,
}

/// The client backing the connection of a channel.
pub fn query_channel_client_state<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryChannelRequest,
) -> Result<QueryChannelClientStateResponse, Error> {
    let (client_id, client_state) =
        ctx.channel_client_state(&request.port_id, &request.channel_id)?;

    Ok(QueryChannelClientStateResponse {
        client_id,
        client_state,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryChannelConsensusStateRequest {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub consensus_height: Height,
}

#[derive(Debug)]
pub struct QueryChannelConsensusStateResponse {
    pub client_id: ClientId,
    pub consensus_state: Box<dyn ConsensusState>,
    pub height: Height,
}

/// The consensus state, at `consensus_height`, of the client backing a channel.
pub fn query_channel_consensus_state<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryChannelConsensusStateRequest,
) -> Result<QueryChannelConsensusStateResponse, Error> {
    let (client_id, _) = ctx.channel_client_state(&request.port_id, &request.channel_id)?;
    let consensus_state = ctx.client_consensus_state(&client_id, request.consensus_height)?;

    Ok(QueryChannelConsensusStateResponse {
        client_id,
        consensus_state,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketRequest {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketCommitmentResponse {
    pub commitment: PacketCommitment,
    pub proof: Option<Vec<u8>>,
    pub proof_height: Height,
}

pub fn query_packet_commitment<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryPacketRequest,
    include_proof: IncludeProof,
) -> Result<QueryPacketCommitmentResponse, Error> {
    let sequence = non_zero(request.sequence)?;

    let commitment = ctx
        .get_packet_commitment(&request.port_id, &request.channel_id, sequence)
        .ok_or_else(|| Error::packet_commitment_not_found(sequence))?;
    let proof = prove(
        ctx,
        CommitmentsPath {
            port_id: request.port_id.clone(),
            channel_id: request.channel_id,
            sequence,
        },
        include_proof,
    );

    Ok(QueryPacketCommitmentResponse {
        commitment,
        proof,
        proof_height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketStatesRequest {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketStatesResponse {
    pub states: Vec<PacketState>,
    pub pagination: PageResponse,
    pub height: Height,
}

/// The outstanding commitments of a channel, in store key order.
pub fn query_packet_commitments<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryPacketStatesRequest,
) -> Result<QueryPacketStatesResponse, Error> {
    let (states, pagination) = packet_states_page(
        ctx.channel_store()
            .packet_commitments(&request.port_id, &request.channel_id)?,
        |s| {
            CommitmentsPath {
                port_id: s.port_id.clone(),
                channel_id: s.channel_id,
                sequence: s.sequence,
            }
            .into()
        },
        request.pagination.as_ref(),
    )?;

    Ok(QueryPacketStatesResponse {
        states,
        pagination,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketReceiptResponse {
    pub received: bool,
    pub proof: Option<Vec<u8>>,
    pub proof_height: Height,
}

/// Whether a receipt is stored; the proof attests either the receipt or its absence.
pub fn query_packet_receipt<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryPacketRequest,
    include_proof: IncludeProof,
) -> Result<QueryPacketReceiptResponse, Error> {
    let sequence = non_zero(request.sequence)?;

    let received = ctx
        .get_packet_receipt(&request.port_id, &request.channel_id, sequence)
        .is_some();
    let proof = prove(
        ctx,
        ReceiptsPath {
            port_id: request.port_id.clone(),
            channel_id: request.channel_id,
            sequence,
        },
        include_proof,
    );

    Ok(QueryPacketReceiptResponse {
        received,
        proof,
        proof_height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPacketAcknowledgementResponse {
    pub acknowledgement: AcknowledgementCommitment,
    pub proof: Option<Vec<u8>>,
    pub proof_height: Height,
}

pub fn query_packet_acknowledgement<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryPacketRequest,
    include_proof: IncludeProof,
) -> Result<QueryPacketAcknowledgementResponse, Error> {
    let sequence = non_zero(request.sequence)?;

    let acknowledgement = ctx
        .get_packet_acknowledgement(&request.port_id, &request.channel_id, sequence)
        .ok_or_else(|| Error::packet_acknowledgement_not_found(sequence))?;
    let proof = prove(
        ctx,
        AcksPath {
            port_id: request.port_id.clone(),
            channel_id: request.channel_id,
            sequence,
        },
        include_proof,
    );

    Ok(QueryPacketAcknowledgementResponse {
        acknowledgement,
        proof,
        proof_height: ctx.host_height(),
    })
}

/// The acknowledgements written on a channel, in store key order.
pub fn query_packet_acknowledgements<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryPacketStatesRequest,
) -> Result<QueryPacketStatesResponse, Error> {
    let (states, pagination) = packet_states_page(
        ctx.channel_store()
            .packet_acknowledgements(&request.port_id, &request.channel_id)?,
        |s| {
            AcksPath {
                port_id: s.port_id.clone(),
                channel_id: s.channel_id,
                sequence: s.sequence,
            }
            .into()
        },
        request.pagination.as_ref(),
    )?;

    Ok(QueryPacketStatesResponse {
        states,
        pagination,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySequencesRequest {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequences: Vec<Sequence>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySequencesResponse {
    pub sequences: Vec<Sequence>,
    pub height: Height,
}

fn filter_sequences(
    request: &QuerySequencesRequest,
    keep: impl Fn(Sequence) -> bool,
) -> Result<Vec<Sequence>, Error> {
    request
        .sequences
        .iter()
        .map(|seq| non_zero(*seq))
        .filter(|seq| seq.as_ref().map_or(true, |seq| keep(*seq)))
        .collect()
}

/// Run on the receiving chain with the sequences of the commitments found on the sender:
/// returns those for which no receipt is stored here yet.
pub fn query_unreceived_packets<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QuerySequencesRequest,
) -> Result<QuerySequencesResponse, Error> {
    let sequences = filter_sequences(request, |seq| {
        ctx.get_packet_receipt(&request.port_id, &request.channel_id, seq)
            .is_none()
    })?;

    Ok(QuerySequencesResponse {
        sequences,
        height: ctx.host_height(),
    })
}

/// Run on the sending chain with the sequences of the acknowledgements found on the receiver:
/// returns those whose commitment is still stored here, i.e. whose ack was not processed yet.
pub fn query_unreceived_acks<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QuerySequencesRequest,
) -> Result<QuerySequencesResponse, Error> {
    let sequences = filter_sequences(request, |seq| {
        ctx.get_packet_commitment(&request.port_id, &request.channel_id, seq)
            .is_some()
    })?;

    Ok(QuerySequencesResponse {
        sequences,
        height: ctx.host_height(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryNextSequenceResponse {
    pub next_sequence_receive: Sequence,
    pub proof: Option<Vec<u8>>,
    pub proof_height: Height,
}

pub fn query_next_sequence_receive<Ctx: QueryContext>(
    ctx: &Ctx,
    request: &QueryChannelRequest,
    include_proof: IncludeProof,
) -> Result<QueryNextSequenceResponse, Error> {
    let next_sequence_receive = ctx.get_next_sequence_recv(&request.port_id, &request.channel_id)?;
    let proof = prove(
        ctx,
        SeqRecvsPath(request.port_id.clone(), request.channel_id),
        include_proof,
    );

    Ok(QueryNextSequenceResponse {
        next_sequence_receive,
        proof,
        proof_height: ctx.host_height(),
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics02_client::client_state::ClientState;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{Counterparty, Order, State};
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::Version;
    use crate::core::ics23_commitment::commitment::{
        CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
    };
    use crate::mock::client_state::MockClientState;
    use crate::mock::context::MockContext;
    use crate::mock::header::MockHeader;
    use crate::test_utils::get_dummy_connection_end;

    fn open_channel(connection_id: ConnectionId) -> ChannelEnd {
        ChannelEnd::new(
            State::Open,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), Some(ChannelId::new(0))),
            vec![connection_id],
            Version::ics20(),
        )
    }

    fn context() -> MockContext {
        let mut ctx = MockContext::default()
            .with_client(&ClientId::default(), Height::new(0, 5).unwrap())
            .with_connection(
                ConnectionId::default(),
                get_dummy_connection_end(ConnectionState::Open),
            )
            .with_port(PortId::transfer());

        for i in 0..3 {
            ctx = ctx.with_channel(
                PortId::transfer(),
                ChannelId::new(i),
                open_channel(ConnectionId::new(i % 2)),
            );
        }

        for seq in [1u64, 2, 10] {
            ctx = ctx.with_packet_commitment(
                PortId::transfer(),
                ChannelId::new(0),
                seq.into(),
                vec![seq as u8; 32].into(),
            );
        }
        ctx.with_packet_receipt(PortId::transfer(), ChannelId::new(0), 2.into())
            .with_packet_acknowledgement(
                PortId::transfer(),
                ChannelId::new(0),
                2.into(),
                vec![9; 32].into(),
            )
    }

    #[test]
    fn channel_queries() {
        let ctx = context();

        let res = query_channel(
            &ctx,
            &QueryChannelRequest {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(1),
            },
            IncludeProof::No,
        )
        .unwrap();
        assert_eq!(res.channel, open_channel(ConnectionId::new(1)));
        assert!(res.proof.is_none());
        assert_eq!(res.proof_height, ctx.host_height());

        let err = query_channel(
            &ctx,
            &QueryChannelRequest {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(7),
            },
            IncludeProof::Yes,
        )
        .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ChannelNotFound(_)));

        let first = query_channels(
            &ctx,
            &QueryChannelsRequest {
                pagination: Some(PageRequest {
                    limit: 2,
                    ..Default::default()
                }),
            },
        )
        .unwrap();
        assert_eq!(first.channels.len(), 2);
        assert!(!first.pagination.next_key.is_empty());

        let rest = query_channels(
            &ctx,
            &QueryChannelsRequest {
                pagination: Some(PageRequest {
                    key: first.pagination.next_key,
                    limit: 2,
                    ..Default::default()
                }),
            },
        )
        .unwrap();
        assert_eq!(rest.channels.len(), 1);
        assert!(rest.pagination.next_key.is_empty());

        let on_connection = query_connection_channels(
            &ctx,
            &QueryConnectionChannelsRequest {
                connection_id: ConnectionId::default(),
                pagination: None,
            },
        )
        .unwrap();
        let ids: Vec<ChannelId> = on_connection.channels.iter().map(|c| c.channel_id).collect();
        assert_eq!(ids, vec![ChannelId::new(0), ChannelId::new(2)]);
    }

    #[test]
    fn channel_client_queries() {
        let ctx = context();
        let request = QueryChannelRequest {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
        };

        let res = query_channel_client_state(&ctx, &request).unwrap();
        assert_eq!(res.client_id, ClientId::default());
        assert_eq!(res.client_state.latest_height(), Height::new(0, 5).unwrap());

        let consensus = query_channel_consensus_state(
            &ctx,
            &QueryChannelConsensusStateRequest {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(0),
                consensus_height: Height::new(0, 5).unwrap(),
            },
        )
        .unwrap();
        assert_eq!(
            consensus.consensus_state.timestamp(),
            MockHeader::new(Height::new(0, 5).unwrap()).timestamp()
        );

        assert!(query_channel_consensus_state(
            &ctx,
            &QueryChannelConsensusStateRequest {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(0),
                consensus_height: Height::new(0, 4).unwrap(),
            },
        )
        .is_err());
    }

    #[test]
    fn packet_state_queries() {
        let ctx = context();
        let packet = |seq: u64| QueryPacketRequest {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
            sequence: seq.into(),
        };

        let res = query_packet_commitment(&ctx, &packet(1), IncludeProof::Yes).unwrap();
        assert_eq!(res.commitment, PacketCommitment::from(vec![1u8; 32]));

        // The proof is accepted by a counterparty client tracking this context.
        let client = MockClientState::new(MockHeader::new(res.proof_height));
        client
            .verify_packet_data(
                res.proof_height,
                &CommitmentPrefix::default(),
                &CommitmentProofBytes::try_from(res.proof.unwrap()).unwrap(),
                &CommitmentRoot::from(ctx.root_hash()),
                &PortId::transfer(),
                &ChannelId::new(0),
                1.into(),
                res.commitment,
            )
            .unwrap();

        let err = query_packet_commitment(&ctx, &packet(0), IncludeProof::No).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ZeroPacketSequence(_)));
        let err = query_packet_commitment(&ctx, &packet(3), IncludeProof::No).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::PacketCommitmentNotFound(_)));

        assert!(query_packet_receipt(&ctx, &packet(2), IncludeProof::No).unwrap().received);
        let absent = query_packet_receipt(&ctx, &packet(1), IncludeProof::Yes).unwrap();
        assert!(!absent.received);
        assert!(absent.proof.is_some());

        let ack = query_packet_acknowledgement(&ctx, &packet(2), IncludeProof::No).unwrap();
        assert_eq!(
            ack.acknowledgement,
            AcknowledgementCommitment::from(vec![9u8; 32])
        );
        let err = query_packet_acknowledgement(&ctx, &packet(1), IncludeProof::No).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::PacketAcknowledgementNotFound(_)));

        let states = QueryPacketStatesRequest {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
            pagination: None,
        };
        let commitments = query_packet_commitments(&ctx, &states).unwrap();
        // store keys order lexicographically: 1, 10, 2
        let seqs: Vec<u64> = commitments.states.iter().map(|s| s.sequence.into()).collect();
        assert_eq!(seqs, vec![1, 10, 2]);
        assert_eq!(commitments.pagination.total, 3);

        let acks = query_packet_acknowledgements(&ctx, &states).unwrap();
        assert_eq!(acks.states.len(), 1);

        let next = query_next_sequence_receive(
            &ctx,
            &QueryChannelRequest {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(0),
            },
            IncludeProof::Yes,
        )
        .unwrap();
        assert_eq!(next.next_sequence_receive, Sequence::from(1));
        assert!(next.proof.is_some());
    }

    #[test]
    fn unreceived_queries() {
        let ctx = context();
        let request = |seqs: Vec<u64>| QuerySequencesRequest {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
            sequences: seqs.into_iter().map(Sequence::from).collect(),
        };

        let unreceived = query_unreceived_packets(&ctx, &request(vec![1, 2, 3])).unwrap();
        assert_eq!(
            unreceived.sequences,
            vec![Sequence::from(1), Sequence::from(3)]
        );

        let unacked = query_unreceived_acks(&ctx, &request(vec![1, 2, 3, 10])).unwrap();
        assert_eq!(
            unacked.sequences,
            vec![Sequence::from(1), Sequence::from(2), Sequence::from(10)]
        );

        let err = query_unreceived_packets(&ctx, &request(vec![1, 0])).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ZeroPacketSequence(_)));
    }
}
