//! The host key-value store the channel layer persists its state into.
//!
//! Keys are the ICS 24 path strings of [`crate::core::ics24_host::path`]; values are the raw
//! bytes stored under them. The host provides the store and is responsible for atomicity: a
//! failed operation is rolled back by discarding the write-set of its transaction.

mod memory;

pub use memory::InMemoryStore;

use prost::Message;

/// Byte-level access to the host store.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// A store able to prove the presence, or the absence, of a key to a counterparty light client.
pub trait ProvableStore: KvStore {
    /// Commitment to the whole content of the store.
    fn root_hash(&self) -> Vec<u8>;

    /// Encoded proof for `key`, of the presence of its value or of its absence.
    fn get_proof(&self, key: &[u8]) -> Vec<u8>;
}

/// Proof format of [`InMemoryStore`]: the key, and the value found under it if any.
///
/// It carries no cryptographic evidence; light clients that accept it trust the store that
/// produced it. It is meant for tests and local tooling only.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct StoreProof {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub exists: bool,
}

impl StoreProof {
    pub fn encode_vec(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    pub fn decode_vec(bytes: &[u8]) -> Result<Self, prost::DecodeError> {
        Self::decode(bytes)
    }
}
