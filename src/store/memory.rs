use alloc::collections::BTreeMap;

use sha2::{Digest, Sha256};

use super::{KvStore, ProvableStore, StoreProof};

/// An in-memory store keyed in byte order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl ProvableStore for InMemoryStore {
    /// Hash over every length-prefixed key and value, in key order.
    fn root_hash(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        for (k, v) in self.entries.iter() {
            hasher.update((k.len() as u64).to_be_bytes());
            hasher.update(k);
            hasher.update((v.len() as u64).to_be_bytes());
            hasher.update(v);
        }
        hasher.finalize().to_vec()
    }

    fn get_proof(&self, key: &[u8]) -> Vec<u8> {
        let value = self.entries.get(key);
        StoreProof {
            key: String::from_utf8_lossy(key).into_owned(),
            value: value.cloned().unwrap_or_default(),
            exists: value.is_some(),
        }
        .encode_vec()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn prefix_iteration_is_ordered_and_bounded() {
        let mut store = InMemoryStore::default();
        store.set(b"acks/b".to_vec(), vec![2]);
        store.set(b"acks/a".to_vec(), vec![1]);
        store.set(b"ackz".to_vec(), vec![3]);
        store.set(b"commitments/a".to_vec(), vec![4]);

        let found: Vec<_> = store
            .prefix_iter(b"acks/")
            .into_iter()
            .map(|(_, v)| v[0])
            .collect();
        assert_eq!(found, vec![1, 2]);

        store.delete(b"acks/a");
        assert!(!store.has(b"acks/a"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn proofs_record_presence_and_absence() {
        let mut store = InMemoryStore::default();
        let empty_root = store.root_hash();
        store.set(b"k".to_vec(), b"v".to_vec());
        assert_ne!(store.root_hash(), empty_root);

        let present = StoreProof::decode_vec(&store.get_proof(b"k")).unwrap();
        assert!(present.exists);
        assert_eq!(present.key, "k");
        assert_eq!(present.value, b"v".to_vec());

        let absent = StoreProof::decode_vec(&store.get_proof(b"missing")).unwrap();
        assert!(!absent.exists);
        assert!(absent.value.is_empty());
    }
}
