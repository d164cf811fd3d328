use libprivacy::PublicKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Opaque network identity of a connected node. Several peers may be registered under one public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub String);

impl Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A snapshot of chain state exchanged between committee members.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Hex-encoded compressed public keys of the current committee, in committee order.
    pub current_committee: Vec<String>,
    pub candidate_list_merkle_hash: String,
    /// Best height per chain, beacon first.
    pub chains_height: Vec<u64>,
}

/// A validator's signature over a committee swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapSig {
    pub validator: String,
    pub swap_sig: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Observer,
    Pending,
    ShardValidator,
    BeaconValidator,
}

/// The node's view of who validates what, pushed from the consensus engine to the host whenever it changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    pub role: Role,
    pub user_public_key: Option<PublicKey>,
    pub current_shard: Option<u8>,
    pub beacon_committee: Vec<PublicKey>,
    pub shard_committee: HashMap<u8, Vec<PublicKey>>,
}

impl ConsensusState {
    /// Every key the host should stay connected to: the beacon committee plus, when the node sits in a shard, that
    /// shard's committee. Each key appears once, in order of first appearance.
    pub fn relevant_keys(&self) -> Vec<PublicKey> {
        let shard_members = self.current_shard.and_then(|shard| self.shard_committee.get(&shard));
        let mut keys = Vec::new();
        for key in self.beacon_committee.iter().chain(shard_members.into_iter().flatten()) {
            if !keys.contains(key) {
                keys.push(*key);
            }
        }
        keys
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use libprivacy::{p256_shared, KeyHierarchy};

    fn key(seed: u8) -> PublicKey {
        let keys = KeyHierarchy::new(p256_shared());
        keys.generate_public_key(&keys.generate_spending_key(&[seed])).unwrap()
    }

    #[test]
    fn chain_info_serialization() {
        let info = ChainInfo {
            current_committee: vec![key(1).as_hex(), key(2).as_hex()],
            candidate_list_merkle_hash: "00".repeat(32),
            chains_height: vec![10, 4, 7],
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"chains_height\":[10,4,7]"));
        let back: ChainInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn consensus_state_serialization() {
        let mut state = ConsensusState {
            role: Role::ShardValidator,
            user_public_key: Some(key(1)),
            current_shard: Some(2),
            beacon_committee: vec![key(3)],
            ..Default::default()
        };
        state.shard_committee.insert(2, vec![key(1), key(4)]);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"role\":\"shard_validator\""));
        assert!(json.contains(&key(1).as_hex()));
        let back: ConsensusState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn relevant_keys_cover_beacon_and_own_shard() {
        let mut state = ConsensusState {
            current_shard: Some(0),
            beacon_committee: vec![key(1), key(2)],
            ..Default::default()
        };
        state.shard_committee.insert(0, vec![key(2), key(3)]);
        state.shard_committee.insert(1, vec![key(4)]);
        assert_eq!(state.relevant_keys(), vec![key(1), key(2), key(3)]);
        state.current_shard = None;
        assert_eq!(state.relevant_keys(), vec![key(1), key(2)]);
    }

    #[test]
    fn relevant_keys_are_deduplicated() {
        let mut state = ConsensusState {
            current_shard: Some(0),
            beacon_committee: vec![key(1), key(1)],
            ..Default::default()
        };
        state.shard_committee.insert(0, vec![key(2), key(2)]);
        assert_eq!(state.relevant_keys(), vec![key(1), key(2)]);
        state.shard_committee.insert(0, vec![key(2), key(1), key(2), key(3)]);
        assert_eq!(state.relevant_keys(), vec![key(1), key(2), key(3)]);
    }

    #[test]
    fn peer_id_display() {
        let id = PeerId::from("node-7");
        assert_eq!(id.to_string(), "node-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"node-7\"");
    }
}
