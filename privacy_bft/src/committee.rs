use crate::error::HostError;
use crate::host::{MessageRouter, PeerDirectory};
use crate::types::ChainInfo;
use libprivacy::{CryptoError, CurveParams, KeyHierarchy, PublicKey, SpendingKey};
use log::*;
use serde::{Deserialize, Serialize};

/// An ordered set of validators identified by their compressed public keys. Membership is byte equality on the
/// 33-byte encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Committee {
    members: Vec<PublicKey>,
}

impl Committee {
    /// Builds a committee, dropping repeated keys but keeping the order of first appearance.
    pub fn new(keys: impl IntoIterator<Item = PublicKey>) -> Self {
        let mut members = Vec::new();
        for key in keys {
            if !members.contains(&key) {
                members.push(key);
            }
        }
        Self { members }
    }

    pub fn from_spending_keys(keys: &KeyHierarchy<'_>, spending_keys: &[SpendingKey]) -> Result<Self, CryptoError> {
        let members = spending_keys.iter().map(|sk| keys.generate_public_key(sk)).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(members))
    }

    /// Parses the hex-encoded member list carried in [`ChainInfo`], checking that each entry is a point on `curve`.
    /// A malformed entry fails with [`HostError::InvalidMemberKey`].
    pub fn from_chain_info(curve: &CurveParams, info: &ChainInfo) -> Result<Self, HostError> {
        let mut members = Vec::with_capacity(info.current_committee.len());
        for hex in &info.current_committee {
            let key = PublicKey::from_hex(hex)?;
            key.to_point(curve)?;
            members.push(key);
        }
        Ok(Self::new(members))
    }

    pub fn to_hex_list(&self) -> Vec<String> {
        self.members.iter().map(PublicKey::as_hex).collect()
    }

    pub fn contains(&self, key: &PublicKey) -> bool {
        self.members.contains(key)
    }

    pub fn index_of(&self, key: &PublicKey) -> Option<usize> {
        self.members.iter().position(|k| k == key)
    }

    pub fn members(&self) -> &[PublicKey] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The number of votes needed for a decision: strictly more than two thirds of the committee.
    pub fn quorum(&self) -> usize {
        self.members.len() * 2 / 3 + 1
    }

    /// Sends `msg` to every member except `me`. Members with no connected peers are skipped and returned so the caller
    /// can decide whether the shortfall matters.
    pub fn broadcast<H: PeerDirectory + MessageRouter>(
        &self,
        host: &H,
        msg: H::Message,
        me: Option<&PublicKey>,
    ) -> Result<Vec<PublicKey>, HostError> {
        let mut unreachable = Vec::new();
        for member in self.members.iter().filter(|m| Some(*m) != me) {
            if host.peer_ids_from_public_key(member).is_empty() {
                debug!("Committee member {member} has no connected peers");
                unreachable.push(*member);
                continue;
            }
            host.push_message_to_public_key(msg.clone(), member)?;
        }
        Ok(unreachable)
    }
}
