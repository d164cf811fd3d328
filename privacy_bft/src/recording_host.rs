//----------------------------------------   Recording Host  -----------------------------------------------------------

use crate::error::HostError;
use crate::host::{ConsensusHost, ConsensusStateSink, MessageRouter, PeerDirectory};
use crate::types::{ConsensusState, PeerId};
use libprivacy::PublicKey;
use log::*;
use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where a message was pushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery<M> {
    All(M),
    Peer(PeerId, M),
    Shard(u8, M),
    Beacon(M),
    PublicKey(PublicKey, M),
}

struct Inner<M> {
    peers: HashMap<PublicKey, Vec<PeerId>>,
    shards: Vec<u8>,
    deliveries: Vec<Delivery<M>>,
    states: Vec<ConsensusState>,
}

/// An in-memory [`ConsensusHost`] that records everything pushed to it instead of sending it anywhere. Useful for
/// driving consensus logic in tests and for dry runs.
pub struct RecordingHost<M> {
    inner: Mutex<Inner<M>>,
    _message: PhantomData<fn(M)>,
}

impl<M> Default for RecordingHost<M> {
    fn default() -> Self {
        let inner = Inner { peers: HashMap::new(), shards: Vec::new(), deliveries: Vec::new(), states: Vec::new() };
        Self { inner: Mutex::new(inner), _message: PhantomData }
    }
}

impl<M: Clone> RecordingHost<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<M>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_peer(&self, public_key: PublicKey, peer: PeerId) {
        let mut inner = self.lock();
        let peers = inner.peers.entry(public_key).or_default();
        if !peers.contains(&peer) {
            peers.push(peer);
        }
    }

    pub fn add_shard(&self, shard: u8) {
        let mut inner = self.lock();
        if !inner.shards.contains(&shard) {
            inner.shards.push(shard);
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery<M>> {
        self.lock().deliveries.clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain_deliveries(&self) -> Vec<Delivery<M>> {
        std::mem::take(&mut self.lock().deliveries)
    }

    pub fn latest_state(&self) -> Option<ConsensusState> {
        self.lock().states.last().cloned()
    }

    pub fn state_updates(&self) -> usize {
        self.lock().states.len()
    }

    fn record(&self, delivery: Delivery<M>) {
        self.lock().deliveries.push(delivery);
    }

    fn is_known_peer(&self, peer: &PeerId) -> bool {
        self.lock().peers.values().any(|peers| peers.contains(peer))
    }
}

impl<M: Clone> PeerDirectory for RecordingHost<M> {
    fn peer_ids_from_public_key(&self, public_key: &PublicKey) -> Vec<PeerId> {
        self.lock().peers.get(public_key).cloned().unwrap_or_default()
    }
}

impl<M: Clone + Debug + Send> MessageRouter for RecordingHost<M> {
    type Message = M;

    fn push_message_to_all(&self, msg: M) -> Result<(), HostError> {
        info!("RecordingHost: Broadcasting {msg:?}");
        self.record(Delivery::All(msg));
        Ok(())
    }

    fn push_message_to_peer(&self, msg: M, peer: &PeerId) -> Result<(), HostError> {
        if !self.is_known_peer(peer) {
            warn!("RecordingHost: Dropping message for unknown peer {peer}");
            return Err(HostError::UnknownPeer(peer.clone()));
        }
        info!("RecordingHost: Sending {msg:?} to peer {peer}");
        self.record(Delivery::Peer(peer.clone(), msg));
        Ok(())
    }

    fn push_message_to_shard(&self, msg: M, shard: u8) -> Result<(), HostError> {
        if !self.lock().shards.contains(&shard) {
            warn!("RecordingHost: No route to shard {shard}");
            return Err(HostError::UnknownShard(shard));
        }
        info!("RecordingHost: Sending {msg:?} to shard {shard}");
        self.record(Delivery::Shard(shard, msg));
        Ok(())
    }

    fn push_message_to_beacon(&self, msg: M) -> Result<(), HostError> {
        info!("RecordingHost: Sending {msg:?} to beacon");
        self.record(Delivery::Beacon(msg));
        Ok(())
    }

    fn push_message_to_public_key(&self, msg: M, public_key: &PublicKey) -> Result<(), HostError> {
        if self.peer_ids_from_public_key(public_key).is_empty() {
            warn!("RecordingHost: No peers for public key {public_key}");
            return Err(HostError::UnknownPublicKey(*public_key));
        }
        info!("RecordingHost: Sending {msg:?} to public key {public_key}");
        self.record(Delivery::PublicKey(*public_key, msg));
        Ok(())
    }
}

impl<M: Clone> ConsensusStateSink for RecordingHost<M> {
    fn update_consensus_state(&self, state: ConsensusState) {
        debug!("RecordingHost: Consensus state updated. Role: {:?}, shard: {:?}", state.role, state.current_shard);
        self.lock().states.push(state);
    }
}

impl<M: Clone + Debug + Send> ConsensusHost for RecordingHost<M> {}
