//----------------------------------------   Peer lookup     -----------------------------------------------------------

use crate::error::HostError;
use crate::types::{ConsensusState, PeerId};
use libprivacy::PublicKey;
use std::fmt::Debug;

pub trait PeerDirectory {
    /// Every connected peer that has announced `public_key` as its identity. An empty list means the key is known to
    /// no one we are connected to, which is not an error.
    fn peer_ids_from_public_key(&self, public_key: &PublicKey) -> Vec<PeerId>;
}

//----------------------------------------   Message routing    --------------------------------------------------------

pub trait MessageRouter {
    type Message: Clone + Debug + Send;

    fn push_message_to_all(&self, msg: Self::Message) -> Result<(), HostError>;

    fn push_message_to_peer(&self, msg: Self::Message, peer: &PeerId) -> Result<(), HostError>;

    fn push_message_to_shard(&self, msg: Self::Message, shard: u8) -> Result<(), HostError>;

    fn push_message_to_beacon(&self, msg: Self::Message) -> Result<(), HostError>;

    /// Sends to every peer registered under `public_key`. Fails with [`HostError::UnknownPublicKey`] if there are none.
    fn push_message_to_public_key(&self, msg: Self::Message, public_key: &PublicKey) -> Result<(), HostError>;
}

//----------------------------------------   Consensus state     -------------------------------------------------------

pub trait ConsensusStateSink {
    fn update_consensus_state(&self, state: ConsensusState);
}

/// Everything the consensus engine needs from the node it runs in.
pub trait ConsensusHost: PeerDirectory + MessageRouter + ConsensusStateSink {}
