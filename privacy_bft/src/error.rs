use crate::types::PeerId;
use libprivacy::{CryptoError, PublicKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("No connected peer with id {0}")]
    UnknownPeer(PeerId),
    #[error("No peers known for public key {0}")]
    UnknownPublicKey(PublicKey),
    #[error("No route to shard {0}")]
    UnknownShard(u8),
    #[error("Invalid committee member key: {0}")]
    InvalidMemberKey(#[from] CryptoError),
}
