//! The seam between the BFT consensus engine and the node hosting it.
//!
//! Consensus never touches the network directly. It is handed a [`ConsensusHost`] and identifies committee members by
//! their compressed [`PublicKey`](libprivacy::PublicKey), relying on the key hierarchy's guarantee that one spending key
//! always yields the same 33 bytes.

pub mod committee;
pub mod error;
pub mod host;
pub mod recording_host;
pub mod types;

pub use committee::Committee;
pub use error::HostError;
pub use host::ConsensusHost;
pub use recording_host::{Delivery, RecordingHost};
pub use types::{ChainInfo, ConsensusState, PeerId, Role, SwapSig};
