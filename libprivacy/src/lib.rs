//! Key hierarchy and point encodings for shielded payments.
//!
//! - [`curve`]: curve parameters and scalar multiplication.
//! - [`codec`]: 33-byte compressed (and 64-byte uncompressed) point encodings.
//! - [`commitment`]: 34-byte tagged commitment encoding.
//! - [`keys`]: spending key → public/receiving/transmission keys → viewing key and payment address.
//! - [`random`]: the secure randomness source used by key derivation.

pub mod codec;
pub mod commitment;
pub mod curve;
pub mod error;
pub mod keys;
pub mod point;
pub mod random;

pub use codec::{compress_point, decompress_point, CompressedPoint};
pub use commitment::{compress_commitment, decompress_commitment, CompressedCommitment};
pub use curve::{p256_shared, CurveParams};
pub use error::CryptoError;
pub use keys::{
    KeyHierarchy, PaymentAddress, PaymentInfo, PublicKey, ReceivingKey, SpendingKey, TransmissionKey, ViewingKey,
};
pub use point::EllipticPoint;
