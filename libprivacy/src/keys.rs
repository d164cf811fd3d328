//! The key hierarchy.
//!
//! ```text
//!   seed ──► SpendingKey ──┬──► PublicKey ─────────────────────┬──► PaymentAddress { pk, tk }
//!                          └──► ReceivingKey ──► TransmissionKey┘
//!                                     └─────────────────────────────► ViewingKey { pk, rk }
//! ```
//!
//! Every step is a pure function of its input except [`KeyHierarchy::generate_transmission_key`], which mixes in fresh
//! randomness, so two payment addresses derived from the same spending key share a public key but not a transmission
//! key.

use crate::codec::{compress_point, decompress_point, CompressedPoint, COMPRESSED_POINT_LEN};
use crate::curve::CurveParams;
use crate::error::CryptoError;
use crate::point::EllipticPoint;
use crate::random::rand_bytes_from;
use log::{debug, trace};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::TryCryptoRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display};
use zeroize::Zeroizing;

pub const SPENDING_KEY_LEN: usize = 32;
pub const RECEIVING_KEY_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = COMPRESSED_POINT_LEN;
pub const TRANSMISSION_KEY_LEN: usize = COMPRESSED_POINT_LEN;
pub const VIEWING_KEY_LEN: usize = PUBLIC_KEY_LEN + RECEIVING_KEY_LEN;
pub const PAYMENT_ADDRESS_LEN: usize = PUBLIC_KEY_LEN + TRANSMISSION_KEY_LEN;

/// Bytes of randomness used for the ephemeral generator in transmission key derivation.
const EPHEMERAL_RANDOMNESS_LEN: usize = 256;

fn hash(data: &[u8]) -> Zeroizing<[u8; 32]> {
    Zeroizing::new(Sha256::digest(data).into())
}

fn hex_to_array<const N: usize>(hex: &str) -> Result<Zeroizing<[u8; N]>, CryptoError> {
    if hex.len() != 2 * N {
        return Err(CryptoError::invalid_length(N, hex.len() / 2));
    }
    let mut bytes = Zeroizing::new([0u8; N]);
    hex::decode_to_slice(hex, &mut bytes[..])?;
    Ok(bytes)
}

//------------------------------------------   Spending key   ---------------------------------------------------------

/// The root secret of the hierarchy: a 32-byte big-endian scalar strictly less than the curve order.
///
/// The bytes are zeroized on drop. `SpendingKey` does not implement `Serialize`; use [`SpendingKey::as_hex`] to export
/// it explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct SpendingKey(Zeroizing<[u8; SPENDING_KEY_LEN]>);

impl SpendingKey {
    /// Wraps raw key bytes, checking that they encode a scalar smaller than the order of `curve`.
    pub fn from_bytes(curve: &CurveParams, bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = <[u8; SPENDING_KEY_LEN]>::try_from(bytes)
            .map_err(|_| CryptoError::invalid_length(SPENDING_KEY_LEN, bytes.len()))?;
        let key = Zeroizing::new(key);
        if BigUint::from_bytes_be(key.as_slice()) >= *curve.order() {
            return Err(CryptoError::ScalarOutOfRange);
        }
        Ok(Self(key))
    }

    pub fn from_hex(curve: &CurveParams, hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_array::<SPENDING_KEY_LEN>(hex)?;
        Self::from_bytes(curve, bytes.as_slice())
    }

    pub fn as_bytes(&self) -> &[u8; SPENDING_KEY_LEN] {
        &self.0
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0.as_slice())
    }
}

impl Debug for SpendingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpendingKey(***)")
    }
}

//------------------------------------------   Receiving key   --------------------------------------------------------

/// `SHA-256(spending key)`. Lets the holder recognise and decrypt incoming transfers, but not spend them.
#[derive(Clone, PartialEq, Eq)]
pub struct ReceivingKey(Zeroizing<[u8; RECEIVING_KEY_LEN]>);

impl ReceivingKey {
    pub fn as_bytes(&self) -> &[u8; RECEIVING_KEY_LEN] {
        &self.0
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0.as_slice())
    }

    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        hex_to_array::<RECEIVING_KEY_LEN>(hex).map(Self)
    }
}

impl TryFrom<&[u8]> for ReceivingKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let key = <[u8; RECEIVING_KEY_LEN]>::try_from(bytes)
            .map_err(|_| CryptoError::invalid_length(RECEIVING_KEY_LEN, bytes.len()))?;
        Ok(Self(Zeroizing::new(key)))
    }
}

impl Debug for ReceivingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReceivingKey(***)")
    }
}

impl Serialize for ReceivingKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.as_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for ReceivingKey {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let hex_str = Zeroizing::new(String::deserialize(de)?);
        ReceivingKey::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------   Public and transmission keys   ---------------------------------------------

macro_rules! compressed_point_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(CompressedPoint);

        impl $name {
            pub fn as_compressed(&self) -> &CompressedPoint {
                &self.0
            }

            pub fn as_bytes(&self) -> &[u8; COMPRESSED_POINT_LEN] {
                self.0.as_bytes()
            }

            pub fn as_hex(&self) -> String {
                self.0.as_hex()
            }

            /// Parses a hex string. Only the length and hex encoding are checked; use [`Self::to_point`] to validate
            /// the point itself.
            pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
                CompressedPoint::from_hex(hex).map(Self)
            }

            /// Decompresses the key, validating it against `curve`.
            pub fn to_point(&self, curve: &CurveParams) -> Result<EllipticPoint, CryptoError> {
                self.0.to_point(curve)
            }
        }

        impl From<CompressedPoint> for $name {
            fn from(point: CompressedPoint) -> Self {
                Self(point)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = CryptoError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                CompressedPoint::try_from(bytes).map(Self)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_hex())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.as_hex())
            }
        }
    };
}

compressed_point_key!(
    /// `compress(spending key · G)`. Identical spending keys always give byte-identical public keys, so the encoding
    /// doubles as an identity.
    PublicKey
);

compressed_point_key!(
    /// A compressed point derived from the receiving key, used by senders to encrypt payment details.
    TransmissionKey
);

//----------------------------------------   Composite key structures   -----------------------------------------------

/// `{public key, receiving key}`: sees incoming transfers without being able to spend them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingKey {
    pub public_key: PublicKey,
    pub receiving_key: ReceivingKey,
}

impl ViewingKey {
    /// `public key (33 bytes) || receiving key (32 bytes)`
    pub fn to_bytes(&self) -> Zeroizing<[u8; VIEWING_KEY_LEN]> {
        let mut bytes = Zeroizing::new([0u8; VIEWING_KEY_LEN]);
        bytes[..PUBLIC_KEY_LEN].copy_from_slice(self.public_key.as_bytes());
        bytes[PUBLIC_KEY_LEN..].copy_from_slice(self.receiving_key.as_bytes());
        bytes
    }

    /// Inverse of [`Self::to_bytes`]. The public key must decompress to a point on `curve`.
    pub fn from_bytes(curve: &CurveParams, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != VIEWING_KEY_LEN {
            return Err(CryptoError::invalid_length(VIEWING_KEY_LEN, bytes.len()));
        }
        let public_key = PublicKey::try_from(&bytes[..PUBLIC_KEY_LEN])?;
        public_key.to_point(curve)?;
        let receiving_key = ReceivingKey::try_from(&bytes[PUBLIC_KEY_LEN..])?;
        Ok(Self { public_key, receiving_key })
    }
}

/// `{public key, transmission key}`: the shareable address payments are sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentAddress {
    pub public_key: PublicKey,
    pub transmission_key: TransmissionKey,
}

impl PaymentAddress {
    /// `public key (33 bytes) || transmission key (33 bytes)`
    pub fn to_bytes(&self) -> [u8; PAYMENT_ADDRESS_LEN] {
        let mut bytes = [0u8; PAYMENT_ADDRESS_LEN];
        bytes[..PUBLIC_KEY_LEN].copy_from_slice(self.public_key.as_bytes());
        bytes[PUBLIC_KEY_LEN..].copy_from_slice(self.transmission_key.as_bytes());
        bytes
    }

    /// Inverse of [`Self::to_bytes`]. Both embedded points must decompress to points on `curve`.
    pub fn from_bytes(curve: &CurveParams, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PAYMENT_ADDRESS_LEN {
            return Err(CryptoError::invalid_length(PAYMENT_ADDRESS_LEN, bytes.len()));
        }
        let public_key = PublicKey::try_from(&bytes[..PUBLIC_KEY_LEN])?;
        let transmission_key = TransmissionKey::try_from(&bytes[PUBLIC_KEY_LEN..])?;
        public_key.to_point(curve)?;
        transmission_key.to_point(curve)?;
        Ok(Self { public_key, transmission_key })
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Display for PaymentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

/// A single transfer instruction: pay `amount` to `payment_address`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_address: PaymentAddress,
    pub amount: u64,
}

impl PaymentInfo {
    pub fn new(payment_address: PaymentAddress, amount: u64) -> Self {
        Self { payment_address, amount }
    }
}

//------------------------------------------   Derivation   -----------------------------------------------------------

/// Derives keys on a fixed curve.
///
/// `KeyHierarchy` borrows its curve, so it is `Copy` and can be handed to as many threads as needed.
#[derive(Clone, Copy, Debug)]
pub struct KeyHierarchy<'c> {
    curve: &'c CurveParams,
}

impl<'c> KeyHierarchy<'c> {
    pub fn new(curve: &'c CurveParams) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &'c CurveParams {
        self.curve
    }

    /// Hashes `seed`, then re-hashes the digest until it is a valid scalar (strictly less than the curve order).
    ///
    /// On P-256 a second round is needed with probability about 2^-32.
    pub fn generate_spending_key(&self, seed: &[u8]) -> SpendingKey {
        let order = self.curve.order();
        let mut key = hash(seed);
        let mut rounds = 1;
        while BigUint::from_bytes_be(key.as_slice()) >= *order {
            key = hash(key.as_slice());
            rounds += 1;
        }
        debug!("Spending key derived after {rounds} hash round(s)");
        SpendingKey(key)
    }

    /// `compress(sk · G)`
    ///
    /// Fails with [`CryptoError::UnsupportedCurve`] off P-256. Otherwise it only fails if the scalar is zero, which
    /// [`SpendingKey`] construction makes practically impossible.
    pub fn generate_public_key(&self, spending_key: &SpendingKey) -> Result<PublicKey, CryptoError> {
        let point = self.curve.scalar_base_mult(spending_key.as_bytes())?;
        compress_point(self.curve, &point).map(PublicKey)
    }

    /// `SHA-256(sk)`
    pub fn generate_receiving_key(&self, spending_key: &SpendingKey) -> ReceivingKey {
        ReceivingKey(hash(spending_key.as_bytes()))
    }

    /// Derives a transmission key using the operating system's RNG.
    ///
    /// The result is randomised: calling this twice with the same receiving key yields two different keys.
    pub fn generate_transmission_key(&self, receiving_key: &ReceivingKey) -> Result<TransmissionKey, CryptoError> {
        self.generate_transmission_key_with_rng(receiving_key, &mut OsRng)
    }

    /// `compress(rk · (r · G))`, where `r` is 256 random bytes (reduced mod N) drawn from `rng`.
    ///
    /// A failing `rng` aborts the derivation with [`CryptoError::RandomGenerationFailure`].
    pub fn generate_transmission_key_with_rng<R: TryCryptoRng + ?Sized>(
        &self,
        receiving_key: &ReceivingKey,
        rng: &mut R,
    ) -> Result<TransmissionKey, CryptoError> {
        let randomness = Zeroizing::new(rand_bytes_from(rng, EPHEMERAL_RANDOMNESS_LEN)?);
        let ephemeral = self.curve.scalar_base_mult(&randomness)?;
        let point = self.curve.scalar_mult(&ephemeral, receiving_key.as_bytes())?;
        trace!("Transmission key point: {point}");
        compress_point(self.curve, &point).map(TransmissionKey)
    }

    pub fn generate_viewing_key(&self, spending_key: &SpendingKey) -> Result<ViewingKey, CryptoError> {
        let public_key = self.generate_public_key(spending_key)?;
        let receiving_key = self.generate_receiving_key(spending_key);
        Ok(ViewingKey { public_key, receiving_key })
    }

    pub fn generate_payment_address(&self, spending_key: &SpendingKey) -> Result<PaymentAddress, CryptoError> {
        self.generate_payment_address_with_rng(spending_key, &mut OsRng)
    }

    pub fn generate_payment_address_with_rng<R: TryCryptoRng + ?Sized>(
        &self,
        spending_key: &SpendingKey,
        rng: &mut R,
    ) -> Result<PaymentAddress, CryptoError> {
        let public_key = self.generate_public_key(spending_key)?;
        let receiving_key = self.generate_receiving_key(spending_key);
        let transmission_key = self.generate_transmission_key_with_rng(&receiving_key, rng)?;
        debug!("Payment address generated for public key {public_key}");
        Ok(PaymentAddress { public_key, transmission_key })
    }

    /// Decompresses a public key on this hierarchy's curve.
    pub fn public_key_point(&self, public_key: &PublicKey) -> Result<EllipticPoint, CryptoError> {
        decompress_point(self.curve, public_key.as_bytes())
    }
}
