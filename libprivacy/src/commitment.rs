//! Tagged point encoding for value and asset commitments.
//!
//! A compressed commitment is a one-byte type tag followed by the 33-byte compressed point. The tag says what the
//! commitment commits to; this layer carries it but never interprets it.

use crate::codec::{compress_point, decompress_point, CompressedPoint, COMPRESSED_POINT_LEN};
use crate::curve::CurveParams;
use crate::error::CryptoError;
use crate::point::EllipticPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;

pub const COMPRESSED_COMMITMENT_LEN: usize = 1 + COMPRESSED_POINT_LEN;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedCommitment([u8; COMPRESSED_COMMITMENT_LEN]);

impl CompressedCommitment {
    pub fn new(tag: u8, point: &CompressedPoint) -> Self {
        let mut bytes = [0u8; COMPRESSED_COMMITMENT_LEN];
        bytes[0] = tag;
        bytes[1..].copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    pub fn tag(&self) -> u8 {
        self.0[0]
    }

    pub fn compressed_point(&self) -> CompressedPoint {
        let mut point = [0u8; COMPRESSED_POINT_LEN];
        point.copy_from_slice(&self.0[1..]);
        CompressedPoint::from(point)
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_COMMITMENT_LEN] {
        &self.0
    }

    pub fn to_point(&self, curve: &CurveParams) -> Result<EllipticPoint, CryptoError> {
        decompress_commitment(curve, &self.0)
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if hex.len() != 2 * COMPRESSED_COMMITMENT_LEN {
            return Err(CryptoError::invalid_length(COMPRESSED_COMMITMENT_LEN, hex.len() / 2));
        }
        let mut bytes = [0u8; COMPRESSED_COMMITMENT_LEN];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for CompressedCommitment {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; COMPRESSED_COMMITMENT_LEN]>::try_from(bytes)
            .map_err(|_| CryptoError::invalid_length(COMPRESSED_COMMITMENT_LEN, bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for CompressedCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for CompressedCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedCommitment(tag: {:#04x}, {})", self.tag(), self.compressed_point())
    }
}

impl Serialize for CompressedCommitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.as_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for CompressedCommitment {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(de)?;
        CompressedCommitment::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Compresses a commitment point, prefixing the caller's type tag.
pub fn compress_commitment(
    curve: &CurveParams,
    point: &EllipticPoint,
    tag: u8,
) -> Result<CompressedCommitment, CryptoError> {
    let compressed = compress_point(curve, point)?;
    Ok(CompressedCommitment::new(tag, &compressed))
}

/// Decodes a 34-byte commitment. The tag is discarded and the remaining 33 bytes are decompressed as a point.
pub fn decompress_commitment(curve: &CurveParams, bytes: &[u8]) -> Result<EllipticPoint, CryptoError> {
    if bytes.len() != COMPRESSED_COMMITMENT_LEN {
        return Err(CryptoError::invalid_length(COMPRESSED_COMMITMENT_LEN, bytes.len()));
    }
    decompress_point(curve, &bytes[1..])
}
