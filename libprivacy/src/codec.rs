//! Compressed and uncompressed point encodings.
//!
//! A compressed point is 33 bytes: a header byte (`0x02` for even Y, `0x03` for odd Y) followed by the X coordinate as
//! 32 big-endian, zero-left-padded bytes. An uncompressed point is the two coordinates concatenated, 64 bytes.

use crate::curve::CurveParams;
use crate::error::CryptoError;
use crate::point::EllipticPoint;
use log::trace;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display};

pub const COORDINATE_LEN: usize = 32;
pub const COMPRESSED_POINT_LEN: usize = 1 + COORDINATE_LEN;
pub const UNCOMPRESSED_POINT_LEN: usize = 2 * COORDINATE_LEN;

/// Header tag of a compressed point, before the Y parity bit is ORed in.
pub const COMPRESSED_TAG: u8 = 0x02;
const PARITY_BIT: u8 = 0x01;

/// The 33-byte compressed encoding of a curve point.
///
/// Holding a `CompressedPoint` only guarantees the length. Use [`decompress_point`] (or
/// [`CompressedPoint::to_point`]) to check that it encodes a point on a given curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPoint([u8; COMPRESSED_POINT_LEN]);

impl CompressedPoint {
    pub fn as_bytes(&self) -> &[u8; COMPRESSED_POINT_LEN] {
        &self.0
    }

    pub fn header(&self) -> u8 {
        self.0[0]
    }

    pub fn to_point(&self, curve: &CurveParams) -> Result<EllipticPoint, CryptoError> {
        decompress_point(curve, &self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if hex.len() != 2 * COMPRESSED_POINT_LEN {
            return Err(CryptoError::invalid_length(COMPRESSED_POINT_LEN, hex.len() / 2));
        }
        let mut bytes = [0u8; COMPRESSED_POINT_LEN];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; COMPRESSED_POINT_LEN]> for CompressedPoint {
    fn from(bytes: [u8; COMPRESSED_POINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for CompressedPoint {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; COMPRESSED_POINT_LEN]>::try_from(bytes)
            .map_err(|_| CryptoError::invalid_length(COMPRESSED_POINT_LEN, bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for CompressedPoint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedPoint({})", self.as_hex())
    }
}

impl Display for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for CompressedPoint {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.as_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for CompressedPoint {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(de)?;
        CompressedPoint::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Compresses a point to its 33-byte encoding.
///
/// Only points on `curve` can be compressed; anything else (including the point at infinity) fails with
/// [`CryptoError::NotOnCurve`]. Callers only ever compress points they computed themselves, so a failure here means an
/// upstream bug rather than bad input.
pub fn compress_point(curve: &CurveParams, point: &EllipticPoint) -> Result<CompressedPoint, CryptoError> {
    if !curve.is_on_curve(point) {
        return Err(CryptoError::NotOnCurve);
    }
    let mut bytes = [0u8; COMPRESSED_POINT_LEN];
    bytes[0] = if point.is_y_odd() { COMPRESSED_TAG | PARITY_BIT } else { COMPRESSED_TAG };
    write_padded(&point.x, &mut bytes[1..]);
    Ok(CompressedPoint(bytes))
}

/// Reconstructs a point from its 33-byte compressed encoding.
///
/// Y is recovered as `(x^3 - 3x + B)^((P+1)/4) mod P`, which is a square root whenever one exists because
/// `P ≡ 3 (mod 4)`. The root with the parity given by the header is selected.
pub fn decompress_point(curve: &CurveParams, bytes: &[u8]) -> Result<EllipticPoint, CryptoError> {
    if bytes.len() != COMPRESSED_POINT_LEN {
        return Err(CryptoError::invalid_length(COMPRESSED_POINT_LEN, bytes.len()));
    }
    let header = bytes[0];
    let y_odd = header & PARITY_BIT == PARITY_BIT;
    if header & !PARITY_BIT != COMPRESSED_TAG {
        return Err(CryptoError::InvalidFormat(header));
    }
    let x = BigUint::from_bytes_be(&bytes[1..]);
    let p = curve.field_modulus();
    if &x >= p {
        return Err(CryptoError::FieldRangeViolation);
    }
    if !curve.supports_fast_sqrt() {
        return Err(CryptoError::UnsupportedField);
    }
    let rhs = curve.polynomial(&x);
    let mut y = rhs.modpow(&curve.p_plus_1_div_4(), p);
    if y.bit(0) != y_odd {
        y = p - &y;
    }
    if (&y * &y) % p != rhs {
        trace!("x = {x:x} has no square root on {}", curve.name());
        return Err(CryptoError::SquareRootMismatch);
    }
    if &y >= p {
        return Err(CryptoError::FieldRangeViolation);
    }
    let point = EllipticPoint::new(x, y);
    if !curve.is_on_curve(&point) {
        return Err(CryptoError::NotOnCurve);
    }
    Ok(point)
}

/// Encodes a point on `curve` as `X || Y`, each coordinate 32 big-endian bytes.
pub fn encode_uncompressed(
    curve: &CurveParams,
    point: &EllipticPoint,
) -> Result<[u8; UNCOMPRESSED_POINT_LEN], CryptoError> {
    if !curve.is_on_curve(point) {
        return Err(CryptoError::NotOnCurve);
    }
    let mut bytes = [0u8; UNCOMPRESSED_POINT_LEN];
    write_padded(&point.x, &mut bytes[..COORDINATE_LEN]);
    write_padded(&point.y, &mut bytes[COORDINATE_LEN..]);
    Ok(bytes)
}

/// Decodes an `X || Y` encoding produced by [`encode_uncompressed`], checking that the result lies on `curve`.
pub fn decode_uncompressed(curve: &CurveParams, bytes: &[u8]) -> Result<EllipticPoint, CryptoError> {
    if bytes.len() != UNCOMPRESSED_POINT_LEN {
        return Err(CryptoError::invalid_length(UNCOMPRESSED_POINT_LEN, bytes.len()));
    }
    let x = BigUint::from_bytes_be(&bytes[..COORDINATE_LEN]);
    let y = BigUint::from_bytes_be(&bytes[COORDINATE_LEN..]);
    let p = curve.field_modulus();
    if &x >= p || &y >= p {
        return Err(CryptoError::FieldRangeViolation);
    }
    let point = EllipticPoint::new(x, y);
    if !curve.is_on_curve(&point) {
        return Err(CryptoError::NotOnCurve);
    }
    Ok(point)
}

/// Writes `value` big-endian into `dst`, left-padded with zeros. `value` must fit in `dst`.
fn write_padded(value: &BigUint, dst: &mut [u8]) {
    let src = value.to_bytes_be();
    let offset = dst.len() - src.len();
    dst[offset..].copy_from_slice(&src);
}
