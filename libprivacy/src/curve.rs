//! Prime-field short-Weierstrass curves of the form `y^2 = x^3 - 3x + B`.
//!
//! [`CurveParams`] is an immutable value. Construct it once (or use [`p256_shared`]) and pass references to the
//! codec functions and the key hierarchy. Nothing in this module mutates shared state, so a single instance can be
//! used from any number of threads.
//!
//! Any parameter set can be used with the point codecs, which only ever see public data. Scalar multiplication is
//! backed by the constant-time `p256` arithmetic and is therefore only available on P-256; other curves fail with
//! [`CryptoError::UnsupportedCurve`].

use crate::codec::{encode_uncompressed, COORDINATE_LEN};
use crate::error::CryptoError;
use crate::point::EllipticPoint;
use log::trace;
use num_bigint::BigUint;
use num_traits::Zero;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use std::fmt::Debug;
use std::sync::OnceLock;
use zeroize::Zeroizing;

/// The widest field supported by the 32-byte coordinate encodings.
pub const MAX_FIELD_BITS: u64 = 256;

const P256_P: &str = "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
const P256_N: &str = "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551";
const P256_B: &str = "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b";
const P256_GX: &str = "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
const P256_GY: &str = "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";

#[derive(Clone, PartialEq, Eq)]
pub struct CurveParams {
    name: String,
    /// Field modulus
    p: BigUint,
    /// Order of the base point
    n: BigUint,
    b: BigUint,
    g: EllipticPoint,
    /// Set when (P, N, B, G) are exactly the P-256 parameters
    is_p256: bool,
}

/// Returns a process-wide NIST P-256 instance, built on first use.
pub fn p256_shared() -> &'static CurveParams {
    static P256: OnceLock<CurveParams> = OnceLock::new();
    P256.get_or_init(CurveParams::p256)
}

impl CurveParams {
    /// NIST P-256 (secp256r1).
    pub fn p256() -> Self {
        Self::from_hex("P-256", P256_P, P256_N, P256_B, P256_GX, P256_GY).expect("P-256 parameters are well-formed")
    }

    /// Builds a curve from big-endian hex parameters.
    ///
    /// The modulus must be an odd number of at most 256 bits, the generator must lie on the curve and `B` must be
    /// non-zero (so that `(0, 0)` is free to represent the point at infinity). The group order is taken on trust.
    /// Curves other than P-256 are only good for encoding and decoding points.
    pub fn from_hex(name: &str, p: &str, n: &str, b: &str, gx: &str, gy: &str) -> Result<Self, CryptoError> {
        let p = parse_hex_param("p", p)?;
        let n = parse_hex_param("n", n)?;
        let b = parse_hex_param("b", b)?;
        let gx = parse_hex_param("gx", gx)?;
        let gy = parse_hex_param("gy", gy)?;
        if p <= BigUint::from(3u8) || !p.bit(0) {
            return Err(CryptoError::InvalidCurveParameters("modulus must be an odd prime greater than 3".into()));
        }
        if p.bits() > MAX_FIELD_BITS {
            return Err(CryptoError::InvalidCurveParameters(format!("modulus wider than {MAX_FIELD_BITS} bits")));
        }
        if n.is_zero() {
            return Err(CryptoError::InvalidCurveParameters("group order must be non-zero".into()));
        }
        if b.is_zero() || b >= p {
            return Err(CryptoError::InvalidCurveParameters("b must be in the range (0, p)".into()));
        }
        let is_p256 = [(&p, P256_P), (&n, P256_N), (&b, P256_B), (&gx, P256_GX), (&gy, P256_GY)]
            .into_iter()
            .all(|(value, expected)| parse_hex_param("", expected).is_ok_and(|e| *value == e));
        let curve = Self { name: name.to_string(), p, n, b, g: EllipticPoint::new(gx, gy), is_p256 };
        if !curve.is_on_curve(&curve.g) {
            return Err(CryptoError::InvalidCurveParameters("generator is not on the curve".into()));
        }
        Ok(curve)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field modulus, P.
    pub fn field_modulus(&self) -> &BigUint {
        &self.p
    }

    /// The order of the base point, N.
    pub fn order(&self) -> &BigUint {
        &self.n
    }

    pub fn coefficient_b(&self) -> &BigUint {
        &self.b
    }

    pub fn generator(&self) -> &EllipticPoint {
        &self.g
    }

    /// True if `P ≡ 3 (mod 4)`, i.e. square roots can be taken with a single exponentiation.
    pub fn supports_fast_sqrt(&self) -> bool {
        &self.p % 4u8 == BigUint::from(3u8)
    }

    /// The square-root exponent `(P + 1) / 4`.
    pub fn p_plus_1_div_4(&self) -> BigUint {
        (&self.p + 1u8) >> 2
    }

    /// Evaluates `x^3 - 3x + B (mod P)`.
    pub fn polynomial(&self, x: &BigUint) -> BigUint {
        let p = &self.p;
        let x = x % p;
        let x3 = (&x * &x % p) * &x % p;
        let three_x = &x * 3u8 % p;
        (x3 + &self.b + p - three_x) % p
    }

    pub fn is_on_curve(&self, point: &EllipticPoint) -> bool {
        if point.x >= self.p || point.y >= self.p {
            return false;
        }
        &point.y * &point.y % &self.p == self.polynomial(&point.x)
    }

    /// Computes `k·G`. The scalar is read as a big-endian integer of any length and reduced mod N.
    pub fn scalar_base_mult(&self, k: &[u8]) -> Result<EllipticPoint, CryptoError> {
        self.require_p256()?;
        let product = ProjectivePoint::GENERATOR * reduce_scalar(k);
        Ok(from_projective(&product))
    }

    /// Computes `k·point`. The scalar is read as a big-endian integer of any length and reduced mod N.
    ///
    /// `point` must be on the curve (or be the point at infinity), otherwise [`CryptoError::NotOnCurve`] is returned.
    pub fn scalar_mult(&self, point: &EllipticPoint, k: &[u8]) -> Result<EllipticPoint, CryptoError> {
        self.require_p256()?;
        let base = self.to_projective(point)?;
        trace!("scalar_mult on {} with a {} byte scalar", self.name, k.len());
        Ok(from_projective(&(base * reduce_scalar(k))))
    }

    fn require_p256(&self) -> Result<(), CryptoError> {
        if self.is_p256 {
            Ok(())
        } else {
            Err(CryptoError::UnsupportedCurve(self.name.clone()))
        }
    }

    fn to_projective(&self, point: &EllipticPoint) -> Result<ProjectivePoint, CryptoError> {
        if point.is_infinity() {
            return Ok(ProjectivePoint::IDENTITY);
        }
        let bytes = encode_uncompressed(self, point)?;
        let (x, y) = bytes.split_at(COORDINATE_LEN);
        let (x, y) = (FieldBytes::from_slice(x), FieldBytes::from_slice(y));
        let encoded = EncodedPoint::from_affine_coordinates(x, y, false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or(CryptoError::NotOnCurve)
    }
}

impl Debug for CurveParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CurveParams({}, {} bits)", self.name, self.p.bits())
    }
}

fn parse_hex_param(name: &str, value: &str) -> Result<BigUint, CryptoError> {
    let value = value.trim_start_matches("0x");
    BigUint::parse_bytes(value.as_bytes(), 16)
        .ok_or_else(|| CryptoError::InvalidCurveParameters(format!("parameter {name} is not a hex number")))
}

/// Reduces a big-endian integer of any length mod N without branching on its value. The input is consumed in 32-byte
/// limbs, Horner style, with radix `2^256 mod N`.
fn reduce_scalar(k: &[u8]) -> Scalar {
    let radix = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from([0xff; 32])) + Scalar::ONE;
    let mut padded = Zeroizing::new(vec![0u8; (32 - k.len() % 32) % 32]);
    padded.extend_from_slice(k);
    padded.chunks_exact(32).fold(Scalar::ZERO, |acc, limb| {
        acc * radix + <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(limb))
    })
}

fn from_projective(point: &ProjectivePoint) -> EllipticPoint {
    let encoded = point.to_affine().to_encoded_point(false);
    match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => EllipticPoint::new(BigUint::from_bytes_be(x), BigUint::from_bytes_be(y)),
        _ => EllipticPoint::infinity(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hex_point(x: &str, y: &str) -> EllipticPoint {
        let x = BigUint::parse_bytes(x.as_bytes(), 16).unwrap();
        let y = BigUint::parse_bytes(y.as_bytes(), 16).unwrap();
        EllipticPoint::new(x, y)
    }

    #[test]
    fn p256_parameters() {
        let curve = CurveParams::p256();
        assert_eq!(curve.name(), "P-256");
        assert!(curve.supports_fast_sqrt());
        assert!(curve.is_on_curve(curve.generator()));
        assert_eq!(curve.field_modulus().bits(), 256);
        assert_eq!(&curve.p_plus_1_div_4() * 4u8, curve.field_modulus() + 1u8);
        assert_eq!(format!("{curve:?}"), "CurveParams(P-256, 256 bits)");
    }

    #[test]
    fn shared_instance_is_initialised_once() {
        let a = p256_shared();
        let b = p256_shared();
        assert!(std::ptr::eq(a, b));
        assert_eq!(*a, CurveParams::p256());
    }

    #[test]
    fn small_multiples_of_generator() {
        let curve = CurveParams::p256();
        let two_g = hex_point(
            "7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978",
            "07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1",
        );
        assert_eq!(curve.scalar_base_mult(&[1]).unwrap(), *curve.generator());
        assert_eq!(curve.scalar_base_mult(&[2]).unwrap(), two_g);
        assert_eq!(curve.scalar_mult(curve.generator(), &[2]).unwrap(), two_g);
        let three_g = curve.scalar_base_mult(&[3]).unwrap();
        assert!(curve.is_on_curve(&three_g));
    }

    #[test]
    fn scalars_are_reduced_mod_order() {
        let curve = CurveParams::p256();
        assert!(curve.scalar_base_mult(&[]).unwrap().is_infinity());
        assert!(curve.scalar_base_mult(&[0u8; 32]).unwrap().is_infinity());
        assert!(curve.scalar_base_mult(&curve.order().to_bytes_be()).unwrap().is_infinity());
        let n_plus_one = curve.order() + 1u8;
        assert_eq!(curve.scalar_base_mult(&n_plus_one.to_bytes_be()).unwrap(), *curve.generator());
        // leading zeros do not change the scalar
        let mut padded = vec![0u8; 200];
        padded.push(7);
        assert_eq!(curve.scalar_base_mult(&padded).unwrap(), curve.scalar_base_mult(&[7]).unwrap());
    }

    #[test]
    fn long_scalars_match_big_integer_reduction() {
        let curve = CurveParams::p256();
        for len in [31usize, 32, 33, 64, 100, 256] {
            let k: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(37).wrapping_add(0xa5)).collect();
            let reduced = BigUint::from_bytes_be(&k) % curve.order();
            assert_eq!(
                curve.scalar_base_mult(&k).unwrap(),
                curve.scalar_base_mult(&reduced.to_bytes_be()).unwrap(),
                "scalar of {len} bytes"
            );
        }
        let all_ones = [0xffu8; 32];
        let reduced = BigUint::from_bytes_be(&all_ones) % curve.order();
        let expected = curve.scalar_base_mult(&reduced.to_bytes_be()).unwrap();
        assert_eq!(curve.scalar_base_mult(&all_ones).unwrap(), expected);
    }

    #[test]
    fn scalar_mult_composes() {
        let curve = CurveParams::p256();
        let five_g = curve.scalar_base_mult(&[5]).unwrap();
        let fifteen_g = curve.scalar_mult(&five_g, &[3]).unwrap();
        assert_eq!(fifteen_g, curve.scalar_base_mult(&[15]).unwrap());
        let minus_g = curve.scalar_base_mult(&(curve.order() - 1u8).to_bytes_be()).unwrap();
        assert_eq!(minus_g.x, curve.generator().x);
        assert_ne!(minus_g.y, curve.generator().y);
        assert!(curve.scalar_mult(&EllipticPoint::infinity(), &[9]).unwrap().is_infinity());
    }

    #[test]
    fn scalar_mult_rejects_points_off_the_curve() {
        let curve = CurveParams::p256();
        let g = curve.generator();
        let off = EllipticPoint::new(g.x.clone(), &g.y + 1u8);
        assert_eq!(curve.scalar_mult(&off, &[2]), Err(CryptoError::NotOnCurve));
        let out_of_range = EllipticPoint::new(&g.x + curve.field_modulus(), g.y.clone());
        assert_eq!(curve.scalar_mult(&out_of_range, &[2]), Err(CryptoError::NotOnCurve));
    }

    #[test]
    fn scalar_multiplication_needs_p256() {
        let small_order = CurveParams::from_hex("small order", P256_P, "7", P256_B, P256_GX, P256_GY).unwrap();
        let toy = CurveParams::from_hex("toy", "d", "7", "1", "0", "1").unwrap();
        for curve in [&small_order, &toy] {
            let expected = Err(CryptoError::UnsupportedCurve(curve.name().to_string()));
            assert_eq!(curve.scalar_base_mult(&[1]), expected);
            assert_eq!(curve.scalar_mult(curve.generator(), &[1]), expected);
        }
        // The same parameters under another name still get the p256 arithmetic
        let renamed = CurveParams::from_hex("secp256r1", P256_P, P256_N, P256_B, P256_GX, P256_GY).unwrap();
        assert_eq!(renamed.scalar_base_mult(&[1]).unwrap(), *renamed.generator());
    }

    #[test]
    fn on_curve_rejects_bad_points() {
        let curve = CurveParams::p256();
        let g = curve.generator();
        assert!(!curve.is_on_curve(&EllipticPoint::infinity()));
        assert!(!curve.is_on_curve(&EllipticPoint::new(g.x.clone(), &g.y + 1u8)));
        assert!(!curve.is_on_curve(&EllipticPoint::new(&g.x + curve.field_modulus(), g.y.clone())));
    }

    #[test]
    fn invalid_custom_curves() {
        let err = CurveParams::from_hex("bad", "zz", P256_N, P256_B, P256_GX, P256_GY).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidCurveParameters(_)));
        let err = CurveParams::from_hex("even", "10", P256_N, "1", "1", "1").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidCurveParameters(_)));
        let err = CurveParams::from_hex("off-curve", P256_P, P256_N, P256_B, P256_GX, P256_GX).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidCurveParameters(_)));
        let wide = format!("1{P256_P}");
        let err = CurveParams::from_hex("wide", &wide, P256_N, P256_B, P256_GX, P256_GY).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidCurveParameters(_)));
        let curve = CurveParams::from_hex("prefixed", &format!("0x{P256_P}"), P256_N, P256_B, P256_GX, P256_GY);
        assert!(curve.is_ok());
    }
}
