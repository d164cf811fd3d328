use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt::{Debug, Display};

/// An affine point `(X, Y)` on a short-Weierstrass curve.
///
/// The point at infinity is represented as `(0, 0)`. Because every supported curve has a non-zero `B` coefficient,
/// `(0, 0)` never satisfies the curve equation, so the identity can never be compressed or otherwise encoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EllipticPoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl EllipticPoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }

    pub fn infinity() -> Self {
        Self { x: BigUint::zero(), y: BigUint::zero() }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// True if the Y coordinate is odd. This is the bit carried in the compressed point header.
    pub fn is_y_odd(&self) -> bool {
        self.y.bit(0)
    }
}

impl Debug for EllipticPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EllipticPoint({self})")
    }
}

impl Display for EllipticPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_infinity() {
            write!(f, "infinity")
        } else {
            write!(f, "x: {:064x}, y: {:064x}", self.x, self.y)
        }
    }
}
