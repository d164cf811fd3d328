use hex::FromHexError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CryptoError {
    #[error("Invalid input length. Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid compressed point header: {0:#04x}")]
    InvalidFormat(u8),
    #[error("Coordinate is not smaller than the field modulus")]
    FieldRangeViolation,
    #[error("X coordinate has no square root under the curve equation")]
    SquareRootMismatch,
    #[error("Field modulus must be congruent to 3 mod 4")]
    UnsupportedField,
    #[error("Scalar multiplication is not available on curve {0}")]
    UnsupportedCurve(String),
    #[error("Point is not on the curve")]
    NotOnCurve,
    #[error("Could not generate random bytes: {0}")]
    RandomGenerationFailure(String),
    #[error("Scalar is not smaller than the curve order")]
    ScalarOutOfRange,
    #[error("Could not deserialize from hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error("Invalid curve parameters: {0}")]
    InvalidCurveParameters(String),
}

impl CryptoError {
    pub(crate) fn invalid_length(expected: usize, actual: usize) -> Self {
        CryptoError::InvalidLength { expected, actual }
    }
}
