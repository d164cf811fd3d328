//! Secure randomness for key derivation.

use crate::error::CryptoError;
use rand::rngs::OsRng;
use rand::TryCryptoRng;

/// Returns `n` bytes from the operating system's secure random number generator.
///
/// Fails with [`CryptoError::RandomGenerationFailure`] if the entropy source is unavailable. There is no fallback.
pub fn rand_bytes(n: usize) -> Result<Vec<u8>, CryptoError> {
    rand_bytes_from(&mut OsRng, n)
}

/// Returns `n` bytes drawn from `rng`, propagating any failure of the generator.
pub fn rand_bytes_from<R: TryCryptoRng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; n];
    rng.try_fill_bytes(&mut bytes).map_err(|e| CryptoError::RandomGenerationFailure(e.to_string()))?;
    Ok(bytes)
}
