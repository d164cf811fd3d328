//! Cross-checks the key hierarchy and codecs against an independent P-256 implementation, and exercises the
//! properties wallets and the consensus layer rely on.

use libprivacy::codec::{encode_uncompressed, COMPRESSED_POINT_LEN};
use libprivacy::{
    compress_commitment, compress_point, decompress_commitment, decompress_point, p256_shared, CryptoError,
    CurveParams, KeyHierarchy,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;

fn reference_public_key(secret: &[u8]) -> Vec<u8> {
    let sk = p256::SecretKey::from_slice(secret).expect("valid secret");
    sk.public_key().to_encoded_point(true).as_bytes().to_vec()
}

#[test]
fn public_keys_match_reference_implementation() {
    env_logger::try_init().ok();
    let curve = CurveParams::p256();
    let keys = KeyHierarchy::new(&curve);
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..16 {
        let seed: [u8; 32] = rng.random();
        let sk = keys.generate_spending_key(&seed);
        let pk = keys.generate_public_key(&sk).unwrap();
        assert_eq!(pk.as_bytes().as_slice(), reference_public_key(sk.as_bytes()).as_slice());
    }
}

#[test]
fn zero_seed_scenario() {
    let keys = KeyHierarchy::new(p256_shared());
    let sk = keys.generate_spending_key(&[0u8; 32]);
    let pk = keys.generate_public_key(&sk).unwrap();
    assert_eq!(pk.as_bytes().as_slice(), reference_public_key(sk.as_bytes()).as_slice());
    assert_eq!(pk.as_hex(), "03893829bebc73eb4d24d7ed2f1444c907080834bd33671436269280bc603037af");
    // Same spending key, same identity
    assert_eq!(keys.generate_public_key(&keys.generate_spending_key(&[0u8; 32])).unwrap(), pk);
}

#[test]
fn decompression_matches_reference_implementation() {
    let curve = CurveParams::p256();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..16 {
        let scalar: [u8; 32] = rng.random();
        let point = curve.scalar_base_mult(&scalar).unwrap();
        let compressed = compress_point(&curve, &point).unwrap();
        let reference = p256::PublicKey::from_sec1_bytes(compressed.as_bytes()).unwrap();
        let uncompressed = reference.to_encoded_point(false);
        let ours = encode_uncompressed(&curve, &decompress_point(&curve, compressed.as_bytes()).unwrap()).unwrap();
        assert_eq!(&uncompressed.as_bytes()[1..], ours.as_slice());
    }
}

#[test]
fn compressed_strings_round_trip() {
    // Every x in range either decodes (and re-encodes to the same bytes) or is rejected as having no square root.
    let curve = CurveParams::p256();
    let mut rng = StdRng::seed_from_u64(5);
    let mut decoded = 0;
    for _ in 0..32 {
        let mut bytes = [0u8; COMPRESSED_POINT_LEN];
        rng.fill(&mut bytes[1..]);
        bytes[0] = 0x02 | (bytes[1] & 1);
        bytes[1] &= 0x7f;
        match decompress_point(&curve, &bytes) {
            Ok(point) => {
                decoded += 1;
                assert_eq!(compress_point(&curve, &point).unwrap().as_bytes(), &bytes);
            }
            Err(err) => assert_eq!(err, CryptoError::SquareRootMismatch),
        }
    }
    assert!(decoded > 0);
}

#[test]
fn commitment_scenario() {
    let curve = CurveParams::p256();
    let point = curve.scalar_base_mult(&[42]).unwrap();
    let commitment = compress_commitment(&curve, &point, 0x01).unwrap();
    assert_eq!(commitment.as_bytes().len(), 34);
    assert_eq!(decompress_commitment(&curve, commitment.as_bytes()).unwrap(), point);
}

#[test]
fn derivation_is_thread_safe() {
    let curve = p256_shared();
    let expected: Vec<_> = (0u8..4)
        .map(|i| {
            let keys = KeyHierarchy::new(curve);
            keys.generate_public_key(&keys.generate_spending_key(&[i])).unwrap()
        })
        .collect();
    let handles: Vec<_> = (0u8..4)
        .map(|i| {
            thread::spawn(move || {
                let keys = KeyHierarchy::new(p256_shared());
                let sk = keys.generate_spending_key(&[i]);
                let address = keys.generate_payment_address(&sk).unwrap();
                address.public_key
            })
        })
        .collect();
    for (handle, expected) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
