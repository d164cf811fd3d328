//! Command handlers. Each builds a serialisable report; [`render`] turns it into text or JSON.

use crate::config::OutputFormat;
use crate::error::CliError;
use libprivacy::codec::{decode_uncompressed, encode_uncompressed, COORDINATE_LEN};
use libprivacy::{
    compress_commitment, compress_point, decompress_commitment, decompress_point, CompressedCommitment, CurveParams,
    EllipticPoint, KeyHierarchy, PaymentAddress,
};
use log::*;
use serde::Serialize;
use std::fmt::{Display, Formatter};

const HIDDEN: &str = "*** (set show_secrets: true to display)";

//----------------------------------------   Key derivation     --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct KeysReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending_key: Option<String>,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiving_key: Option<String>,
    pub transmission_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewing_key: Option<String>,
    pub payment_address: String,
}

impl Display for KeysReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let secret = |v: &Option<String>| v.clone().unwrap_or_else(|| HIDDEN.to_string());
        writeln!(f, "Spending key:     {}", secret(&self.spending_key))?;
        writeln!(f, "Public key:       {}", self.public_key)?;
        writeln!(f, "Receiving key:    {}", secret(&self.receiving_key))?;
        writeln!(f, "Transmission key: {}", self.transmission_key)?;
        writeln!(f, "Viewing key:      {}", secret(&self.viewing_key))?;
        write!(f, "Payment address:  {}", self.payment_address)
    }
}

pub fn derive_keys(curve: &CurveParams, seed_hex: &str, show_secrets: bool) -> Result<KeysReport, CliError> {
    let seed = hex::decode(seed_hex)?;
    let keys = KeyHierarchy::new(curve);
    let spending_key = keys.generate_spending_key(&seed);
    let viewing_key = keys.generate_viewing_key(&spending_key)?;
    let transmission_key = keys.generate_transmission_key(&viewing_key.receiving_key)?;
    let payment_address = PaymentAddress { public_key: viewing_key.public_key, transmission_key };
    info!("Derived keys for public key {}", viewing_key.public_key);
    let report = KeysReport {
        spending_key: show_secrets.then(|| spending_key.as_hex()),
        public_key: viewing_key.public_key.as_hex(),
        receiving_key: show_secrets.then(|| viewing_key.receiving_key.as_hex()),
        transmission_key: transmission_key.as_hex(),
        viewing_key: show_secrets.then(|| hex::encode(viewing_key.to_bytes().as_slice())),
        payment_address: payment_address.as_hex(),
    };
    Ok(report)
}

#[derive(Debug, Serialize)]
pub struct AddressReport {
    pub public_key: String,
    pub transmission_key: String,
    pub payment_address: String,
}

impl Display for AddressReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Public key:       {}", self.public_key)?;
        writeln!(f, "Transmission key: {}", self.transmission_key)?;
        write!(f, "Payment address:  {}", self.payment_address)
    }
}

pub fn derive_address(curve: &CurveParams, seed_hex: &str) -> Result<AddressReport, CliError> {
    let seed = hex::decode(seed_hex)?;
    let keys = KeyHierarchy::new(curve);
    let address = keys.generate_payment_address(&keys.generate_spending_key(&seed))?;
    Ok(AddressReport {
        public_key: address.public_key.as_hex(),
        transmission_key: address.transmission_key.as_hex(),
        payment_address: address.as_hex(),
    })
}

//----------------------------------------   Point encoding     --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PointReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u8>,
    pub x: String,
    pub y: String,
}

impl Display for PointReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(tag) = self.tag {
            writeln!(f, "Tag: {tag:#04x}")?;
        }
        writeln!(f, "X:   {}", self.x)?;
        write!(f, "Y:   {}", self.y)
    }
}

fn point_report(curve: &CurveParams, point: &EllipticPoint, tag: Option<u8>) -> Result<PointReport, CliError> {
    let bytes = encode_uncompressed(curve, point)?;
    let (x, y) = bytes.split_at(COORDINATE_LEN);
    Ok(PointReport { tag, x: hex::encode(x), y: hex::encode(y) })
}

pub fn decompress(curve: &CurveParams, point_hex: &str) -> Result<PointReport, CliError> {
    let bytes = hex::decode(point_hex)?;
    let point = decompress_point(curve, &bytes)?;
    point_report(curve, &point, None)
}

pub fn open_commitment(curve: &CurveParams, commitment_hex: &str) -> Result<PointReport, CliError> {
    let bytes = hex::decode(commitment_hex)?;
    let point = decompress_commitment(curve, &bytes)?;
    let tag = CompressedCommitment::try_from(bytes.as_slice())?.tag();
    point_report(curve, &point, Some(tag))
}

#[derive(Debug, Serialize)]
pub struct CompressReport {
    pub encoded: String,
}

impl Display for CompressReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Compresses the point `(x, y)`. Coordinates may be shorter than 32 bytes and are left-padded.
pub fn compress(curve: &CurveParams, x_hex: &str, y_hex: &str, tag: Option<u8>) -> Result<CompressReport, CliError> {
    let mut bytes = coordinate(x_hex)?.to_vec();
    bytes.extend_from_slice(&coordinate(y_hex)?);
    let point = decode_uncompressed(curve, &bytes)?;
    let encoded = match tag {
        Some(tag) => compress_commitment(curve, &point, tag)?.as_hex(),
        None => compress_point(curve, &point)?.as_hex(),
    };
    Ok(CompressReport { encoded })
}

fn coordinate(hex_str: &str) -> Result<[u8; COORDINATE_LEN], CliError> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let padded = if hex_str.len() % 2 == 1 { format!("0{hex_str}") } else { hex_str.to_string() };
    let raw = hex::decode(padded)?;
    if raw.len() > COORDINATE_LEN {
        return Err(CliError::CoordinateTooLong { max: COORDINATE_LEN, actual: raw.len() });
    }
    let mut out = [0u8; COORDINATE_LEN];
    out[COORDINATE_LEN - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

//----------------------------------------   Output     ----------------------------------------------------------------

pub fn render<T: Serialize + Display>(report: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use libprivacy::{CryptoError, SpendingKey};

    const ZERO_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const ZERO_SEED_PK: &str = "03893829bebc73eb4d24d7ed2f1444c907080834bd33671436269280bc603037af";
    const G_X: &str = "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
    const G_Y: &str = "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";

    #[test]
    fn keys_for_zero_seed() {
        let curve = CurveParams::p256();
        let report = derive_keys(&curve, ZERO_SEED, true).unwrap();
        assert_eq!(report.public_key, ZERO_SEED_PK);
        assert_eq!(
            report.spending_key.as_deref(),
            Some("66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925")
        );
        assert_eq!(
            report.receiving_key.as_deref(),
            Some("2b32db6c2c0a6235fb1397e8225ea85e0f0e6e8c7b126d0016ccbde0e667151e")
        );
        let viewing_key = report.viewing_key.as_deref().unwrap();
        assert_eq!(viewing_key, format!("{ZERO_SEED_PK}{}", report.receiving_key.as_deref().unwrap()));
        assert_eq!(report.payment_address, format!("{ZERO_SEED_PK}{}", report.transmission_key));
        assert!(SpendingKey::from_hex(&curve, report.spending_key.as_deref().unwrap()).is_ok());
    }

    #[test]
    fn secrets_are_hidden_by_default() {
        let curve = CurveParams::p256();
        let report = derive_keys(&curve, ZERO_SEED, false).unwrap();
        assert!(report.spending_key.is_none() && report.receiving_key.is_none() && report.viewing_key.is_none());
        let json = render(&report, OutputFormat::Json).unwrap();
        assert!(!json.contains("spending_key"));
        assert!(json.contains(ZERO_SEED_PK));
        let text = render(&report, OutputFormat::Text).unwrap();
        assert!(text.contains(HIDDEN));
        assert!(!text.contains("66687aad"));
    }

    #[test]
    fn addresses_share_public_key() {
        let curve = CurveParams::p256();
        let a = derive_address(&curve, "c0ffee").unwrap();
        let b = derive_address(&curve, "c0ffee").unwrap();
        assert_eq!(a.public_key, b.public_key);
        assert_ne!(a.transmission_key, b.transmission_key);
        assert_eq!(a.payment_address.len(), 2 * 66);
        assert!(matches!(derive_address(&curve, "xyz"), Err(CliError::InvalidHex(_))));
    }

    #[test]
    fn compress_and_decompress_generator() {
        let curve = CurveParams::p256();
        let compressed = compress(&curve, G_X, G_Y, None).unwrap();
        assert_eq!(compressed.encoded, format!("03{G_X}"));
        let report = decompress(&curve, &compressed.encoded).unwrap();
        assert_eq!(report.x, G_X);
        assert_eq!(report.y, G_Y);
        assert!(report.tag.is_none());
        assert_eq!(render(&report, OutputFormat::Text).unwrap(), format!("X:   {G_X}\nY:   {G_Y}"));
    }

    #[test]
    fn commitments() {
        let curve = CurveParams::p256();
        let compressed = compress(&curve, &format!("0x{G_X}"), G_Y, Some(7)).unwrap();
        assert_eq!(compressed.encoded, format!("0703{G_X}"));
        let report = open_commitment(&curve, &compressed.encoded).unwrap();
        assert_eq!(report.tag, Some(7));
        assert_eq!(report.x, G_X);
        let json = render(&report, OutputFormat::Json).unwrap();
        assert!(json.contains("\"tag\": 7"));
        let err = open_commitment(&curve, &format!("03{G_X}")).unwrap_err();
        assert!(matches!(err, CliError::Crypto(CryptoError::InvalidLength { expected: 34, actual: 33 })));
    }

    #[test]
    fn bad_points_are_reported() {
        let curve = CurveParams::p256();
        assert!(matches!(compress(&curve, G_X, "01", None), Err(CliError::Crypto(CryptoError::NotOnCurve))));
        assert!(matches!(
            compress(&curve, &"ff".repeat(33), G_Y, None),
            Err(CliError::CoordinateTooLong { max: 32, actual: 33 })
        ));
        let x_one = format!("02{}01", "00".repeat(31));
        assert!(matches!(decompress(&curve, &x_one), Err(CliError::Crypto(CryptoError::SquareRootMismatch))));
        assert!(matches!(decompress(&curve, "04"), Err(CliError::Crypto(CryptoError::InvalidLength { .. }))));
    }

    #[test]
    fn short_coordinates_are_padded() {
        assert_eq!(coordinate("1").unwrap()[31], 1);
        assert_eq!(coordinate("0x0102").unwrap()[30..], [1, 2]);
        assert!(coordinate("").unwrap().iter().all(|b| *b == 0));
    }
}
