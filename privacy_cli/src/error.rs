use libprivacy::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] serde_yml::Error),
    #[error("Could not format output: {0}")]
    OutputError(#[from] serde_json::Error),
    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("{0}")]
    Crypto(#[from] CryptoError),
    #[error("Coordinate is longer than {max} bytes: {actual}")]
    CoordinateTooLong { max: usize, actual: usize },
}
