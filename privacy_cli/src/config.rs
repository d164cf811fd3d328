#![doc = include_str!("../README.md")]

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shielded payment keys.
///
/// Key derivation and compressed point encoding for the privacy layer.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to the configuration file. The default is `$HOME/.privacy/config.yml`.
    #[arg(long = "config-file", short = 'c', env = "PRIVACY_CONFIG")]
    pub config_file: Option<PathBuf>,
    /// Output format. Overrides the `output` setting in the configuration file.
    #[arg(long = "output", short = 'o', value_enum)]
    pub output: Option<OutputFormat>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Derive the full key hierarchy for a seed.
    #[command(name = "keys")]
    Keys {
        /// The seed, hex encoded. Any length is accepted.
        seed: String,
    },
    /// Derive a payment address for a seed. The transmission key differs on every call.
    #[command(name = "address", alias = "addr")]
    Address {
        /// The seed, hex encoded.
        seed: String,
    },
    /// Decode a 33-byte compressed point.
    #[command(name = "decompress")]
    Decompress {
        /// The compressed point, hex encoded.
        point: String,
    },
    /// Decode a 34-byte tagged commitment.
    #[command(name = "commitment", alias = "comm")]
    Commitment {
        /// The commitment, hex encoded.
        commitment: String,
    },
    /// Compress a point given its affine coordinates.
    #[command(name = "compress")]
    Compress {
        /// X coordinate, big-endian hex. At most 32 bytes.
        x: String,
        /// Y coordinate, big-endian hex. At most 32 bytes.
        y: String,
        /// Emit a commitment with this type tag instead of a plain compressed point.
        #[arg(long = "tag", short = 't')]
        tag: Option<u8>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct GlobalOptions {
    pub config_file: Option<PathBuf>,
    pub output: Option<OutputFormat>,
}

impl Config {
    pub fn to_parts(self) -> (GlobalOptions, CliCommand) {
        let global = GlobalOptions { config_file: self.config_file, output: self.output };
        (global, self.command)
    }
}
