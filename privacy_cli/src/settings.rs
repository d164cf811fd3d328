use crate::config::OutputFormat;
use crate::error::CliError;
use log::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputFormat,
    /// Include spending, receiving and viewing keys in `keys` output.
    pub show_secrets: bool,
}

impl Settings {
    pub fn try_load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        load_settings_file(path)
    }

    /// Loads the settings file, falling back to defaults if it does not exist. Any other failure is returned.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        match Self::try_load(path) {
            Ok(settings) => Ok(settings),
            Err(CliError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file found. Using defaults.");
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    let mut home = std::env::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.push(".privacy");
    home.push("config.yml");
    home
}

pub fn load_settings_file<P: AsRef<Path>>(path: Option<P>) -> Result<Settings, CliError> {
    let path = path.map(|p| p.as_ref().to_path_buf()).unwrap_or_else(default_settings_path);
    debug!("Loading settings from {}", path.display());
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let settings = serde_yml::from_reader(reader)?;
    Ok(settings)
}
