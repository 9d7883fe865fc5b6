use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Configuration file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Invalid value {value:?} for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("Unknown color name: {0}")]
    UnknownColor(String),

    #[error("Unsupported color format: {0}")]
    InvalidColor(String),

    #[error("Unknown worry severity: {0}")]
    UnknownSeverity(String),

    #[error("Unsupported message format {0:?}: only {{{{field}}}} placeholders are allowed")]
    InvalidTemplate(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
