use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Settings error: {0}")]
    SettingsError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
