//! Error types for the few fallible paths outside the editing core:
//! loading artwork and loading settings.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    /// The file exists but could not be read or decoded.
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Neither the toml nor the json reading of the file was valid.
    #[error("failed to parse settings {path}: {message}")]
    Parse { path: String, message: String },
}
