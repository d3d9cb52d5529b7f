//! Error types for gradientmap

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid colour stop '{text}': {reason}")]
    Format { text: String, reason: String },

    #[error("A gradient needs at least 2 stops, got {0}")]
    EmptyGradient(usize),

    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Degenerate segment after stop {index}: zero width at position {position}")]
    DegenerateSegment { index: usize, position: f64 },

    #[error("Stop index {index} out of range for {len} stops")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid position {position} for stop {index}: {reason}")]
    InvalidPosition {
        index: usize,
        position: f64,
        reason: &'static str,
    },

    #[error("Unknown built-in palette '{0}'")]
    UnknownPreset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid gradient settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn format(text: &str, reason: impl Into<String>) -> Self {
        Error::Format {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
