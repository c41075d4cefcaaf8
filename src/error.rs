//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O and background-removal errors, and provides semantic
//! variants for decode/encode failures, detection outcomes, and argument validation.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Background removal error: {0}")]
    Removal(#[from] crate::io::RemovalError),

    #[error("Missing alpha channel: {context} requires a 4-channel buffer")]
    MissingAlphaChannel { context: &'static str },

    #[error("No content found: no pixel has alpha > 0")]
    NoContentFound,

    #[error("No contours found in the segmented image")]
    NoContoursFound,

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Buffer length {actual} does not match {width}x{height}x{channels}")]
    BufferLength {
        width: usize,
        height: usize,
        channels: usize,
        actual: usize,
    },

    #[error("Invalid parameters file {path}: {message}")]
    InvalidParams { path: String, message: String },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
