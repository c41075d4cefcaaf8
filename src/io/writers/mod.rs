//! Encoders for the supported output containers.
pub mod jpeg;
pub mod png;
