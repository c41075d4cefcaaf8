//! Core processing building blocks: content-bounds detection, canvas
//! normalization, compositing, flattening, and the pipeline that orders them.
//! These are internal primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
