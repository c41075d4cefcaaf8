//! I/O layer for decoding image files, encoding PNG/JPEG outputs, and
//! invoking the external background-removal tool.
pub mod codec;
pub use codec::{
    decode_bytes, encode_buffer, format_for_path, is_supported_image, load_buffer, save_buffer,
};

pub mod removal;
pub use removal::{BackgroundRemoval, CommandRemover, DEFAULT_REMOVAL_MODEL, RemovalError};

pub mod writers;
