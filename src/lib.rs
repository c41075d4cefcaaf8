#![doc = r#"
photoprep — a high-performance product photo normalization and watermarking toolkit.

This crate turns raw product shots into clean, square listing images: it detects the
visible content (by alpha coverage or by contour segmentation), crops to it, re-centers
the result on a fixed-size canvas, blends an optional watermark over it, and exports
PNG or JPEG. It powers the photoprep CLI and can be embedded in your own Rust
applications.

Stability
---------
The public library API is experimental in initial releases. It is built on top of a
working MVP used by the CLI and is robust, but may evolve as the crate stabilizes.
Breaking changes can occur.

Requirements
------------
- Rust 2024 edition toolchain.
- Optionally, an external background removal command (e.g. `rembg`) on your PATH if
  you want cut-outs produced on the fly.

Add dependency
--------------
```toml
[dependencies]
photoprep = "0.1"
```

Quick start: process a file
---------------------------
```rust,no_run
use std::path::Path;
use photoprep::{OutputFormat, ProcessingParams, process_image_to_path};

fn main() -> photoprep::Result<()> {
    let params = ProcessingParams {
        format: OutputFormat::JPEG,
        crop: true,
        ..ProcessingParams::default()
    };

    process_image_to_path(
        Path::new("/photos/raw/chair.png"),
        Path::new("/photos/out/chair.jpg"),
        &params,
    )
}
```

Process in-memory to a `PixelBuffer`
------------------------------------
```rust,no_run
use std::path::Path;
use photoprep::{ProcessingParams, process_image_to_buffer};

fn main() -> photoprep::Result<()> {
    let params = ProcessingParams {
        crop: true,
        watermark: Some("/assets/logo.png".into()),
        opacity: 0.3,
        ..ProcessingParams::default()
    };

    let buffer = process_image_to_buffer(Path::new("/photos/raw/chair.png"), &params)?;
    println!("{}x{} ({})", buffer.width(), buffer.height(), buffer.channels());
    Ok(())
}
```

Drive the pipeline directly (when you already have pixels)
----------------------------------------------------------
```rust
use photoprep::{Channels, PipelineConfig, PixelBuffer, run_pipeline};

fn main() -> photoprep::Result<()> {
    let buffer = PixelBuffer::filled(32, 32, Channels::Rgba, &[255, 0, 0, 255])?;
    let config = PipelineConfig {
        crop_to_content: true,
        canvas_size: 64,
        ..PipelineConfig::default()
    };

    let normalized = run_pipeline(buffer, &config)?;
    assert_eq!(normalized.width(), 64);
    assert_eq!(normalized.height(), 64);
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use photoprep::{OutputFormat, ProcessingParams, process_directory_to_path};

fn main() -> photoprep::Result<()> {
    let params = ProcessingParams {
        format: OutputFormat::PNG,
        crop: true,
        ..ProcessingParams::default()
    };

    let report = process_directory_to_path(
        Path::new("/photos/raw"),
        Path::new("/photos/out"),
        &params,
        true, // continue_on_error
    )?;

    println!(
        "processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(())
}
```

Background removal
------------------
```rust,no_run
use std::path::Path;
use photoprep::{
    CommandRemover, DEFAULT_REMOVAL_MODEL, ProcessingParams, process_image_with_removal,
};

fn main() -> photoprep::Result<()> {
    let remover = CommandRemover::from_template(
        "rembg i -m {model} {input} {output}",
        DEFAULT_REMOVAL_MODEL,
    )?;
    let params = ProcessingParams {
        crop: true,
        ..ProcessingParams::default()
    };

    process_image_with_removal(
        Path::new("/photos/raw/lamp.jpg"),
        Path::new("/photos/out/lamp.png"),
        &params,
        &remover,
    )
}
```

Error handling
--------------
All public functions return `photoprep::Result<T>`; match on `photoprep::Error` to
handle specific cases, e.g. empty detections or decode failures.

```rust,no_run
use std::path::Path;
use photoprep::{Error, ProcessingParams, process_image_to_path};

fn main() {
    let params = ProcessingParams {
        crop: true,
        ..ProcessingParams::default()
    };

    match process_image_to_path(Path::new("/photos/raw/empty.png"), Path::new("/out.png"), &params) {
        Ok(()) => {}
        Err(Error::NoContentFound) => eprintln!("every pixel is fully transparent"),
        Err(Error::NoContoursFound) => eprintln!("segmentation found no foreground"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`types`] — core types (`PixelBuffer`, `BoundingBox`, `WatermarkSpec`, ...).
- [`io`] — image decode/encode and the background removal trait.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::{
    DEFAULT_CANVAS_SIZE, DEFAULT_FLATTEN_BACKGROUND, DEFAULT_MAX_WIDTH,
    DEFAULT_WATERMARK_OPACITY, ProcessingParams,
};
pub use error::{Error, Result};
pub use types::{BoundingBox, Channels, OutputFormat, PixelBuffer, WatermarkSpec};

// Background removal
pub use io::removal::{BackgroundRemoval, CommandRemover, DEFAULT_REMOVAL_MODEL, RemovalError};

// Selected processing stages (keep the low-level operations public)
pub use core::processing::bounds::{DetectionStrategy, crop_to_content, detect_content_bounds};
pub use core::processing::compose::{OverlapRegion, apply_watermark, composite};
pub use core::processing::flatten::flatten;
pub use core::processing::pipeline::{PipelineConfig, run_pipeline};
pub use core::processing::resize::{normalize_to_canvas, resize_to_max_width};

// High-level API re-exports
pub use api::{
    BatchReport, config_from_params, iterate_images, load_watermark, process_directory_to_path,
    process_image_to_buffer, process_image_to_path, process_image_with_removal,
};
