//! High-level, ergonomic library API: process single images to files or
//! in-memory buffers, batch helpers for directories, and watermark loading.
//! Prefer these entrypoints over the low-level processing modules when
//! integrating photoprep.
use std::path::Path;

use tracing::warn;

use crate::core::params::{DEFAULT_FLATTEN_BACKGROUND, ProcessingParams};
use crate::core::processing::pipeline::{PipelineConfig, run_pipeline};
use crate::error::{Error, Result};
use crate::io::{self, BackgroundRemoval};
use crate::types::{OutputFormat, PixelBuffer, WatermarkSpec};

/// Load a watermark overlay from disk and pair it with an opacity.
/// The file must decode to a 4-channel buffer.
pub fn load_watermark(path: &Path, opacity: f32) -> Result<WatermarkSpec> {
    let buffer = io::load_buffer(path)?;
    WatermarkSpec::new(buffer, opacity)
}

fn watermark_from_params(params: &ProcessingParams) -> Result<Option<WatermarkSpec>> {
    match &params.watermark {
        Some(path) => Ok(Some(load_watermark(path, params.opacity)?)),
        None => Ok(None),
    }
}

fn config_for_output(params: &ProcessingParams, format: OutputFormat) -> Result<PipelineConfig> {
    Ok(PipelineConfig {
        crop_to_content: params.crop,
        canvas_size: params.canvas_size,
        denoise: params.denoise,
        watermark: watermark_from_params(params)?,
        flatten_background: if format.supports_alpha() {
            None
        } else {
            Some(DEFAULT_FLATTEN_BACKGROUND)
        },
    })
}

/// Translate file-level parameters into a pipeline configuration, loading
/// the watermark if one is named. Formats that cannot carry alpha get
/// their output flattened onto white.
pub fn config_from_params(params: &ProcessingParams) -> Result<PipelineConfig> {
    config_for_output(params, params.format)
}

/// Process one image entirely in memory. `params.format` decides whether
/// the result keeps its alpha channel.
pub fn process_image_to_buffer(input: &Path, params: &ProcessingParams) -> Result<PixelBuffer> {
    let config = config_from_params(params)?;
    let buffer = io::load_buffer(input)?;
    run_pipeline(buffer, &config)
}

/// Process one image file and write the result to `output`. The output
/// extension picks the container; results headed for JPEG are flattened
/// onto white first.
pub fn process_image_to_path(input: &Path, output: &Path, params: &ProcessingParams) -> Result<()> {
    let format = io::format_for_path(output)?;
    let config = config_for_output(params, format)?;
    let buffer = io::load_buffer(input)?;
    let processed = run_pipeline(buffer, &config)?;
    io::save_buffer(&processed, output)
}

/// Like [`process_image_to_path`], but strips the background first. The
/// removal tool hands back an RGBA PNG, so content detection runs on the
/// alpha channel afterwards.
pub fn process_image_with_removal(
    input: &Path,
    output: &Path,
    params: &ProcessingParams,
    remover: &dyn BackgroundRemoval,
) -> Result<()> {
    let bytes = std::fs::read(input)?;
    let cut_out = remover.remove_background(&bytes)?;
    let buffer = io::decode_bytes(&cut_out)?;

    let format = io::format_for_path(output)?;
    let config = config_for_output(params, format)?;
    let processed = run_pipeline(buffer, &config)?;
    io::save_buffer(&processed, output)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Return a sorted iterator over supported image files directly inside
/// `input_dir`.
pub fn iterate_images(input_dir: &Path) -> Result<std::vec::IntoIter<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path.is_file() && io::is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Process every supported image directly inside `input_dir` into
/// `output_dir`, naming outputs after the input stem with the extension of
/// `params.format`. Unsupported files are counted as skipped. If
/// `continue_on_error` is true, per-file errors are logged in the report
/// and processing continues; otherwise, the first error is returned.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &ProcessingParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir).map_err(Error::from)?;

    let mut report = BatchReport::default();

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path.is_file() {
            entries.push(path);
        }
    }
    entries.sort();

    for path in entries {
        if !io::is_supported_image(&path) {
            report.skipped += 1;
            continue;
        }
        let stem = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => {
                report.skipped += 1;
                continue;
            }
        };
        let output_path = output_dir.join(format!("{}.{}", stem, params.format.extension()));

        match process_image_to_path(&path, &output_path, params) {
            Ok(()) => report.processed += 1,
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
            }
        }
    }

    Ok(report)
}
