use clap::Parser;
use std::path::PathBuf;

use photoprep::io::DEFAULT_REMOVAL_MODEL;
use photoprep::types::OutputFormat;

#[derive(Parser)]
#[command(name = "photoprep", version, about = "photoprep CLI")]
pub struct CliArgs {
    /// Input image file (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output filename (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Output format for batch outputs (png or jpeg)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JSON parameters file; explicit flags override its values
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Crop to detected content and re-center on the square canvas
    #[arg(long, default_value_t = false)]
    pub crop: bool,

    /// Canvas side length used after cropping
    #[arg(long)]
    pub size: Option<usize>,

    /// Clean the binary mask with a morphological opening before contour
    /// detection (3-channel inputs only)
    #[arg(long, default_value_t = false)]
    pub denoise: bool,

    /// Watermark overlay image (must carry an alpha channel)
    #[arg(short = 'w', long)]
    pub watermark: Option<PathBuf>,

    /// Watermark opacity between 0.0 and 1.0
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Background removal command template run per file;
    /// {input}, {output} and {model} are substituted
    #[arg(long)]
    pub bg_command: Option<String>,

    /// Segmentation model passed to the removal command
    #[arg(long, default_value = DEFAULT_REMOVAL_MODEL)]
    pub bg_model: String,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: continue processing other files when one fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,
}
