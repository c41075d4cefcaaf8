use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use photoprep::api;
use photoprep::core::params::ProcessingParams;
use photoprep::io::{CommandRemover, is_supported_image};

use super::args::CliArgs;
use super::errors::AppError;

/// Merge the optional parameters file with explicit command line flags.
/// Flags win over file values; anything unset falls back to the defaults.
fn resolve_params(args: &CliArgs) -> Result<ProcessingParams, AppError> {
    let mut params = match &args.params {
        Some(path) => ProcessingParams::from_json_file(path).map_err(AppError::Core)?,
        None => ProcessingParams::default(),
    };

    if let Some(format) = args.format {
        params.format = format;
    }
    if args.crop {
        params.crop = true;
    }
    if let Some(size) = args.size {
        if size == 0 {
            return Err(AppError::ZeroSize { size });
        }
        params.canvas_size = size;
    }
    if args.denoise {
        params.denoise = true;
    }
    if let Some(watermark) = &args.watermark {
        params.watermark = Some(watermark.clone());
    }
    if let Some(opacity) = args.opacity {
        params.opacity = opacity;
    }

    if !(0.0..=1.0).contains(&params.opacity) {
        return Err(AppError::InvalidOpacity {
            opacity: params.opacity,
        });
    }
    if params.canvas_size == 0 {
        return Err(AppError::ZeroSize {
            size: params.canvas_size,
        });
    }

    Ok(params)
}

fn process_single_file(
    input: &PathBuf,
    output: &PathBuf,
    params: &ProcessingParams,
    bg_command: Option<&str>,
    bg_model: &str,
) -> Result<(), AppError> {
    match bg_command {
        Some(template) => {
            let remover = CommandRemover::from_template(template, bg_model)
                .map_err(photoprep::Error::from)?;
            api::process_image_with_removal(input, output, params, &remover)?;
        }
        None => api::process_image_to_path(input, output, params)?,
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let params = resolve_params(&args)?;
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        fs::create_dir_all(&output_dir)?;

        info!("Starting batch processing from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let mut processed = 0;
        let mut skipped = 0;
        let mut errors = 0;

        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&input_dir)? {
            entries.push(entry?.path());
        }
        entries.sort();

        for path in entries {
            if !path.is_file() || !is_supported_image(&path) {
                info!("Skipping unsupported entry: {:?}", path);
                skipped += 1;
                continue;
            }
            let stem = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let output_name = format!("{}.{}", stem, params.format.extension());
            let output_path = output_dir.join(&output_name);

            info!("Processing: {:?} -> {:?}", path, output_path);

            match process_single_file(
                &path,
                &output_path,
                &params,
                args.bg_command.as_deref(),
                &args.bg_model,
            ) {
                Ok(()) => {
                    info!("Successfully processed: {:?}\n", path);
                    processed += 1;
                }
                Err(e) => {
                    warn!("Error processing {:?}: {}", path, e);
                    errors += 1;
                }
            }
        }

        info!("Batch processing complete!");
        info!("Processed: {}", processed);
        info!("Skipped: {}", skipped);
        info!("Errors: {}", errors);
    } else {
        let input = args.input.ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;
        let output = args.output.ok_or(AppError::MissingArgument {
            arg: "--output".to_string(),
        })?;

        process_single_file(
            &input,
            &output,
            &params,
            args.bg_command.as_deref(),
            &args.bg_model,
        )?;
        info!("Successfully processed: {:?} -> {:?}\n", input, output);
    }

    Ok(())
}
