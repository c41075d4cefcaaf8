use std::process::Command;

use thiserror::Error;
use tracing::{info, warn};

/// Segmentation model requested from the removal tool by default.
pub const DEFAULT_REMOVAL_MODEL: &str = "isnet-general";

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid removal command template: {0}")]
    InvalidTemplate(String),

    #[error("Removal command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Removal command produced no output file")]
    MissingOutput,
}

/// Strips the background from an encoded image. Implementations return a
/// 4-channel encoded PNG where removed areas are fully transparent.
pub trait BackgroundRemoval {
    fn remove_background(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError>;
}

/// Removal backed by an external command, exchanging PNG files through a
/// temporary directory.
///
/// The template is split on whitespace; `{input}`, `{output}` and
/// `{model}` placeholders in any argument are substituted per call.
#[derive(Debug)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
    model: String,
}

impl CommandRemover {
    pub fn from_template(template: &str, model: &str) -> Result<Self, RemovalError> {
        let mut parts = template.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| RemovalError::InvalidTemplate("empty command".to_string()))?;
        Ok(CommandRemover {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
            model: model.to_string(),
        })
    }
}

impl BackgroundRemoval for CommandRemover {
    fn remove_background(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("input.png");
        let output_path = dir.path().join("output.png");
        std::fs::write(&input_path, input)?;

        let mut command = Command::new(&self.program);
        for arg in &self.args {
            command.arg(
                arg.replace("{input}", &input_path.to_string_lossy())
                    .replace("{output}", &output_path.to_string_lossy())
                    .replace("{model}", &self.model),
            );
        }

        info!("Running background removal: {} (model {})", self.program, self.model);
        let output = command.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!("Background removal failed: {}", stderr.trim());
            return Err(RemovalError::CommandFailed {
                status: output.status.to_string(),
                stderr,
            });
        }
        if !output_path.exists() {
            return Err(RemovalError::MissingOutput);
        }
        Ok(std::fs::read(&output_path)?)
    }
}
