use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SeparatorConfig;
use crate::device::Device;
use crate::error::{KashiError, Result};
use super::SeparatorTrait;

/// Demucs-based vocal separator
///
/// Invokes the demucs CLI in two-stem mode and locates the vocals stem in
/// its output tree. Demucs writes to `work_dir/<model>/<basename>/vocals.*`
/// where the model directory name varies between versions, so the output is
/// discovered by recursive search rather than a fixed path.
pub struct DemucsSeparator {
    config: SeparatorConfig,
}

impl DemucsSeparator {
    pub fn new(config: SeparatorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SeparatorTrait for DemucsSeparator {
    async fn separate(&self, input: &Path, work_dir: &Path, device: Device) -> Result<PathBuf> {
        info!("Extracting vocals from {}", input.display());

        std::fs::create_dir_all(work_dir)?;

        let output = Command::new(&self.config.binary_path)
            .arg("--mp3")
            .arg("--two-stems")
            .arg("vocals")
            .arg("-d")
            .arg(device.as_arg())
            .arg("-o")
            .arg(work_dir)
            .arg(input)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => KashiError::ServiceUnavailable(format!(
                    "{} not found. Please install it: pip install demucs",
                    self.config.binary_path
                )),
                _ => KashiError::Separation(format!("Failed to execute demucs: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KashiError::Separation(format!(
                "demucs failed with {}: {}",
                output.status, stderr
            )));
        }

        let vocals = find_vocals_artifact(work_dir).ok_or_else(|| {
            KashiError::OutputNotFound(format!(
                "no vocals stem found under {}",
                work_dir.display()
            ))
        })?;

        debug!("Found vocals stem at {}", vocals.display());
        Ok(vocals)
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("--help")
            .output()
            .map_err(|e| {
                KashiError::ServiceUnavailable(format!("Separation tool not found: {}", e))
            })?;

        if output.status.success() {
            info!("Separation tool is available");
            Ok(())
        } else {
            Err(KashiError::ServiceUnavailable(
                "Separation tool check failed".to_string(),
            ))
        }
    }
}

/// Locate a `vocals.*` artifact under the work directory
///
/// Candidates are collected in sorted path order so the choice is stable
/// across runs. A lossless `.wav` stem is preferred when present.
fn find_vocals_artifact(work_dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(work_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.file_stem()
                .map(|stem| stem.eq_ignore_ascii_case("vocals"))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    candidates
        .iter()
        .find(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .cloned()
        .or_else(|| candidates.into_iter().next())
}
