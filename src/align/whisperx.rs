use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::AlignerConfig;
use crate::device::Device;
use crate::error::{KashiError, Result};
use crate::lyrics::LyricEntry;
use crate::transcribe::TranscriptionEngineTrait;
use super::{AlignedOutput, AlignerTrait, entries_from_aligned};

/// WhisperX-based forced aligner
///
/// Feeds the engine's coarse segments to the whisperx CLI, which loads an
/// alignment model keyed by the detected language and device (the tool
/// caches that model internally) and returns refined segment timing.
pub struct WhisperXAligner {
    config: AlignerConfig,
}

impl WhisperXAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AlignerTrait for WhisperXAligner {
    async fn transcribe_and_align(
        &self,
        audio_path: &Path,
        engine: &dyn TranscriptionEngineTrait,
        device: Device,
    ) -> Result<Vec<LyricEntry>> {
        let transcription = engine.transcribe(audio_path).await?;
        info!(
            "Transcribed {} coarse segments (language: {}), aligning...",
            transcription.segments.len(),
            transcription.language
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| KashiError::Alignment(format!("Failed to create temp directory: {}", e)))?;
        let segments_file = temp_dir.path().join("segments.json");
        let aligned_file = temp_dir.path().join("aligned.json");

        let segments_json = serde_json::to_string(&transcription.segments)?;
        std::fs::write(&segments_file, segments_json)
            .map_err(|e| KashiError::Alignment(format!("Failed to write segments: {}", e)))?;

        let output = Command::new(&self.config.binary_path)
            .arg("--audio")
            .arg(audio_path)
            .arg("--segments")
            .arg(&segments_file)
            .arg("--language")
            .arg(&transcription.language)
            .arg("--device")
            .arg(device.as_arg())
            .arg("--output")
            .arg(&aligned_file)
            .output()
            .map_err(|e| KashiError::Alignment(format!("Failed to execute whisperx: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KashiError::Alignment(format!(
                "whisperx failed: {}",
                stderr
            )));
        }

        let aligned_json = std::fs::read_to_string(&aligned_file)
            .map_err(|e| KashiError::Alignment(format!("Failed to read aligned output: {}", e)))?;
        let aligned: AlignedOutput = serde_json::from_str(&aligned_json)
            .map_err(|e| KashiError::Alignment(format!("Failed to parse aligned JSON: {}", e)))?;

        let entries = entries_from_aligned(aligned);
        debug!("Alignment produced {} lyric entries", entries.len());
        Ok(entries)
    }
}
