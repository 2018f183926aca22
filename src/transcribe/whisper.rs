use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::config::TranscriberConfig;
use crate::error::{KashiError, Result};
use super::{Transcription, TranscriptionEngineTrait, TranscriptionSegment};

/// Whisper CLI JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

/// Whisper CLI segment format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl From<WhisperOutput> for Transcription {
    fn from(output: WhisperOutput) -> Self {
        let segments = output
            .segments
            .into_iter()
            .map(|seg| TranscriptionSegment {
                start: seg.start,
                end: seg.end,
                text: seg.text,
            })
            .collect();

        Transcription {
            language: output.language.unwrap_or_else(|| "en".to_string()),
            segments,
        }
    }
}

/// Whisper-based transcription engine invoking the whisper CLI
///
/// Loading verifies the binary is invocable and fixes the model name; the
/// model itself is loaded by the external tool on every invocation.
pub struct WhisperEngine {
    config: TranscriberConfig,
}

impl WhisperEngine {
    pub fn load(config: TranscriberConfig) -> Result<Self> {
        info!(
            "Loading whisper model '{}' (this may take a while)...",
            config.model
        );

        let output = Command::new(&config.binary_path)
            .arg("--help")
            .output()
            .map_err(|e| {
                KashiError::ServiceUnavailable(format!(
                    "'{}' is not available. Install with: pip install openai-whisper ({})",
                    config.binary_path, e
                ))
            })?;

        if !output.status.success() {
            return Err(KashiError::ServiceUnavailable(format!(
                "'{}' availability check failed",
                config.binary_path
            )));
        }

        Ok(Self { config })
    }
}

#[async_trait]
impl TranscriptionEngineTrait for WhisperEngine {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        info!("Transcribing {}", audio_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| KashiError::Transcription(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let output = Command::new(&self.config.binary_path)
            .arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--task")
            .arg("transcribe")
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json")
            .output()
            .map_err(|e| KashiError::Transcription(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KashiError::Transcription(format!(
                "whisper failed: {}",
                stderr
            )));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| KashiError::Transcription("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file)
            .map_err(|e| KashiError::Transcription(format!("Failed to read whisper output: {}", e)))?;

        let whisper_output: WhisperOutput = serde_json::from_str(&json_content)
            .map_err(|e| KashiError::Transcription(format!("Failed to parse whisper JSON: {}", e)))?;

        Ok(whisper_output.into())
    }
}
