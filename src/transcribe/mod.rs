// Modular transcription architecture
//
// The transcription engine is the expensive, load-once resource of a run.
// The workflow constructs it lazily through an EngineLoader, only after
// file discovery confirms there is work to do, and passes it by reference
// into every alignment call.

pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TranscriberConfig;
use crate::error::Result;

/// A coarse speech segment with start/end timing in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

/// Coarse transcription result with the detected language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub language: String,
    pub segments: Vec<TranscriptionSegment>,
}

/// Main trait for transcription engine operations
#[async_trait]
pub trait TranscriptionEngineTrait: Send + Sync {
    /// Transcribe an audio file into coarse timed segments
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription>;
}

/// Deferred engine constructor invoked at most once per run
pub type EngineLoader = Box<dyn Fn() -> Result<Box<dyn TranscriptionEngineTrait>> + Send + Sync>;

/// Factory for creating transcription engine loaders
pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    /// Create a loader for the default whisper engine
    pub fn create_loader(config: TranscriberConfig) -> EngineLoader {
        Box::new(move || {
            let engine = whisper::WhisperEngine::load(config.clone())?;
            Ok(Box::new(engine) as Box<dyn TranscriptionEngineTrait>)
        })
    }
}
