// Modular forced-alignment architecture
//
// An aligner refines the coarse segment timing produced by the
// transcription engine and flattens the result into timed lyric entries.
// Only the whisperx backend is supported; requesting any other backend is
// a configuration error that aborts the run before heavy work starts.

pub mod whisperx;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::AlignerConfig;
use crate::device::Device;
use crate::error::{KashiError, Result};
use crate::lyrics::LyricEntry;
use crate::transcribe::TranscriptionEngineTrait;

/// A refined segment returned by the alignment backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub text: String,
}

/// Alignment backend output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedOutput {
    #[serde(default)]
    pub segments: Vec<AlignedSegment>,
}

/// Main trait for transcription-plus-alignment operations
#[async_trait]
pub trait AlignerTrait: Send + Sync {
    /// Transcribe audio with the shared engine, then refine segment timing
    ///
    /// Returns a flat, unsorted sequence of lyric entries; sorting is the
    /// writer's responsibility.
    async fn transcribe_and_align(
        &self,
        audio_path: &Path,
        engine: &dyn TranscriptionEngineTrait,
        device: Device,
    ) -> Result<Vec<LyricEntry>>;
}

/// Flatten refined segments into lyric entries
///
/// Text is trimmed and segments left with empty text are dropped. Missing
/// start or text fields were defaulted to 0.0 / "" at parse time.
pub fn entries_from_aligned(aligned: AlignedOutput) -> Vec<LyricEntry> {
    aligned
        .segments
        .into_iter()
        .filter_map(|seg| {
            let text = seg.text.trim();
            if text.is_empty() {
                None
            } else {
                Some(LyricEntry::new(seg.start, text))
            }
        })
        .collect()
}

/// Factory for creating aligner instances
pub struct AlignerFactory;

impl AlignerFactory {
    /// Create an aligner for the requested backend
    pub fn create(backend: &str, config: AlignerConfig) -> Result<Box<dyn AlignerTrait>> {
        match backend {
            "whisperx" => Ok(Box::new(whisperx::WhisperXAligner::new(config))),
            other => Err(KashiError::Config(format!("Unsupported aligner: {}", other))),
        }
    }
}
