//! Kashi - Automated Timed-Lyrics Generation Workflow
//!
//! A Rust implementation of a batch workflow for generating time-synchronized
//! LRC lyric files from audio, using demucs for vocal isolation and
//! whisper/whisperx for transcription and forced alignment.

pub mod cli;
pub mod config;
pub mod workflow;
pub mod separate;
pub mod transcribe;
pub mod align;
pub mod lyrics;
pub mod timestamp;
pub mod device;
pub mod error;
