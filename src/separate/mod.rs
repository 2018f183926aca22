// Modular vocal separation architecture
//
// This module provides vocal separation implementations through a factory
// pattern. Only the demucs backend is currently supported; an unsupported
// method yields no separator and the workflow skips the affected files.

pub mod demucs;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::SeparatorConfig;
use crate::device::Device;
use crate::error::Result;

/// Main trait for vocal separation operations
#[async_trait]
pub trait SeparatorTrait: Send + Sync {
    /// Separate the vocal stem from a mixed audio file
    ///
    /// Returns the path to the isolated vocal track inside `work_dir`.
    async fn separate(&self, input: &Path, work_dir: &Path, device: Device) -> Result<PathBuf>;

    /// Check if the separation tool is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating separator instances
pub struct SeparatorFactory;

impl SeparatorFactory {
    /// Create a separator for the requested method, or None if unsupported
    pub fn create(method: &str, config: SeparatorConfig) -> Option<Box<dyn SeparatorTrait>> {
        match method {
            "demucs" => Some(Box::new(demucs::DemucsSeparator::new(config))),
            _ => None,
        }
    }
}
