use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::cli::Args;
use crate::error::{KashiError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub separator: SeparatorConfig,
    pub transcriber: TranscriberConfig,
    pub aligner: AlignerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparatorConfig {
    /// Path to the separation binary (e.g., demucs)
    pub binary_path: String,
    /// Separation method; only "demucs" is supported
    pub method: String,
    /// Working directory for separated stems
    pub work_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the transcriber binary (e.g., whisper)
    pub binary_path: String,
    /// Whisper model to use (tiny, base, small, medium, large, large-v2, large-v3)
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Path to the alignment binary (e.g., whisperx)
    pub binary_path: String,
    /// Alignment backend; only "whisperx" is supported
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Comma-separated audio extensions to discover in batch mode
    pub extensions: String,
    /// Overwrite existing .lrc files
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: SeparatorConfig {
                binary_path: "demucs".to_string(),
                method: "demucs".to_string(),
                work_dir: "temp".to_string(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "large-v3".to_string(),
            },
            aligner: AlignerConfig {
                binary_path: "whisperx".to_string(),
                backend: "whisperx".to_string(),
            },
            output: OutputConfig {
                extensions: ".mp3".to_string(),
                overwrite: false,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KashiError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| KashiError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KashiError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| KashiError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply command line overrides onto the loaded configuration
    ///
    /// Only flags the user actually passed take effect; absent flags leave
    /// the configured values untouched.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(model) = &args.model {
            self.transcriber.model = model.clone();
        }
        if let Some(sep) = &args.sep {
            self.separator.method = sep.clone();
        }
        if let Some(aligner) = &args.aligner {
            self.aligner.backend = aligner.clone();
        }
        if let Some(ext) = &args.ext {
            self.output.extensions = ext.clone();
        }
        if args.overwrite {
            self.output.overwrite = true;
        }
    }

    /// Normalize the configured extension list into lowercase dotted suffixes
    ///
    /// Splits on commas, trims whitespace, skips empty items, and prepends a
    /// missing leading dot, e.g. "mp3, .WAV" becomes [".mp3", ".wav"].
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.output
            .extensions
            .split(',')
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(|e| {
                let e = e.to_lowercase();
                if e.starts_with('.') { e } else { format!(".{}", e) }
            })
            .collect()
    }
}
