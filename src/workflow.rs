use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::align::{AlignerFactory, AlignerTrait};
use crate::config::Config;
use crate::device::Device;
use crate::error::{KashiError, Result};
use crate::lyrics::write_lrc;
use crate::separate::{SeparatorFactory, SeparatorTrait};
use crate::transcribe::{EngineLoader, TranscriptionEngineFactory, TranscriptionEngineTrait};

/// One discovered audio file and its target lyric path
#[derive(Debug, Clone)]
pub struct AudioJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

pub struct Workflow {
    config: Config,
    device: Device,
    /// None when the configured separation method is unsupported; affected
    /// files are skipped with a warning.
    separator: Option<Box<dyn SeparatorTrait>>,
    aligner: Box<dyn AlignerTrait>,
    engine_loader: EngineLoader,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let aligner = AlignerFactory::create(&config.aligner.backend, config.aligner.clone())?;
        let separator =
            SeparatorFactory::create(&config.separator.method, config.separator.clone());
        let engine_loader = TranscriptionEngineFactory::create_loader(config.transcriber.clone());
        let device = Device::detect();

        Ok(Self {
            config,
            device,
            separator,
            aligner,
            engine_loader,
        })
    }

    /// Construct a workflow from explicit collaborators
    pub fn with_services(
        config: Config,
        device: Device,
        separator: Option<Box<dyn SeparatorTrait>>,
        aligner: Box<dyn AlignerTrait>,
        engine_loader: EngineLoader,
    ) -> Self {
        Self {
            config,
            device,
            separator,
            aligner,
            engine_loader,
        }
    }

    /// Process every matching audio file in the input directory
    ///
    /// Per-file failures are logged and do not abort the batch. The
    /// transcription engine is loaded at most once, and only when at least
    /// one file was discovered.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.exists() {
            return Err(KashiError::Config(format!(
                "Input directory not found: {}",
                input_dir.display()
            )));
        }
        if !output_dir.exists() {
            return Err(KashiError::Config(format!(
                "Output directory not found: {}",
                output_dir.display()
            )));
        }

        let jobs = self.discover_jobs(input_dir, output_dir)?;
        if jobs.is_empty() {
            info!(
                "No audio files found in {} with extensions: {}",
                input_dir.display(),
                self.config.normalized_extensions().join(", ")
            );
            return Ok(());
        }

        info!(
            "Found {} files in {}. Starting processing...",
            jobs.len(),
            input_dir.display()
        );

        // A missing separation tool skips files rather than aborting the
        // run, so the probe result is only surfaced as a warning.
        if let Some(separator) = &self.separator {
            if let Err(e) = separator.check_availability() {
                warn!("Separation tool check failed: {}", e);
            }
        }

        let engine = (self.engine_loader)()?;

        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        for job in &jobs {
            pb.set_message(
                job.source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.process_job(job, engine.as_ref()).await {
                Ok(()) => info!("Successfully processed: {}", job.source.display()),
                Err(e) => warn!("Failed to process {}: {}", job.source.display(), e),
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        info!("Processing complete.");
        Ok(())
    }

    /// List immediate children of the input directory matching the
    /// configured extensions, sorted lexicographically
    fn discover_jobs(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<AudioJob>> {
        let extensions = self.config.normalized_extensions();

        let mut sources: Vec<PathBuf> = std::fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .map(|ext| extensions.contains(&format!(".{}", ext.to_string_lossy().to_lowercase())))
                    .unwrap_or(false)
            })
            .collect();
        sources.sort();

        let jobs = sources
            .into_iter()
            .filter_map(|source| {
                let stem = source.file_stem()?;
                let target = output_dir.join(format!("{}.lrc", stem.to_string_lossy()));
                Some(AudioJob { source, target })
            })
            .collect();

        Ok(jobs)
    }

    async fn process_job(
        &self,
        job: &AudioJob,
        engine: &dyn TranscriptionEngineTrait,
    ) -> Result<()> {
        let separator = match &self.separator {
            Some(separator) => separator,
            None => {
                return Err(KashiError::Separation(format!(
                    "Unsupported separation method: {}. Skipping file.",
                    self.config.separator.method
                )));
            }
        };

        let work_dir = Path::new(&self.config.separator.work_dir);
        let vocals = separator
            .separate(&job.source, work_dir, self.device)
            .await?;
        info!("Extracted vocals to {}", vocals.display());

        let entries = self
            .aligner
            .transcribe_and_align(&vocals, engine, self.device)
            .await?;

        write_lrc(&entries, &job.target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::lyrics::LyricEntry;
    use crate::transcribe::{Transcription, TranscriptionEngineTrait};

    struct StubSeparator {
        fail_on: Option<String>,
    }

    #[async_trait]
    impl SeparatorTrait for StubSeparator {
        async fn separate(
            &self,
            input: &Path,
            _work_dir: &Path,
            _device: Device,
        ) -> Result<PathBuf> {
            if let Some(marker) = &self.fail_on {
                if input.to_string_lossy().contains(marker.as_str()) {
                    return Err(KashiError::Separation("separation crashed".to_string()));
                }
            }
            Ok(input.to_path_buf())
        }

        fn check_availability(&self) -> Result<()> {
            Ok(())
        }
    }

    struct UnavailableSeparator;

    #[async_trait]
    impl SeparatorTrait for UnavailableSeparator {
        async fn separate(
            &self,
            input: &Path,
            _work_dir: &Path,
            _device: Device,
        ) -> Result<PathBuf> {
            Ok(input.to_path_buf())
        }

        fn check_availability(&self) -> Result<()> {
            Err(KashiError::ServiceUnavailable(
                "demucs not found".to_string(),
            ))
        }
    }

    struct StubAligner;

    #[async_trait]
    impl AlignerTrait for StubAligner {
        async fn transcribe_and_align(
            &self,
            _audio_path: &Path,
            _engine: &dyn TranscriptionEngineTrait,
            _device: Device,
        ) -> Result<Vec<LyricEntry>> {
            Ok(vec![LyricEntry::new(1.0, "line")])
        }
    }

    struct StubEngine;

    #[async_trait]
    impl TranscriptionEngineTrait for StubEngine {
        async fn transcribe(&self, _audio_path: &Path) -> Result<Transcription> {
            Ok(Transcription {
                language: "en".to_string(),
                segments: vec![],
            })
        }
    }

    fn counting_loader(counter: Arc<AtomicUsize>) -> EngineLoader {
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubEngine))
        })
    }

    fn stub_workflow(fail_on: Option<String>, counter: Arc<AtomicUsize>) -> Workflow {
        Workflow::with_services(
            Config::default(),
            Device::Fallback,
            Some(Box::new(StubSeparator { fail_on })),
            Box::new(StubAligner),
            counting_loader(counter),
        )
    }

    #[tokio::test]
    async fn test_zero_jobs_never_loads_engine() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let loads = Arc::new(AtomicUsize::new(0));

        let workflow = stub_workflow(None, loads.clone());
        workflow.run(input.path(), output.path()).await.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_job_does_not_abort_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["track1.mp3", "track2.mp3", "track3.mp3"] {
            std::fs::write(input.path().join(name), b"audio").unwrap();
        }

        let loads = Arc::new(AtomicUsize::new(0));
        let workflow = stub_workflow(Some("track2".to_string()), loads.clone());
        workflow.run(input.path(), output.path()).await.unwrap();

        assert!(output.path().join("track1.lrc").exists());
        assert!(!output.path().join("track2.lrc").exists());
        assert!(output.path().join("track3.lrc").exists());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discovery_filters_and_sorts() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("b.mp3"), b"").unwrap();
        std::fs::write(input.path().join("a.MP3"), b"").unwrap();
        std::fs::write(input.path().join("c.wav"), b"").unwrap();
        std::fs::write(input.path().join("notes.txt"), b"").unwrap();
        std::fs::create_dir(input.path().join("sub.mp3")).unwrap();

        let workflow = stub_workflow(None, Arc::new(AtomicUsize::new(0)));
        let jobs = workflow.discover_jobs(input.path(), output.path()).unwrap();

        let names: Vec<String> = jobs
            .iter()
            .map(|j| j.source.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3"]);
        assert_eq!(jobs[0].target, output.path().join("a.lrc"));
    }

    #[tokio::test]
    async fn test_unsupported_separation_method_skips_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("track.mp3"), b"").unwrap();

        let loads = Arc::new(AtomicUsize::new(0));
        let workflow = Workflow::with_services(
            Config::default(),
            Device::Fallback,
            None,
            Box::new(StubAligner),
            counting_loader(loads.clone()),
        );
        workflow.run(input.path(), output.path()).await.unwrap();

        assert!(!output.path().join("track.lrc").exists());
    }

    #[tokio::test]
    async fn test_failed_availability_check_does_not_abort_run() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("track.mp3"), b"").unwrap();

        let workflow = Workflow::with_services(
            Config::default(),
            Device::Fallback,
            Some(Box::new(UnavailableSeparator)),
            Box::new(StubAligner),
            counting_loader(Arc::new(AtomicUsize::new(0))),
        );
        workflow.run(input.path(), output.path()).await.unwrap();

        // The probe failure is a warning only; the batch still runs
        assert!(output.path().join("track.lrc").exists());
    }

    #[tokio::test]
    async fn test_missing_input_directory_aborts() {
        let output = tempfile::tempdir().unwrap();
        let workflow = stub_workflow(None, Arc::new(AtomicUsize::new(0)));

        let result = workflow
            .run(Path::new("/nonexistent/kashi-input"), output.path())
            .await;
        assert!(matches!(result, Err(KashiError::Config(_))));
    }

    #[tokio::test]
    async fn test_engine_load_failure_aborts_run() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("track.mp3"), b"").unwrap();

        let loader: EngineLoader = Box::new(|| {
            Err(KashiError::ServiceUnavailable(
                "whisper missing".to_string(),
            ))
        });
        let workflow = Workflow::with_services(
            Config::default(),
            Device::Fallback,
            Some(Box::new(StubSeparator { fail_on: None })),
            Box::new(StubAligner),
            loader,
        );

        let result = workflow.run(input.path(), output.path()).await;
        assert!(matches!(result, Err(KashiError::ServiceUnavailable(_))));
    }
}
