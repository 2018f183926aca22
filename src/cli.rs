use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing audio files to process
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// Comma-separated audio file extensions to find in batch mode [default: .mp3]
    #[arg(long)]
    pub ext: Option<String>,

    /// Overwrite existing .lrc files
    #[arg(long)]
    pub overwrite: bool,

    /// Whisper model to use (tiny, base, small, medium, large, large-v2, large-v3) [default: large-v3]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Source separation method to extract vocals before alignment [default: demucs]
    #[arg(long)]
    pub sep: Option<String>,

    /// Alignment tool to use after transcription [default: whisperx]
    #[arg(long)]
    pub aligner: Option<String>,

    /// Output directory for generated .lrc files (must exist)
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
