use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::timestamp::format_lrc_timestamp;

/// A single timed lyric line produced by the alignment stage
#[derive(Debug, Clone, PartialEq)]
pub struct LyricEntry {
    pub seconds: f64,
    pub text: String,
}

impl LyricEntry {
    pub fn new<S: Into<String>>(seconds: f64, text: S) -> Self {
        Self {
            seconds,
            text: text.into(),
        }
    }
}

/// Generate an LRC file from timed lyric entries
///
/// Entries are stably sorted ascending by timestamp before writing, so
/// equal timestamps keep their original relative order. The destination
/// is overwritten unconditionally. Entries with empty text must have been
/// filtered out upstream; the writer does not filter.
pub async fn write_lrc<P: AsRef<Path>>(entries: &[LyricEntry], output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating LRC file: {}", output_path.display());

    let mut sorted: Vec<&LyricEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.seconds.total_cmp(&b.seconds));

    let mut lrc_content = String::new();
    for entry in sorted {
        lrc_content.push_str(&format_lrc_timestamp(entry.seconds));
        lrc_content.push_str(&entry.text);
        lrc_content.push('\n');
    }

    fs::write(output_path, lrc_content).await?;

    info!("LRC file generated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_lrc_sorts_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.lrc");

        let entries = vec![LyricEntry::new(2.5, "b"), LyricEntry::new(1.0, "a")];
        write_lrc(&entries, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[00:01.00]a\n[00:02.50]b\n");
    }

    #[tokio::test]
    async fn test_write_lrc_equal_timestamps_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.lrc");

        let entries = vec![
            LyricEntry::new(3.0, "first"),
            LyricEntry::new(1.0, "opening"),
            LyricEntry::new(3.0, "second"),
        ];
        write_lrc(&entries, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "[00:01.00]opening\n[00:03.00]first\n[00:03.00]second\n"
        );
    }

    #[tokio::test]
    async fn test_write_lrc_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.lrc");
        std::fs::write(&path, "stale content").unwrap();

        let entries = vec![LyricEntry::new(0.0, "fresh")];
        write_lrc(&entries, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[00:00.00]fresh\n");
    }

    #[tokio::test]
    async fn test_write_lrc_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.lrc");

        let entries = vec![LyricEntry::new(0.0, "x")];
        assert!(write_lrc(&entries, &path).await.is_err());
    }
}
