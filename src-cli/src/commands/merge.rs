//! `stitch merge`: combine per-chunk diarisation into one timeline

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use stitch_core::{ChunkRecord, Exporter, MergedDiarisation};
use stitch_diarization::{load_chunk, ChunkMerger, MergeConfig};
use tracing::info;

use crate::config::Config;

pub struct MergeArgs {
    pub output: PathBuf,
    pub chunks: Vec<PathBuf>,
    pub chunk_size: Option<f64>,
    pub overlap: Option<f64>,
    pub threshold: Option<f64>,
}

impl MergeArgs {
    /// Command-line values win over the config file
    fn merge_config(&self, config: &Config) -> MergeConfig {
        let base = &config.merge;
        MergeConfig {
            chunk_size: self.chunk_size.unwrap_or(base.chunk_size),
            overlap: self.overlap.unwrap_or(base.overlap),
            threshold: self.threshold.unwrap_or(base.threshold),
        }
    }
}

pub async fn execute(args: MergeArgs, config: &Config) -> Result<()> {
    let merged = run(&args, config).await?;

    Exporter::to_json(&merged, &args.output, true)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Merged {} chunks", args.chunks.len());
    println!("Total segments: {}", merged.segments.len());
    println!("Speakers found: {}", merged.speaker_count);
    println!("Output: {}", args.output.display());

    Ok(())
}

/// Load, merge and build the output record without writing anything
pub async fn run(args: &MergeArgs, config: &Config) -> Result<MergedDiarisation> {
    let merge_config = args.merge_config(config);
    merge_config.validate()?;
    info!(
        chunk_size = merge_config.chunk_size,
        overlap = merge_config.overlap,
        threshold = merge_config.threshold,
        "Merging {} chunks",
        args.chunks.len()
    );

    let chunks = load_chunks(&args.chunks).await?;
    let timestamp = match args.chunks.first() {
        Some(path) => modified_timestamp(path).await?,
        None => 0.0,
    };

    let merger = ChunkMerger::new(merge_config);
    let timeline = tokio::task::spawn_blocking(move || merger.merge_uniform(&chunks))
        .await
        .context("merge task failed")??;

    Ok(timeline.into_record(timestamp))
}

/// Read all chunk files concurrently, keeping their order
pub async fn load_chunks(paths: &[PathBuf]) -> Result<Vec<ChunkRecord>> {
    try_join_all(
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| read_chunk(index, path.clone())),
    )
    .await
}

async fn read_chunk(index: usize, path: PathBuf) -> Result<ChunkRecord> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || load_chunk(index, &path))
        .await
        .with_context(|| format!("chunk loader for {} failed", display))?
        .with_context(|| format!("failed to load chunk {} ({})", index, display))
}

/// Modification time of `path` as Unix seconds
async fn modified_timestamp(path: &Path) -> Result<f64> {
    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .with_context(|| format!("failed to read modification time of {}", path.display()))?;
    let modified: DateTime<Utc> = modified.into();
    Ok(modified.timestamp_micros() as f64 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_diarization::DiarizationError;

    fn write_chunk(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    const CHUNK_0: &str = r#"{"durationSeconds": 10.0, "segments": [
        {"startTimeSeconds": 0.0, "endTimeSeconds": 9.0, "speakerId": "1",
         "qualityScore": 0.9, "embedding": [1.0, 0.0]}
    ]}"#;

    const CHUNK_1: &str = r#"{"durationSeconds": 10.0, "segments": [
        {"startTimeSeconds": 9.0, "endTimeSeconds": 10.0, "speakerId": "5",
         "qualityScore": 0.8, "embedding": [0.99, 0.1]},
        {"startTimeSeconds": 2.0, "endTimeSeconds": 3.0, "speakerId": "6",
         "qualityScore": 0.8, "embedding": [0.0, 1.0]}
    ]}"#;

    fn args(output: PathBuf, chunks: Vec<PathBuf>) -> MergeArgs {
        MergeArgs {
            output,
            chunks,
            chunk_size: Some(10.0),
            overlap: None,
            threshold: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            merge: MergeConfig {
                chunk_size: 60.0,
                overlap: 5.0,
                threshold: 0.7,
            },
        };
        let merge_config = args(PathBuf::from("out.json"), vec![]).merge_config(&config);

        assert_eq!(merge_config.chunk_size, 10.0);
        assert_eq!(merge_config.overlap, 5.0);
        assert_eq!(merge_config.threshold, 0.7);
    }

    #[tokio::test]
    async fn test_load_chunks_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_chunk(dir.path(), "b.json", CHUNK_1),
            write_chunk(dir.path(), "a.json", CHUNK_0),
        ];

        let chunks = load_chunks(&paths).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].segments[0].speaker_id, "5");
        assert_eq!(chunks[1].segments[0].speaker_id, "1");
    }

    #[tokio::test]
    async fn test_execute_writes_merged_output() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![
            write_chunk(dir.path(), "chunk_0.json", CHUNK_0),
            write_chunk(dir.path(), "chunk_1.json", CHUNK_1),
        ];
        let output = dir.path().join("merged.json");

        execute(args(output.clone(), chunks), &Config::default())
            .await
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let merged: MergedDiarisation = serde_json::from_str(&content).unwrap();

        assert_eq!(merged.audio_file, "merged");
        assert_eq!(merged.config.chunks, 2);
        assert_eq!(merged.speaker_count, 2);
        // Chunk 1 starts at 10s; "5" matches global "1", "6" becomes "2"
        let labels: Vec<(f64, &str)> = merged
            .segments
            .iter()
            .map(|s| (s.start_time, s.speaker_id.as_str()))
            .collect();
        assert_eq!(labels, vec![(0.0, "1"), (12.0, "2"), (19.0, "1")]);
        assert!((merged.duration_seconds - 20.0).abs() < 1e-9);
        assert!(merged.timestamp > 0.0);
    }

    #[tokio::test]
    async fn test_malformed_chunk_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![
            write_chunk(dir.path(), "chunk_0.json", CHUNK_0),
            write_chunk(dir.path(), "chunk_1.json", r#"{"durationSeconds": 10.0}"#),
        ];
        let output = dir.path().join("merged.json");

        let err = execute(args(output.clone(), chunks), &Config::default())
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("chunk 1"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_chunk_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_chunk(dir.path(), "chunk_0.json", CHUNK_0),
            dir.path().join("missing.json"),
        ];

        let err = load_chunks(&paths).await.unwrap_err();
        assert!(format!("{:#}", err).contains("chunk 1"));
        assert!(matches!(
            err.downcast_ref::<DiarizationError>(),
            Some(DiarizationError::FileNotFound(_))
        ));
    }
}
