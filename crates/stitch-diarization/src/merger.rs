//! Merge per-chunk diarisation results into one global speaker timeline

use std::cmp::Ordering;

use stitch_core::{
    ChunkRecord, DiarisationSegment, MergeMetadata, MergedDiarisation, MERGED_AUDIO_FILE,
};
use tracing::{debug, info};

use crate::centroid::SpeakerCentroids;
use crate::config::MergeConfig;
use crate::error::DiarizationError;
use crate::registry::SpeakerRegistry;

/// Everything carried from one chunk to the next during a merge run
#[derive(Debug, Clone, Default)]
pub struct MergeState {
    registry: SpeakerRegistry,
    segments: Vec<DiarisationSegment>,
    total_duration: f64,
    previous_offset: Option<f64>,
    chunks_seen: usize,
    dropped: usize,
}

impl MergeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SpeakerRegistry {
        &self.registry
    }

    /// Surviving segments so far, in processing order
    pub fn segments(&self) -> &[DiarisationSegment] {
        &self.segments
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn chunks_seen(&self) -> usize {
        self.chunks_seen
    }

    /// Segments discarded as overlap duplicates so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Final result of a merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTimeline {
    /// Segments on the recording timeline, sorted by start time
    pub segments: Vec<DiarisationSegment>,
    pub total_duration: f64,
    pub speaker_count: usize,
    pub chunk_count: usize,
}

impl MergedTimeline {
    /// Build the output record
    pub fn into_record(self, timestamp: f64) -> MergedDiarisation {
        MergedDiarisation {
            audio_file: MERGED_AUDIO_FILE.to_string(),
            config: MergeMetadata {
                merged: true,
                chunks: self.chunk_count,
            },
            duration_seconds: self.total_duration,
            segments: self.segments,
            speaker_count: self.speaker_count,
            timestamp,
        }
    }
}

/// Chunk merge orchestrator
pub struct ChunkMerger {
    config: MergeConfig,
}

impl ChunkMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Offsets of `count` back-to-back chunks: `i * chunk_size`
    pub fn uniform_offsets(&self, count: usize) -> Vec<f64> {
        (0..count).map(|i| i as f64 * self.config.chunk_size).collect()
    }

    /// Merge chunks laid out at `uniform_offsets`
    pub fn merge_uniform(&self, chunks: &[ChunkRecord]) -> Result<MergedTimeline, DiarizationError> {
        let offsets = self.uniform_offsets(chunks.len());
        self.merge(chunks, &offsets)
    }

    /// Merge chunks given in temporal order with their timeline offsets
    pub fn merge(
        &self,
        chunks: &[ChunkRecord],
        offsets: &[f64],
    ) -> Result<MergedTimeline, DiarizationError> {
        self.config.validate()?;

        if chunks.len() != offsets.len() {
            return Err(DiarizationError::OffsetCountMismatch {
                chunks: chunks.len(),
                offsets: offsets.len(),
            });
        }

        let mut state = MergeState::new();
        for (chunk, &offset) in chunks.iter().zip(offsets) {
            state = self.process_chunk(state, chunk, offset)?;
        }

        let timeline = self.finish(state);
        info!(
            "Merged {} chunks: {} segments, {} speakers, {:.1}s",
            timeline.chunk_count,
            timeline.segments.len(),
            timeline.speaker_count,
            timeline.total_duration
        );
        Ok(timeline)
    }

    /// Fold one chunk into the running state
    ///
    /// The chunk's index is the number of chunks seen so far. Segments whose
    /// adjusted start falls before the previous chunk's `offset + chunk_size`
    /// are treated as already emitted by that chunk and dropped; only the start
    /// time is inspected.
    pub fn process_chunk(
        &self,
        mut state: MergeState,
        chunk: &ChunkRecord,
        offset: f64,
    ) -> Result<MergeState, DiarizationError> {
        let index = state.chunks_seen;
        let registry_dimension = state.registry.speakers().first().map(|s| s.centroid.len());
        validate_chunk(index, chunk, offset, registry_dimension)?;

        let previous_offset = state.previous_offset.replace(offset);
        state.chunks_seen += 1;

        if chunk.is_empty() {
            debug!("Chunk {} has no segments, skipping", index);
            return Ok(state);
        }

        let centroids = SpeakerCentroids::from_segments(index, &chunk.segments)?;
        // Only chunk 0 keeps its local IDs; after an empty chunk 0 IDs are minted from 1
        let mapping = if index == 0 {
            state.registry.seed(&centroids)
        } else {
            state
                .registry
                .map_chunk(index, &centroids, self.config.threshold)?
        };

        let cutoff = previous_offset.map(|prev| prev + self.config.chunk_size);
        let mut kept = 0usize;
        let mut dropped = 0usize;

        for segment in &chunk.segments {
            let mut adjusted = segment.shifted(offset);

            if cutoff.is_some_and(|cutoff| adjusted.start_time < cutoff) {
                dropped += 1;
                continue;
            }

            adjusted.speaker_id = mapping
                .get(&segment.speaker_id)
                .ok_or_else(|| DiarizationError::UnmappedSpeaker {
                    chunk: index,
                    speaker: segment.speaker_id.clone(),
                })?
                .to_string();
            state.segments.push(adjusted);
            kept += 1;
        }

        state.dropped += dropped;
        state.total_duration = state.total_duration.max(chunk.duration_seconds + offset);

        debug!(
            "Chunk {} at {:.1}s: {} speakers, {} segments kept, {} dropped as overlap",
            index,
            offset,
            centroids.len(),
            kept,
            dropped
        );

        Ok(state)
    }

    /// Sort the accumulated segments and summarise the run
    pub fn finish(&self, state: MergeState) -> MergedTimeline {
        let mut segments = state.segments;
        // Stable: equal starts keep processing order
        segments.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(Ordering::Equal)
        });

        MergedTimeline {
            segments,
            total_duration: state.total_duration,
            speaker_count: state.registry.len(),
            chunk_count: state.chunks_seen,
        }
    }
}

impl Default for ChunkMerger {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

/// Reject impossible values before any state changes
///
/// Every embedding in the chunk must share one dimension, and that must be
/// `registry_dimension` once the registry holds speakers.
fn validate_chunk(
    index: usize,
    chunk: &ChunkRecord,
    offset: f64,
    registry_dimension: Option<usize>,
) -> Result<(), DiarizationError> {
    let malformed = |reason: String| DiarizationError::MalformedInput {
        chunk: index,
        reason,
    };
    let mut dimension = registry_dimension;

    if !offset.is_finite() {
        return Err(malformed(format!("offset {} is not a finite number", offset)));
    }
    if !chunk.duration_seconds.is_finite() {
        return Err(malformed(format!(
            "durationSeconds {} is not a finite number",
            chunk.duration_seconds
        )));
    }

    for (i, segment) in chunk.segments.iter().enumerate() {
        if segment.speaker_id.is_empty() {
            return Err(malformed(format!("segment {} has an empty speakerId", i)));
        }
        if !segment.start_time.is_finite() || !segment.end_time.is_finite() {
            return Err(malformed(format!(
                "segment {} (speaker {}) has non-finite times",
                i, segment.speaker_id
            )));
        }
        if segment.end_time < segment.start_time {
            return Err(malformed(format!(
                "segment {} (speaker {}) ends at {} before it starts at {}",
                i, segment.speaker_id, segment.end_time, segment.start_time
            )));
        }
        if segment.embedding.is_empty() {
            return Err(malformed(format!(
                "segment {} (speaker {}) has an empty embedding",
                i, segment.speaker_id
            )));
        }
        if segment.embedding.iter().any(|v| !v.is_finite()) {
            return Err(malformed(format!(
                "segment {} (speaker {}) has non-finite embedding values",
                i, segment.speaker_id
            )));
        }

        let actual = segment.embedding.len();
        match dimension {
            Some(expected) if expected != actual => {
                return Err(DiarizationError::DimensionMismatch {
                    chunk: index,
                    speaker: segment.speaker_id.clone(),
                    expected,
                    actual,
                });
            }
            Some(_) => {}
            None => dimension = Some(actual),
        }
    }

    Ok(())
}
