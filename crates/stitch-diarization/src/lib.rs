//! Cross-chunk speaker diarisation merging
//!
//! Diarisation is run independently over overlapping time chunks of a long
//! recording. This crate reconciles the chunk-local speaker IDs into one
//! global speaker timeline and aligns that timeline with a transcript.

pub mod aligner;
pub mod centroid;
pub mod chunk;
pub mod config;
pub mod error;
pub mod merger;
pub mod registry;
pub mod similarity;
pub mod speakers;

pub use aligner::{align_transcript, find_speaker_at_time, UNKNOWN_SPEAKER};
pub use centroid::SpeakerCentroids;
pub use chunk::{load_chunk, parse_chunk};
pub use config::MergeConfig;
pub use error::DiarizationError;
pub use merger::{ChunkMerger, MergeState, MergedTimeline};
pub use registry::{GlobalSpeaker, SpeakerMapping, SpeakerRegistry};
pub use similarity::{cosine_similarity, SimilarityError};
pub use speakers::{read_speaker_segments, SpeakerSegment};

// Re-export types from stitch-core
pub use stitch_core::{ChunkRecord, DiarisationSegment, MergedDiarisation, SpeakerTurn, TranscriptSegment};
