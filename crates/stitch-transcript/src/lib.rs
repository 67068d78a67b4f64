//! Transcript handling for stitch
//!
//! Parses SRT subtitles into timed transcript segments and cleans filler
//! words out of speaker-labelled markdown transcripts.

pub mod cleanup;
pub mod error;
pub mod srt;

pub use cleanup::{backup_path, cleanup_markdown, cleanup_utterance};
pub use error::TranscriptError;
pub use srt::{parse_srt, parse_srt_file};

// Re-export types from stitch-core
pub use stitch_core::TranscriptSegment;
