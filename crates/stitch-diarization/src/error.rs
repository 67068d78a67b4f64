//! Diarization error types

use thiserror::Error;

/// Diarization-related errors
#[derive(Error, Debug)]
pub enum DiarizationError {
    /// Chunk or segment data is missing fields or holds impossible values
    #[error("Malformed input in chunk {chunk}: {reason}")]
    MalformedInput { chunk: usize, reason: String },

    /// Embeddings of different lengths were combined or compared
    #[error(
        "Embedding dimension mismatch in chunk {chunk} for speaker {speaker}: expected {expected}, got {actual}"
    )]
    DimensionMismatch {
        chunk: usize,
        speaker: String,
        expected: usize,
        actual: usize,
    },

    /// An embedding with zero norm reached the similarity computation
    #[error("Zero-norm embedding in chunk {chunk} when comparing speaker {speaker} with global speaker {global}")]
    ZeroNormEmbedding {
        chunk: usize,
        speaker: String,
        global: String,
    },

    /// A segment refers to a speaker the chunk mapping does not know
    #[error("No global speaker resolved for local speaker {speaker} in chunk {chunk}")]
    UnmappedSpeaker { chunk: usize, speaker: String },

    /// The largest global ID is already `u64::MAX`
    #[error("No global speaker ID left to assign in chunk {chunk}")]
    SpeakerIdsExhausted { chunk: usize },

    /// Offsets do not line up with chunks
    #[error("Got {offsets} chunk offsets for {chunks} chunks")]
    OffsetCountMismatch { chunks: usize, offsets: usize },

    /// Invalid merge configuration
    #[error("Invalid merge configuration: {0}")]
    InvalidConfig(String),

    /// Diarisation output could not be read
    #[error("Invalid diarisation output: {0}")]
    InvalidDiarisation(String),

    /// File not found
    #[error("Diarisation file not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
