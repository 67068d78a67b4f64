//! Loading per-chunk diarisation output

use std::fs;
use std::path::Path;

use stitch_core::ChunkRecord;
use tracing::debug;

use crate::error::DiarizationError;

/// Parse one chunk's diarisation JSON
///
/// Missing required keys are reported as malformed input for `chunk_index`
/// rather than defaulted.
pub fn parse_chunk(chunk_index: usize, json: &str) -> Result<ChunkRecord, DiarizationError> {
    serde_json::from_str(json).map_err(|e| DiarizationError::MalformedInput {
        chunk: chunk_index,
        reason: e.to_string(),
    })
}

/// Read and parse one chunk file
pub fn load_chunk<P: AsRef<Path>>(
    chunk_index: usize,
    path: P,
) -> Result<ChunkRecord, DiarizationError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DiarizationError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let record = parse_chunk(chunk_index, &content)?;
    debug!(
        "Loaded chunk {} from {}: {} segments",
        chunk_index,
        path.display(),
        record.segments.len()
    );
    Ok(record)
}
