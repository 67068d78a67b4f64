//! Speaker segments as consumed by transcript alignment

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DiarizationError;

/// Who spoke when, without embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Speaker ID (e.g., "1", "2")
    pub speaker_id: String,
}

impl SpeakerSegment {
    /// Get the duration of this segment
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

#[derive(Deserialize)]
struct RawSpeakerSegment {
    #[serde(alias = "startTimeSeconds")]
    start: f64,
    #[serde(alias = "endTimeSeconds")]
    end: f64,
    #[serde(alias = "speakerId")]
    speaker: Value,
}

/// Read speaker segments from diarisation JSON
///
/// Accepts a bare array of segments, an object holding a `segments` (or
/// `results`) array, or a single segment object. Both the diarisation tool's
/// keys (`startTimeSeconds`, `endTimeSeconds`, `speakerId`) and short keys
/// (`start`, `end`, `speaker`) are understood. The result is sorted by start.
pub fn read_speaker_segments(json: &str) -> Result<Vec<SpeakerSegment>, DiarizationError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| DiarizationError::InvalidDiarisation(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("segments").or_else(|| map.remove("results")) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(DiarizationError::InvalidDiarisation(format!(
                    "expected a segment array, found {}",
                    json_kind(&other)
                )))
            }
            None => vec![Value::Object(map)],
        },
        other => {
            return Err(DiarizationError::InvalidDiarisation(format!(
                "expected an array or object, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut segments = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let raw: RawSpeakerSegment = serde_json::from_value(item).map_err(|e| {
                DiarizationError::InvalidDiarisation(format!("segment {}: {}", i, e))
            })?;
            let speaker_id = match raw.speaker {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(DiarizationError::InvalidDiarisation(format!(
                        "segment {}: speaker must be a string or number, found {}",
                        i,
                        json_kind(&other)
                    )))
                }
            };
            Ok(SpeakerSegment {
                start: raw.start,
                end: raw.end,
                speaker_id,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(segments)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
