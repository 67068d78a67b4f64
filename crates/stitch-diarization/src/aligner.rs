//! Align speaker diarisation results with a transcript

use stitch_core::{SpeakerTurn, TranscriptSegment};
use tracing::debug;

use crate::speakers::SpeakerSegment;

/// Label used when no speaker segment exists at all
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Assign a speaker to every transcript segment and group consecutive
/// segments of the same speaker into turns
///
/// The speaker of a transcript segment is the one active at its midpoint.
pub fn align_transcript(
    transcript: &[TranscriptSegment],
    diarization: &[SpeakerSegment],
) -> Vec<SpeakerTurn> {
    let mut turns: Vec<SpeakerTurn> = Vec::new();

    for segment in transcript {
        let speaker = find_speaker_at_time(segment.midpoint(), diarization)
            .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());

        match turns.last_mut() {
            Some(last) if last.speaker == speaker => {
                last.text.push(' ');
                last.text.push_str(&segment.text);
            }
            _ => turns.push(SpeakerTurn {
                speaker,
                text: segment.text.clone(),
            }),
        }
    }

    debug!(
        "Aligned {} transcript segments into {} speaker turns",
        transcript.len(),
        turns.len()
    );
    turns
}

/// Find the speaker at a given time
pub fn find_speaker_at_time(time: f64, diarization: &[SpeakerSegment]) -> Option<String> {
    // Find segment that contains this time
    if let Some(segment) = diarization.iter().find(|s| s.contains(time)) {
        return Some(segment.speaker_id.clone());
    }

    // If no exact match, find closest segment
    diarization
        .iter()
        .min_by(|a, b| {
            let dist_a = (a.midpoint() - time).abs();
            let dist_b = (b.midpoint() - time).abs();
            dist_a.total_cmp(&dist_b)
        })
        .map(|s| s.speaker_id.clone())
}
