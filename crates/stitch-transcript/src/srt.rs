//! SRT subtitle parsing

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use stitch_core::TranscriptSegment;
use tracing::warn;

use crate::error::TranscriptError;

static ENTRY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("entry separator pattern is valid"));

// 00:00:00,000 --> 00:00:05,000 (a dot before the millis is accepted too)
static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{2}):([0-9]{2}):([0-9]{2})[,.]([0-9]{3})\s*-->\s*([0-9]{2}):([0-9]{2}):([0-9]{2})[,.]([0-9]{3})",
    )
    .expect("timestamp pattern is valid")
});

/// Parse SRT content into transcript segments
///
/// Entries with fewer than three lines or an unreadable timestamp line are
/// skipped. Multi-line subtitle text is joined with single spaces.
pub fn parse_srt(content: &str) -> Vec<TranscriptSegment> {
    let (segments, skipped) = parse_entries(content);
    if skipped > 0 {
        warn!("Skipped {} SRT entries without a usable timestamp", skipped);
    }
    segments
}

/// Segments plus the number of non-blank entries that were skipped
fn parse_entries(content: &str) -> (Vec<TranscriptSegment>, usize) {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for entry in ENTRY_SEPARATOR.split(content.trim()) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let lines: Vec<&str> = entry.split('\n').collect();
        if lines.len() < 3 {
            skipped += 1;
            continue;
        }

        let Some(caps) = TIMESTAMP_LINE.captures(lines[1]) else {
            skipped += 1;
            continue;
        };

        segments.push(TranscriptSegment {
            start: timestamp_seconds(&caps, 1),
            end: timestamp_seconds(&caps, 5),
            text: lines[2..].join(" "),
        });
    }

    (segments, skipped)
}

/// Read and parse an SRT file
pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TranscriptError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    Ok(parse_srt(&content))
}

fn timestamp_seconds(caps: &Captures<'_>, first_group: usize) -> f64 {
    let field = |offset: usize| -> f64 {
        caps.get(first_group + offset)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0) as f64
    };

    field(0) * 3600.0 + field(1) * 60.0 + field(2) + field(3) / 1000.0
}
