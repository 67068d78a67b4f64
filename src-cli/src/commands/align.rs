//! `stitch align`: label an SRT transcript with diarised speakers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use stitch_core::Exporter;
use stitch_diarization::{align_transcript, read_speaker_segments};
use stitch_transcript::parse_srt;

pub struct AlignArgs {
    pub srt: PathBuf,
    pub diarisation: PathBuf,
    pub output: PathBuf,
}

pub async fn execute(args: AlignArgs) -> Result<()> {
    if !args.srt.exists() {
        bail!("SRT file not found: {}", args.srt.display());
    }
    if !args.diarisation.exists() {
        bail!("Diarisation JSON not found: {}", args.diarisation.display());
    }

    println!("Parsing SRT: {}", args.srt.display());
    let srt = tokio::fs::read_to_string(&args.srt)
        .await
        .with_context(|| format!("failed to read {}", args.srt.display()))?;
    let transcript = parse_srt(&srt);
    println!("  Found {} transcript segments", transcript.len());

    println!("Parsing diarisation JSON: {}", args.diarisation.display());
    let json = tokio::fs::read_to_string(&args.diarisation)
        .await
        .with_context(|| format!("failed to read {}", args.diarisation.display()))?;
    let speakers = read_speaker_segments(&json)
        .with_context(|| args.diarisation.display().to_string())?;
    println!("  Found {} speaker segments", speakers.len());

    println!("Aligning transcript with speakers...");
    let turns = align_transcript(&transcript, &speakers);

    Exporter::to_markdown(&turns, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Diarised transcript written to: {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nHello there.\n\n\
                       2\n00:00:02,000 --> 00:00:04,000\nHow are you?\n\n\
                       3\n00:00:04,000 --> 00:00:06,000\nFine, thanks.\n";

    const DIARISATION: &str = r#"{"segments": [
        {"startTimeSeconds": 0.0, "endTimeSeconds": 3.5, "speakerId": "1",
         "qualityScore": 0.9, "embedding": [1.0]},
        {"startTimeSeconds": 3.5, "endTimeSeconds": 6.0, "speakerId": "2",
         "qualityScore": 0.9, "embedding": [1.0]}
    ]}"#;

    #[tokio::test]
    async fn test_align_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("talk.srt");
        let diarisation = dir.path().join("merged.json");
        let output = dir.path().join("out").join("talk.md");
        std::fs::write(&srt, SRT).unwrap();
        std::fs::write(&diarisation, DIARISATION).unwrap();

        execute(AlignArgs {
            srt,
            diarisation,
            output: output.clone(),
        })
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "**Speaker 1:** Hello there. How are you?\n\n**Speaker 2:** Fine, thanks."
        );
    }

    #[tokio::test]
    async fn test_missing_inputs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("talk.srt");
        std::fs::write(&srt, SRT).unwrap();

        let err = execute(AlignArgs {
            srt: dir.path().join("missing.srt"),
            diarisation: dir.path().join("merged.json"),
            output: dir.path().join("talk.md"),
        })
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("SRT file not found"));

        let err = execute(AlignArgs {
            srt,
            diarisation: dir.path().join("merged.json"),
            output: dir.path().join("talk.md"),
        })
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Diarisation JSON not found"));
        assert!(!dir.path().join("talk.md").exists());
    }
}
