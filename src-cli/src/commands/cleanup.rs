//! `stitch cleanup`: strip filler words from a markdown transcript

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use stitch_transcript::{backup_path, cleanup_markdown};
use tracing::info;

pub struct CleanupArgs {
    pub input: PathBuf,
    pub in_place: bool,
    pub backup: bool,
}

pub async fn execute(args: CleanupArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("File not found: {}", args.input.display());
    }

    let original = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    if args.backup {
        let backup = backup_path(&args.input);
        // An existing backup is the real original; keep it
        if !backup.exists() {
            tokio::fs::write(&backup, &original)
                .await
                .with_context(|| format!("failed to write backup {}", backup.display()))?;
            info!("Backup written to {}", backup.display());
        }
    }

    let cleaned = cleanup_markdown(&original);

    if args.in_place {
        tokio::fs::write(&args.input, &cleaned)
            .await
            .with_context(|| format!("failed to write {}", args.input.display()))?;
        info!("Cleaned {}", args.input.display());
    } else {
        print!("{}", cleaned);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_in_place_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        let raw = "**Speaker 1:** um, so i think uh we should go\n";
        std::fs::write(&input, raw).unwrap();

        execute(CleanupArgs {
            input: input.clone(),
            in_place: true,
            backup: true,
        })
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "**Speaker 1:** So I think we should go\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("talk.raw.md")).unwrap(),
            raw
        );
    }

    #[tokio::test]
    async fn test_existing_backup_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        let backup = dir.path().join("talk.raw.md");
        std::fs::write(&input, "**Speaker 1:** uh hi\n").unwrap();
        std::fs::write(&backup, "first original\n").unwrap();

        execute(CleanupArgs {
            input,
            in_place: true,
            backup: true,
        })
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "first original\n");
    }

    #[tokio::test]
    async fn test_no_in_place_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        std::fs::write(&input, "**Speaker 1:** uh hi\n").unwrap();

        execute(CleanupArgs {
            input: input.clone(),
            in_place: false,
            backup: false,
        })
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&input).unwrap(), "**Speaker 1:** uh hi\n");
        assert!(!dir.path().join("talk.raw.md").exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(CleanupArgs {
            input: dir.path().join("missing.md"),
            in_place: true,
            backup: false,
        })
        .await;
        assert!(result.is_err());
    }
}
