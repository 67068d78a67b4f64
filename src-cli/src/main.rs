//! stitch command-line application
//!
//! Merges per-chunk diarisation output into one speaker timeline, aligns it
//! with an SRT transcript and cleans filler words out of the result.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "stitch",
    about = "Stitch chunked speaker diarisation into one timeline and a clean transcript",
    version
)]
struct Cli {
    /// Config file (defaults to config.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge diarisation results of consecutive chunks
    Merge {
        /// Output JSON file
        output: PathBuf,

        /// Input chunk JSON files in temporal order
        #[arg(long, required = true, num_args = 1..)]
        chunks: Vec<PathBuf>,

        /// Chunk size in seconds (default: 3600)
        #[arg(long)]
        chunk_size: Option<f64>,

        /// Overlap between chunks in seconds (default: 30)
        #[arg(long)]
        overlap: Option<f64>,

        /// Minimum cosine similarity to reuse a speaker (default: 0.85)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Label an SRT transcript with speakers from diarisation output
    Align {
        /// SRT transcript
        srt: PathBuf,

        /// Diarisation JSON (e.g. output of `stitch merge`)
        diarisation: PathBuf,

        /// Markdown file to write
        output: PathBuf,
    },

    /// Remove filler words from a speaker-labelled markdown transcript
    Cleanup {
        /// Markdown transcript
        input: PathBuf,

        /// Print the cleaned transcript instead of rewriting the file
        #[arg(long)]
        no_in_place: bool,

        /// Keep the original as a .raw.md backup (never overwritten)
        #[arg(long)]
        backup: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `cleanup --no-in-place` output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stitch=info,stitch_diarization=info,stitch_transcript=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Merge {
            output,
            chunks,
            chunk_size,
            overlap,
            threshold,
        } => {
            commands::merge::execute(
                commands::merge::MergeArgs {
                    output,
                    chunks,
                    chunk_size,
                    overlap,
                    threshold,
                },
                &config,
            )
            .await
        }
        Command::Align {
            srt,
            diarisation,
            output,
        } => {
            commands::align::execute(commands::align::AlignArgs {
                srt,
                diarisation,
                output,
            })
            .await
        }
        Command::Cleanup {
            input,
            no_in_place,
            backup,
        } => {
            commands::cleanup::execute(commands::cleanup::CleanupArgs {
                input,
                in_place: !no_in_place,
                backup,
            })
            .await
        }
    }
}
