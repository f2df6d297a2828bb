use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mixr")]
#[command(about = "mixr - natural-language mixing with versioned, undoable sessions", long_about = None)]
#[command(version)]
struct Cli {
    /// Session to create or resume
    #[arg(short, long, global = true, env = "MIXR_SESSION", default_value = "default")]
    session: String,

    /// Root directory for config, sessions, artifacts and exports
    #[arg(long, global = true, env = "MIXR_HOME")]
    home: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored sessions
    Sessions,
    /// Set the source file of the session (resets to version 0)
    Source { path: PathBuf },
    /// Apply a mixing instruction, e.g. "make it brighter and add reverb"
    Mix {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        instruction: Vec<String>,
    },
    /// Step back one version
    Undo,
    /// Step forward one version
    Redo,
    /// Encode the current version (MP3 by default)
    Export {
        /// Bare file name placed in the exports directory
        name: Option<String>,
    },
    /// Show the session's action history
    History,
    /// Show the session's current state
    Status,
    /// Show what an instruction would do without applying it
    Explain {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        instruction: Vec<String>,
    },
    /// List presets, or apply one by id or name
    Preset { name: Option<String> },
    /// Check that ffmpeg and ffprobe are available
    Doctor,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(cli).await
}
