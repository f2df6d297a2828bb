//! One-shot command dispatch.

mod output;

use crate::{Cli, Commands};
use anyhow::{Context, Result};
use mixr_application::{CommandResult, MixrApp};
use std::process::ExitCode;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let app = MixrApp::bootstrap(cli.home.clone()).context("Failed to initialize mixr")?;
    let service = &app.service;
    tracing::debug!(session = %cli.session, "[Cli] Dispatching command");

    if needs_session(&cli.command) {
        let opened = service.create_session(&cli.session).await;
        if !opened.success {
            return output::emit(&opened, cli.json);
        }
    }

    let result: CommandResult = match &cli.command {
        Commands::Doctor => return output::doctor(&app, cli.json).await,
        Commands::Sessions => service.sessions().await,
        Commands::Source { path } => service.set_source(&path.to_string_lossy()).await,
        Commands::Mix { instruction } => service.mix(&instruction.join(" ")).await,
        Commands::Undo => service.undo().await,
        Commands::Redo => service.redo().await,
        Commands::Export { name } => service.export(name.as_deref().unwrap_or_default()).await,
        Commands::History => service.history().await,
        Commands::Status => service.status().await,
        Commands::Explain { instruction } => service.explain(&instruction.join(" ")).await,
        Commands::Preset { name: None } => service.presets().await,
        Commands::Preset { name: Some(name) } => service.apply_preset(name).await,
    };

    output::emit(&result, cli.json)
}

fn needs_session(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Sessions
            | Commands::Explain { .. }
            | Commands::Preset { name: None }
            | Commands::Doctor
    )
}
