use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use mixr_application::{CommandResult, MixCommandService, MixrApp};
use mixr_infrastructure::MixrPaths;

mod repl;

use repl::{COMMAND_WORDS, HELP, ReplCommand};

#[derive(Parser)]
#[command(name = "mixr-repl")]
#[command(about = "Interactive mixr session", long_about = None)]
struct Args {
    /// Session to start or resume right away
    session: Option<String>,

    /// Root directory for config, sessions, artifacts and exports
    #[arg(long, env = "MIXR_HOME")]
    home: Option<PathBuf>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_WORDS.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn is_command(&self, word: &str) -> bool {
        self.commands.iter().any(|c| c == word)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.is_empty() || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let word = line.split_whitespace().next().unwrap_or_default();
        if self.is_command(word) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.len() >= 2 && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints a command result: messages in blue, guidance in yellow, failures in red.
fn print_result(result: &CommandResult) {
    let guidance = result
        .data
        .as_ref()
        .and_then(|d| d.get("status"))
        .and_then(|s| s.as_str())
        == Some("guidance");

    for line in result.message.lines() {
        if !result.success {
            println!("{}", line.red());
        } else if guidance {
            println!("{}", line.yellow());
        } else {
            println!("{}", line.bright_blue());
        }
    }
    println!();
}

async fn report_tools(app: &MixrApp) {
    for status in app.engine.check_tools().await {
        if !status.available {
            println!(
                "{}",
                format!(
                    "Warning: '{}' not found. Mixing operations will fail until it is installed.",
                    status.name
                )
                .yellow()
            );
        }
    }
}

/// Executes one REPL line. Returns false when the REPL should exit.
async fn dispatch(service: &MixCommandService, session: &mut Option<String>, line: &str) -> bool {
    tracing::debug!("[Repl] Input: {}", line);
    let result = match ReplCommand::parse(line) {
        ReplCommand::Quit => return false,
        ReplCommand::Help => {
            println!("{}\n", HELP.bright_black());
            return true;
        }
        ReplCommand::Usage(usage) => {
            println!("{}\n", format!("Usage: {}", usage).yellow());
            return true;
        }
        ReplCommand::Session(name) => {
            let result = service.create_session(&name).await;
            if result.success {
                *session = Some(name);
            }
            result
        }
        ReplCommand::Sessions => service.sessions().await,
        ReplCommand::Source(path) => service.set_source(&path).await,
        ReplCommand::History => service.history().await,
        ReplCommand::Status => service.status().await,
        ReplCommand::Undo => service.undo().await,
        ReplCommand::Redo => service.redo().await,
        ReplCommand::Export(name) => service.export(&name).await,
        ReplCommand::Presets => service.presets().await,
        ReplCommand::Preset(id) => service.apply_preset(&id).await,
        ReplCommand::Explain(text) => service.explain(&text).await,
        ReplCommand::Mix(text) => service.mix(&text).await,
    };

    print_result(&result);
    true
}

/// The main entry point for the mixr readline REPL application.
///
/// Logs go to a daily-rolling file under the mixr logs directory so the
/// console only shows command output.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Logging =====
    let paths = MixrPaths::resolve(args.home.clone()).context("Cannot resolve mixr paths")?;
    paths.ensure_dirs().context("Cannot create mixr directories")?;
    let file_appender = tracing_appender::rolling::daily(paths.logs_dir(), "mixr-repl.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    // ===== Backend Initialization =====
    let app = MixrApp::bootstrap(args.home).context("Failed to initialize mixr")?;
    let service = &app.service;
    tracing::info!("[Repl] Started with data dir {}", app.paths.data_dir().display());

    println!("{}", "=== mixr REPL ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, or describe what you want to hear.".bright_black()
    );
    report_tools(&app).await;
    println!();

    let mut session: Option<String> = None;
    if let Some(name) = args.session {
        dispatch(service, &mut session, &format!("session {}", name)).await;
    }

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    // ===== Main REPL Loop =====
    loop {
        let prompt = match &session {
            Some(name) => format!("mixr[{}]> ", name),
            None => "mixr> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                if !dispatch(service, &mut session, trimmed).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
