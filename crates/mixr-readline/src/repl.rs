//! REPL command parsing.

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Session(String),
    Sessions,
    Source(String),
    History,
    Status,
    Undo,
    Redo,
    Export(String),
    Presets,
    Preset(String),
    Explain(String),
    Help,
    Quit,
    /// Anything else is a mixing instruction
    Mix(String),
    /// A known command missing its argument
    Usage(&'static str),
}

/// Command words offered for completion.
pub const COMMAND_WORDS: &[&str] = &[
    "session", "sessions", "source", "history", "status", "undo", "redo", "export", "presets",
    "preset", "explain", "help", "quit", "exit",
];

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_lowercase().as_str(), rest) {
            ("session", "") => Self::Usage("session <name>"),
            ("session", name) => Self::Session(name.to_string()),
            ("sessions", "") => Self::Sessions,
            ("source", "") => Self::Usage("source <path>"),
            ("source", path) => Self::Source(unquote(path).to_string()),
            ("history", "") => Self::History,
            ("status", "") => Self::Status,
            ("undo", "") => Self::Undo,
            ("redo", "") => Self::Redo,
            ("export", name) => Self::Export(unquote(name).to_string()),
            ("presets", "") => Self::Presets,
            ("preset", "") => Self::Presets,
            ("preset", id) => Self::Preset(id.to_string()),
            ("explain", "") => Self::Usage("explain <instruction>"),
            ("explain", text) => Self::Explain(text.to_string()),
            ("help", "") | ("?", "") => Self::Help,
            ("quit", "") | ("exit", "") => Self::Quit,
            ("sessions", _) => Self::Usage("sessions (takes no arguments)"),
            ("history", _) => Self::Usage("history (takes no arguments)"),
            ("status", _) => Self::Usage("status (takes no arguments)"),
            ("undo", _) => Self::Usage("undo (takes no arguments, steps back one version)"),
            ("redo", _) => Self::Usage("redo (takes no arguments, steps forward one version)"),
            ("presets", _) => Self::Usage("presets (takes no arguments)"),
            _ => Self::Mix(line.to_string()),
        }
    }
}

/// Strips one pair of surrounding quotes (drag-and-drop paths often carry them).
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

pub const HELP: &str = "\
Commands:
  session <name>       Start or resume a session
  sessions             List stored sessions
  source <path>        Set the source file (resets to v000)
  history              Show the action history
  status               Show the current version and source
  undo / redo          Step back / forward one version
  export [name]        Encode the current version (MP3 by default)
  presets              List presets
  preset <id>          Apply a preset
  explain <text>       Show what an instruction would do
  help                 Show this help
  quit                 Exit

Anything else is a mixing instruction, e.g.:
  make it brighter and add some reverb
  turn it down 3db
  master for streaming";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse() {
        assert_eq!(
            ReplCommand::parse("session demo"),
            ReplCommand::Session("demo".to_string())
        );
        assert_eq!(
            ReplCommand::parse("source \"/music/my song.wav\""),
            ReplCommand::Source("/music/my song.wav".to_string())
        );
        assert_eq!(ReplCommand::parse("  UNDO "), ReplCommand::Undo);
        assert_eq!(ReplCommand::parse("export"), ReplCommand::Export(String::new()));
        assert_eq!(
            ReplCommand::parse("preset radio_ready"),
            ReplCommand::Preset("radio_ready".to_string())
        );
        assert_eq!(ReplCommand::parse("exit"), ReplCommand::Quit);
    }

    #[test]
    fn test_missing_argument_is_usage() {
        assert_eq!(
            ReplCommand::parse("source"),
            ReplCommand::Usage("source <path>")
        );
    }

    #[test]
    fn test_argument_free_command_with_text_is_usage() {
        assert!(matches!(
            ReplCommand::parse("undo the reverb please"),
            ReplCommand::Usage(usage) if usage.starts_with("undo")
        ));
        for line in ["redo twice", "history all", "status now", "sessions list"] {
            assert!(
                matches!(ReplCommand::parse(line), ReplCommand::Usage(_)),
                "{line}"
            );
        }
    }

    #[test]
    fn test_everything_else_is_an_instruction() {
        assert_eq!(
            ReplCommand::parse("make it brighter"),
            ReplCommand::Mix("make it brighter".to_string())
        );
    }
}
