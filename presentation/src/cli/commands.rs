//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for game results and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn, vote and tally
    Full,
    /// Outcome and revealed words only
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for roundtable_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => roundtable_domain::OutputFormat::Full,
            OutputFormat::Summary => roundtable_domain::OutputFormat::Summary,
            OutputFormat::Json => roundtable_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Multi-agent odd-one-out game and research/decision pipeline")]
#[command(long_about = r#"
Roundtable seats several hosted LLMs at one table.

  game      Every player gets a secret word; one or two get a different one.
            Players describe their word in turn, then vote on who holds the
            odd word. The table wins when the vote names every odd player.
  analyze   A researcher gathers evidence with web and market tools, then an
            analyst decides with the full research in context.
  history   Inspect stored game sessions.

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables (e.g. ROUNDTABLE_GAME__MAX_ROUNDS=5)
2. --config <path>                          Explicit config file
3. ./roundtable.toml                        Project-level config
4. ~/.config/roundtable/config.toml         Global config

Example:
  roundtable game --words Apple,Pear,Apple
  roundtable game --words Cat,Dog,Cat,Cat --player "North=gpt-4o" --player "East=deepseek-chat" --player "West=o3-mini"
  roundtable analyze "Is now a good time to sell bitcoin?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (default: from config, else summary)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a machine-readable JSONL transcript of every event
    #[arg(long, value_name = "PATH", global = true)]
    pub transcript: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one odd-one-out game
    Game(GameArgs),

    /// Run the researcher → analyst pipeline on a subject
    Analyze(AnalyzeArgs),

    /// List stored sessions, or print one session's transcript
    History(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct GameArgs {
    /// Candidate words; the most frequent is the majority word
    #[arg(short, long, value_delimiter = ',', required = true, value_name = "WORD")]
    pub words: Vec<String>,

    /// Seat a player as NAME=MODEL (repeatable, replaces the configured table)
    #[arg(short, long, value_name = "NAME=MODEL", value_parser = parse_player)]
    pub player: Vec<(String, String)>,

    /// Success criterion for the referee
    #[arg(long, value_name = "TEXT")]
    pub criterion: Option<String>,

    /// Referee model (empty string disables the referee)
    #[arg(long, value_name = "MODEL")]
    pub judge: Option<String>,

    /// Round limit
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Seed for seat assignment
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Continue a stored session, appending to its log
    #[arg(long, value_name = "SESSION_ID")]
    pub session: Option<String>,

    /// Do not store the session log
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// What to research and decide on
    #[arg(required = true, num_args = 1.., value_name = "SUBJECT")]
    pub subject: Vec<String>,

    /// Researcher model
    #[arg(long, value_name = "MODEL")]
    pub researcher: Option<String>,

    /// Analyst model
    #[arg(long, value_name = "MODEL")]
    pub analyst: Option<String>,
}

impl AnalyzeArgs {
    pub fn subject(&self) -> String {
        self.subject.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Session to print; lists all sessions when omitted
    pub session_id: Option<String>,
}

fn parse_player(s: &str) -> Result<(String, String), String> {
    let (name, model) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MODEL, got '{}'", s))?;
    let (name, model) = (name.trim(), model.trim());
    if name.is_empty() || model.is_empty() {
        return Err(format!("expected NAME=MODEL, got '{}'", s));
    }
    Ok((name.to_string(), model.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_command() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "game",
            "--words",
            "Apple,Pear,Apple",
            "--player",
            "North=gpt-4o",
            "-o",
            "full",
            "--seed",
            "7",
            "--session",
            "s-1",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Full));
        match cli.command {
            Some(Command::Game(args)) => {
                assert_eq!(args.words, vec!["Apple", "Pear", "Apple"]);
                assert_eq!(args.player, vec![("North".to_string(), "gpt-4o".to_string())]);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.session.as_deref(), Some("s-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_joins_subject() {
        let cli = Cli::try_parse_from(["roundtable", "-v", "analyze", "sell", "bitcoin?"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Command::Analyze(args)) => assert_eq!(args.subject(), "sell bitcoin?"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_player_spec() {
        assert!(parse_player("North").is_err());
        assert!(parse_player("=gpt-4o").is_err());
        assert_eq!(
            parse_player(" South = o3-mini ").unwrap(),
            ("South".to_string(), "o3-mini".to_string())
        );
    }

    #[test]
    fn test_show_config_needs_no_command() {
        let cli = Cli::try_parse_from(["roundtable", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
