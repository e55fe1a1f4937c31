//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::{Mode, OutputFormat};
use std::path::PathBuf;

/// Orchestration mode, forced from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Draft, improve with peers, synthesize
    Collaborative,
    /// Draft, triage, attack the leader, judge
    Adversarial,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Collaborative => Mode::Collaborative,
            ModeArg::Adversarial => Mode::Adversarial,
        }
    }
}

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Only the final artifact
    Artifact,
    /// Every round, the triage decision and the artifact
    Full,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Artifact => OutputFormat::Artifact,
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for agent-council
#[derive(Parser, Debug)]
#[command(name = "agent-council")]
#[command(author, version, about = "Agent Council - several providers draft, challenge and synthesize one answer")]
#[command(long_about = r#"
Agent Council sends one task to three role-playing participants backed by
independent providers, then combines their work into a single artifact.

Two modes are selected from the task text (or forced with --mode):
  collaborative  Visionary, Pragmatist and Skeptic draft in parallel, improve
                 after reading each other, and a synthesizer merges the result
  adversarial    Advocate, Contrarian and Analyst draft, the strongest draft is
                 attacked by the other two, and a judge rules on it

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>                        Explicit config file
3. ./council.toml                         Project-level config
4. ~/.config/agent-council/config.toml   Global config

Example:
  agent-council "Brainstorm names for a Rust logging crate"
  agent-council "Which is better for internal APIs: REST or gRPC?"
  agent-council --mode adversarial -o full "Stress-test this migration plan"
"#)]
pub struct Cli {
    /// The task to put before the council
    pub task: Option<String>,

    /// Force an orchestration mode instead of selecting one from the task
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Keep the full transcript (every round, triage, critiques, failures)
    #[arg(long)]
    pub verbose_run: bool,

    /// Output format (defaults to the config file, then "artifact")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Per-call provider timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Output format after applying the config file's choice
    pub fn output_format(&self, configured: Option<OutputFormat>) -> OutputFormat {
        self.output
            .map(OutputFormat::from)
            .or(configured)
            .unwrap_or_default()
    }

    /// Whether the run must keep its transcript
    pub fn wants_transcript(&self, format: OutputFormat) -> bool {
        self.verbose_run || format.needs_transcript()
    }
}
