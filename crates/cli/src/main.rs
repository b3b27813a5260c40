// snapmerge - merge a new CSV snapshot into a previous one, keyed by a row ID

mod exit_codes;
mod merge;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_PRECONDITION, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};

#[derive(Parser)]
#[command(name = "snapmerge")]
#[command(about = "Merge a new CSV snapshot into a previous one, keyed by a row ID")]
#[command(version)]
#[command(after_help = "\
Examples:
  snapmerge brainstorms_old.csv brainstorms_new.csv
  snapmerge old.csv new.csv --key-column Idea_ID --link-template 'https://ideas.example.com/{key}'
  snapmerge old.csv new.csv --config snapmerge.toml --output merged.csv
  snapmerge old.csv new.csv --dry-run --json")]
struct Cli {
    /// Baseline snapshot (the previous export)
    baseline: PathBuf,

    /// Incoming snapshot (the new export)
    incoming: PathBuf,

    /// TOML config file (key column, link template, output naming)
    #[arg(long, env = "SNAPMERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Column holding the row ID [default: Brainstorm_ID]
    #[arg(long)]
    key_column: Option<String>,

    /// Column that receives the generated link [default: Brainstorm_URL]
    #[arg(long)]
    link_column: Option<String>,

    /// Link template; {key} is replaced with the row ID
    #[arg(long)]
    link_template: Option<String>,

    /// Output file name prefix; the local date is appended [default: results]
    #[arg(long)]
    output_prefix: Option<String>,

    /// Directory for the dated output file [default: .]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Exact output path (skips dated naming)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Merge and report, but don't write the output file
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON to stdout instead of the summary lines
    #[arg(long)]
    json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    /// Also log debug detail (columns of interest, each duplicate key)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn into_args(self) -> merge::MergeArgs {
        merge::MergeArgs {
            baseline: self.baseline,
            incoming: self.incoming,
            config: self.config,
            key_column: self.key_column,
            link_column: self.link_column,
            link_template: self.link_template,
            output_prefix: self.output_prefix,
            output_dir: self.output_dir,
            output: self.output,
            dry_run: self.dry_run,
            json: self.json,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PRECONDITION, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match merge::cmd_merge(cli.into_args()).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}
