//! Command-line parsing into [`ParseOutcome`].
//!
//! `--help`/`-h` wins over everything else on the line (`-h` prints the
//! summary, `--help` the full text), and a repeated
//! `--failure-threshold` keeps the last value. Threshold levels are matched
//! case-insensitively.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use dockerlint_core::{DEFAULT_TARGET, Options, ParseOutcome, Threshold};

const BIN_NAME: &str = "dockerlint";

#[derive(Parser, Debug)]
#[command(
    name = BIN_NAME,
    about = "Lint Dockerfiles with hadolint, locally or in a container",
    long_about = "Lint Dockerfiles with hadolint.\n\nUses a local `hadolint` when one is installed and falls back to running the hadolint image through a container runtime. Prints exactly one JSON report on stdout; progress and hadolint's own output go to stderr.",
    after_help = "Examples:\n  dockerlint\n  dockerlint -f Dockerfile.dev -t error\n  dockerlint -f api/Dockerfile -f web/Dockerfile --strict-files",
    disable_version_flag = true,
    args_override_self = true
)]
struct CliArgs {
    /// Dockerfile to lint; repeat for several.
    #[arg(
        short = 'f',
        long = "dockerfile",
        value_name = "PATH",
        action = ArgAction::Append,
        default_value = DEFAULT_TARGET
    )]
    dockerfile: Vec<String>,
    /// Lowest severity that fails a target: error|warning|info|style|ignore.
    #[arg(
        short = 't',
        long = "failure-threshold",
        value_name = "LEVEL",
        default_value = "warning",
        value_parser = parse_threshold
    )]
    failure_threshold: Threshold,
    /// Fail when any target is missing instead of skipping it.
    #[arg(long = "strict-files")]
    strict_files: bool,
}

impl CliArgs {
    fn into_options(self) -> Options {
        Options::new(self.dockerfile, self.failure_threshold, self.strict_files)
    }
}

fn parse_threshold(value: &str) -> Result<Threshold, String> {
    value.parse()
}

/// Parse arguments (without the program name).
pub fn parse_args<I, T>(tokens: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    if tokens.iter().any(|token| token == "--help") {
        return ParseOutcome::HelpRequested { usage: usage() };
    }
    if tokens.iter().any(|token| token == "-h") {
        return ParseOutcome::HelpRequested {
            usage: short_usage(),
        };
    }

    let argv = std::iter::once(BIN_NAME.to_string()).chain(tokens);
    match CliArgs::try_parse_from(argv) {
        Ok(args) => ParseOutcome::Parsed(args.into_options()),
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            ParseOutcome::HelpRequested { usage: usage() }
        }
        Err(err) => ParseOutcome::ParseError {
            message: error_message(&err),
        },
    }
}

/// Long help text.
pub fn usage() -> String {
    CliArgs::command().render_long_help().to_string()
}

fn short_usage() -> String {
    CliArgs::command().render_help().to_string()
}

fn error_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("invalid arguments");
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
