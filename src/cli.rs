use crate::core::BuildTarget;
use crate::error::UsageError;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;

const AFTER_HELP: &str = "\
Targets:
  left    Build the left half (shield corne_left)
  right   Build the right half (shield corne_right)
  reset   Build the settings reset image (shield settings_reset)

With no target, asks for confirmation and then builds left and right in turn.

Firmware is written to build/corne_left.uf2, build/corne_right.uf2 and
build/settings_reset.uf2. A ZMK config is picked up from
/workspaces/zmk/zmk-config/config or ./zmk-config/config when present.

Exit status is 0 on success, 1 on a usage error, failed build or cancellation.";

#[derive(Parser, Debug)]
#[command(name = "corne-build")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build ZMK firmware for the Corne split keyboard", long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Build tool to invoke
    #[arg(long, env = "CORNE_BUILD_TOOL", default_value = crate::execution::DEFAULT_BUILD_TOOL)]
    pub tool: String,

    /// Target to build (left, right or reset)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Single(BuildTarget),
    Interactive,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Run {
        mode: RunMode,
        verbose: bool,
        tool: String,
    },
}

#[derive(Debug)]
pub enum CliError {
    Usage(UsageError),
    Clap(clap::Error),
}

/// Parses the full argument vector, program name included.
///
/// `-h`/`--help` wins over everything else on the line, including arguments
/// that would otherwise be rejected. Arguments that are not valid UTF-8 are
/// reported as clap errors.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.iter().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        return Ok(Invocation::Help);
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        // Bundled short flags such as `-vh` only surface here.
        Err(e) if e.kind() == ErrorKind::DisplayHelp => return Ok(Invocation::Help),
        Err(e) => return Err(CliError::Clap(e)),
    };
    let mode = select_mode(&cli.targets).map_err(CliError::Usage)?;
    Ok(Invocation::Run {
        mode,
        verbose: cli.verbose,
        tool: cli.tool,
    })
}

fn select_mode(targets: &[String]) -> Result<RunMode, UsageError> {
    match targets {
        [] => Ok(RunMode::Interactive),
        [name] => BuildTarget::from_str(name, false)
            .map(RunMode::Single)
            .map_err(|_| UsageError::InvalidTarget(name.clone())),
        [_, extra, ..] => Err(UsageError::ExtraArgument(extra.clone())),
    }
}

pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}
