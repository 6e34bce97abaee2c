use anyhow::{Context, Result};
use corne_builder::cli::{self, CliError, Invocation, RunMode};
use corne_builder::detection::ConfigResolver;
use corne_builder::execution::BuildSettings;
use corne_builder::orchestrator::Orchestrator;
use corne_builder::FirmwareBuildRunner;
use std::env;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (mode, verbose, tool) = match cli::parse_invocation(env::args_os()) {
        Ok(Invocation::Help) => {
            println!("{}", cli::help_text());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run { mode, verbose, tool }) => (mode, verbose, tool),
        Err(CliError::Clap(e)) if e.kind() == clap::error::ErrorKind::DisplayVersion => {
            print!("{}", e);
            return ExitCode::SUCCESS;
        }
        Err(CliError::Clap(e)) => {
            eprint!("{}", e);
            return ExitCode::FAILURE;
        }
        Err(CliError::Usage(e)) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    init_logging(verbose);

    match run(mode, tool).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(mode: RunMode, tool: String) -> Result<u8> {
    let workspace_root = env::current_dir().context("failed to determine working directory")?;
    debug!("Workspace root: {:?}", workspace_root);

    let config = ConfigResolver::new(&workspace_root).resolve().await;
    let settings = BuildSettings::new(workspace_root).with_program(tool);
    let build_root = settings.build_root();

    let orchestrator = Orchestrator::new(FirmwareBuildRunner::new(settings), config, build_root);
    let result = orchestrator.run(mode, BufReader::new(tokio::io::stdin())).await;

    debug!(
        "Run finished: {} build(s), {}s total, success: {}",
        result.outcomes.len(),
        result.total_secs,
        result.success()
    );
    Ok(result.exit_code())
}
