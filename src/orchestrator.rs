use crate::cli::RunMode;
use crate::core::{format_duration, BuildTarget, RunResult};
use crate::detection::ResolvedConfig;
use crate::BuildRunner;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::fs;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

const PROMPT: &str = "Build both left and right halves? [Y/n] ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirm,
    Decline,
    Invalid,
}

/// Interprets a yes/no answer. An empty answer counts as yes.
pub fn parse_confirmation(answer: &str) -> Confirmation {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Confirmation::Affirm
    } else if answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") {
        Confirmation::Decline
    } else {
        Confirmation::Invalid
    }
}

pub struct Orchestrator<R> {
    runner: R,
    config: ResolvedConfig,
    build_root: PathBuf,
}

impl<R: BuildRunner> Orchestrator<R> {
    pub fn new(runner: R, config: ResolvedConfig, build_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            config,
            build_root: build_root.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run<I>(&self, mode: RunMode, input: I) -> RunResult
    where
        I: AsyncBufRead + Unpin,
    {
        match mode {
            RunMode::Single(BuildTarget::Reset) => self.run_reset().await,
            RunMode::Single(target) => self.run_half(target).await,
            RunMode::Interactive => self.run_interactive(input).await,
        }
    }

    async fn run_reset(&self) -> RunResult {
        let start_time = Instant::now();
        let outcome = self.runner.execute(BuildTarget::Reset, &self.config).await;
        let total_secs = start_time.elapsed().as_secs();

        println!("Total time: {}", format_duration(total_secs));
        RunResult {
            outcomes: vec![outcome],
            total_secs,
            aborted: false,
        }
    }

    // Failure of a single half exits without the total-time line.
    async fn run_half(&self, target: BuildTarget) -> RunResult {
        let start_time = Instant::now();
        let outcome = self.runner.execute(target, &self.config).await;
        let total_secs = start_time.elapsed().as_secs();

        if outcome.success {
            println!("Total time: {}", format_duration(total_secs));
        }
        RunResult {
            outcomes: vec![outcome],
            total_secs,
            aborted: false,
        }
    }

    async fn run_interactive<I>(&self, mut input: I) -> RunResult
    where
        I: AsyncBufRead + Unpin,
    {
        print!("{}", PROMPT);
        if let Err(e) = std::io::stdout().flush() {
            debug!("Failed to flush prompt: {}", e);
        }

        let mut answer = String::new();
        if let Err(e) = input.read_line(&mut answer).await {
            warn!("Failed to read confirmation: {}", e);
            println!("Could not read an answer, build cancelled");
            return RunResult::aborted();
        }

        match parse_confirmation(&answer) {
            Confirmation::Affirm => self.run_both().await,
            Confirmation::Decline | Confirmation::Invalid => {
                info!("Build declined with answer {:?}", answer.trim());
                println!("Build cancelled");
                RunResult::aborted()
            }
        }
    }

    async fn run_both(&self) -> RunResult {
        if let Err(e) = fs::create_dir_all(&self.build_root).await {
            eprintln!("Error: could not create {}: {}", self.build_root.display(), e);
            return RunResult::aborted();
        }

        let start_time = Instant::now();
        let mut outcomes = Vec::with_capacity(2);
        for target in [BuildTarget::Left, BuildTarget::Right] {
            let outcome = self.runner.execute(target, &self.config).await;
            let success = outcome.success;
            outcomes.push(outcome);
            if !success {
                return RunResult {
                    outcomes,
                    total_secs: start_time.elapsed().as_secs(),
                    aborted: false,
                };
            }
        }
        let total_secs = start_time.elapsed().as_secs();

        println!();
        println!("Both halves built in {}", format_duration(total_secs));
        for outcome in &outcomes {
            if let Some(path) = &outcome.artifact_path {
                println!("  {:<6} {}", outcome.target.name(), path.display());
            }
        }

        RunResult {
            outcomes,
            total_secs,
            aborted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation(""), Confirmation::Affirm);
        assert_eq!(parse_confirmation("\n"), Confirmation::Affirm);
        assert_eq!(parse_confirmation("y"), Confirmation::Affirm);
        assert_eq!(parse_confirmation("YES\n"), Confirmation::Affirm);
        assert_eq!(parse_confirmation("Yes"), Confirmation::Affirm);
        assert_eq!(parse_confirmation("n"), Confirmation::Decline);
        assert_eq!(parse_confirmation("No"), Confirmation::Decline);
        assert_eq!(parse_confirmation("maybe"), Confirmation::Invalid);
        assert_eq!(parse_confirmation("yep"), Confirmation::Invalid);
    }
}
