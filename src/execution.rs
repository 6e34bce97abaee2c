use crate::core::{format_duration, BuildOutcome, BuildTarget};
use crate::detection::ResolvedConfig;
use crate::error::BuildError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::fs;
use tokio::process::Command;

/// Build tool invoked when nothing else is configured.
pub const DEFAULT_BUILD_TOOL: &str = "west";

#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Directory the build tool runs in; `build/` lives under it.
    pub workspace_root: PathBuf,
    pub program: String,
}

impl BuildSettings {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            program: DEFAULT_BUILD_TOOL.to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn build_root(&self) -> PathBuf {
        self.workspace_root.join(crate::core::BUILD_ROOT)
    }
}

/// Arguments for one pristine build of `target`.
pub fn build_args(target: BuildTarget, config: &ResolvedConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "build".into(),
        "-p".into(),
        "-d".into(),
        target.output_dir().into_os_string(),
        "-b".into(),
        target.board().into(),
        "--".into(),
        format!("-DSHIELD={}", target.shield()).into(),
    ];

    if let Some(dir) = config.dir() {
        let mut define = OsString::from("-DZMK_CONFIG=");
        define.push(dir);
        args.push(define);
    }

    args
}

pub async fn execute_build(
    settings: &BuildSettings,
    target: BuildTarget,
    config: &ResolvedConfig,
) -> BuildOutcome {
    let args = build_args(target, config);
    println!(
        "==> Building {} (shield {}, board {})",
        target,
        target.shield(),
        target.board()
    );
    tracing::debug!("Running {} {:?} in {:?}", settings.program, args, settings.workspace_root);

    let start_time = Instant::now();
    let status = Command::new(&settings.program)
        .args(&args)
        .current_dir(&settings.workspace_root)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await;
    let elapsed_secs = start_time.elapsed().as_secs();

    let status = match status {
        Ok(status) => status,
        Err(source) => {
            let failure = BuildError::Launch {
                program: settings.program.clone(),
                source,
            };
            return report_failure(target, elapsed_secs, failure);
        }
    };

    let expected = settings.workspace_root.join(target.expected_artifact());
    let artifact_exists = is_file(&expected).await;
    tracing::debug!(
        "Build tool for {} exited with {}, artifact present: {}",
        target,
        status,
        artifact_exists
    );

    if !status.success() {
        return report_failure(target, elapsed_secs, BuildError::ToolFailed(status));
    }
    if !artifact_exists {
        return report_failure(target, elapsed_secs, BuildError::ArtifactMissing(expected));
    }

    let destination = settings.workspace_root.join(target.final_artifact());
    if let Err(failure) = copy_artifact(&expected, &destination).await {
        return report_failure(target, elapsed_secs, failure);
    }

    println!("{} built successfully in {}", target, format_duration(elapsed_secs));
    println!("{}", saved_message(&destination));
    BuildOutcome::succeeded(target, elapsed_secs, destination)
}

pub fn saved_message(destination: &Path) -> String {
    format!("Firmware saved to {}", destination.display())
}

async fn copy_artifact(from: &Path, to: &Path) -> Result<(), BuildError> {
    let copy_error = |source| BuildError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await.map_err(copy_error)?;
    }
    fs::copy(from, to).await.map_err(copy_error)?;
    Ok(())
}

fn report_failure(target: BuildTarget, elapsed_secs: u64, failure: BuildError) -> BuildOutcome {
    tracing::warn!("Build of {} failed: {}", target, failure);
    println!(
        "{} build failed after {}: {}",
        target,
        format_duration(elapsed_secs),
        failure
    );
    BuildOutcome::failed(target, elapsed_secs, failure)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ConfigSource;

    #[test]
    fn test_args_without_config() {
        let args = build_args(BuildTarget::Left, &ResolvedConfig::absent());
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec!["build", "-p", "-d", "build/left", "-b", "nice_nano", "--", "-DSHIELD=corne_left"]
        );
        assert!(!args.iter().any(|arg| arg.starts_with("-DZMK_CONFIG")));
    }

    #[test]
    fn test_saved_message_names_path() {
        let path = PathBuf::from("/work/build/corne_right.uf2");
        assert!(saved_message(&path).contains("/work/build/corne_right.uf2"));
    }

    #[test]
    fn test_args_with_config() {
        let config = ResolvedConfig::found(ConfigSource::Local, PathBuf::from("/tmp/zmk-config/config"));
        let args = build_args(BuildTarget::Reset, &config);

        assert_eq!(args[3], OsString::from("build/reset"));
        assert_eq!(args[7], OsString::from("-DSHIELD=settings_reset"));
        assert_eq!(args.last(), Some(&OsString::from("-DZMK_CONFIG=/tmp/zmk-config/config")));
    }
}
