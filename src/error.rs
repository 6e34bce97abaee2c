use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build tool exited with {0}")]
    ToolFailed(ExitStatus),

    #[error("firmware file not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("failed to copy {} to {}: {}", .from.display(), .to.display(), .source)]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("invalid target '{0}' (expected one of: left, right, reset)")]
    InvalidTarget(String),

    #[error("unexpected extra argument '{0}'")]
    ExtraArgument(String),
}
