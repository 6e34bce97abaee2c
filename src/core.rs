use crate::error::BuildError;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// Controller module every target is built for.
pub const BOARD: &str = "nice_nano";

/// Root directory, relative to the workspace, that holds all build output.
pub const BUILD_ROOT: &str = "build";

/// Firmware image name the build tool leaves under `<output_dir>/zephyr/`.
pub const FIRMWARE_IMAGE: &str = "zmk.uf2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BuildTarget {
    /// Left keyboard half
    Left,
    /// Right keyboard half
    Right,
    /// Settings reset image
    Reset,
}

impl BuildTarget {
    pub fn name(self) -> &'static str {
        match self {
            BuildTarget::Left => "left",
            BuildTarget::Right => "right",
            BuildTarget::Reset => "reset",
        }
    }

    pub fn shield(self) -> &'static str {
        match self {
            BuildTarget::Left => "corne_left",
            BuildTarget::Right => "corne_right",
            BuildTarget::Reset => "settings_reset",
        }
    }

    pub fn board(self) -> &'static str {
        BOARD
    }

    /// Output directory handed to the build tool, relative to the workspace.
    pub fn output_dir(self) -> PathBuf {
        Path::new(BUILD_ROOT).join(self.name())
    }

    /// Where the build tool is expected to leave the firmware image.
    pub fn expected_artifact(self) -> PathBuf {
        self.output_dir().join("zephyr").join(FIRMWARE_IMAGE)
    }

    /// Canonical copy destination for a successful build.
    pub fn final_artifact(self) -> PathBuf {
        Path::new(BUILD_ROOT).join(format!("{}.uf2", self.shield()))
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub target: BuildTarget,
    pub success: bool,
    pub elapsed_secs: u64,
    pub artifact_path: Option<PathBuf>,
    pub failure: Option<BuildError>,
}

impl BuildOutcome {
    pub fn succeeded(target: BuildTarget, elapsed_secs: u64, artifact_path: PathBuf) -> Self {
        Self {
            target,
            success: true,
            elapsed_secs,
            artifact_path: Some(artifact_path),
            failure: None,
        }
    }

    pub fn failed(target: BuildTarget, elapsed_secs: u64, failure: BuildError) -> Self {
        Self {
            target,
            success: false,
            elapsed_secs,
            artifact_path: None,
            failure: Some(failure),
        }
    }
}

/// Aggregate of one invocation of the tool.
#[derive(Debug, Default)]
pub struct RunResult {
    pub outcomes: Vec<BuildOutcome>,
    pub total_secs: u64,
    /// Stopped before any build ran (declined prompt or setup failure).
    pub aborted: bool,
}

impl RunResult {
    pub fn aborted() -> Self {
        Self {
            aborted: true,
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        !self.aborted && self.outcomes.iter().all(|outcome| outcome.success)
    }

    pub fn exit_code(&self) -> u8 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Renders an elapsed second count as `"Xs"` below a minute, `"Xm Ys"` otherwise.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(5), "5s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(65), "1m 5s");
        assert_eq!(format_duration(3725), "62m 5s");
    }

    #[test]
    fn test_target_paths() {
        assert_eq!(BuildTarget::Left.output_dir(), PathBuf::from("build/left"));
        assert_eq!(
            BuildTarget::Right.expected_artifact(),
            PathBuf::from("build/right/zephyr/zmk.uf2")
        );
        assert_eq!(
            BuildTarget::Reset.final_artifact(),
            PathBuf::from("build/settings_reset.uf2")
        );
        assert_eq!(BuildTarget::Left.board(), "nice_nano");
    }

    #[test]
    fn test_aborted_run_is_failure() {
        let run = RunResult::aborted();
        assert!(!run.success());
        assert_eq!(run.exit_code(), 1);
        assert_eq!(RunResult::default().exit_code(), 0);
    }
}
