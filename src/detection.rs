use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Dev-container location of the user's ZMK config.
pub const WORKSPACE_CONFIG_DIR: &str = "/workspaces/zmk/zmk-config/config";

/// Config checked out next to the invocation directory.
pub const LOCAL_CONFIG_DIR: &str = "zmk-config/config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Workspace,
    Local,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Workspace => f.write_str("workspace"),
            ConfigSource::Local => f.write_str("local checkout"),
        }
    }
}

/// External config directory chosen for this run, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    location: Option<(ConfigSource, PathBuf)>,
}

impl ResolvedConfig {
    pub fn absent() -> Self {
        Self { location: None }
    }

    pub fn found(source: ConfigSource, dir: PathBuf) -> Self {
        Self {
            location: Some((source, dir)),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.location.as_ref().map(|(_, dir)| dir.as_path())
    }

    pub fn source(&self) -> Option<ConfigSource> {
        self.location.as_ref().map(|(source, _)| *source)
    }

    pub fn is_present(&self) -> bool {
        self.location.is_some()
    }
}

pub struct ConfigResolver {
    cwd: PathBuf,
    candidates: Vec<(ConfigSource, PathBuf)>,
}

impl ConfigResolver {
    /// Resolver over the standard candidates, relative paths anchored at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_candidates(
            cwd,
            vec![
                (ConfigSource::Workspace, PathBuf::from(WORKSPACE_CONFIG_DIR)),
                (ConfigSource::Local, PathBuf::from(LOCAL_CONFIG_DIR)),
            ],
        )
    }

    /// Candidates are checked in the order given.
    pub fn with_candidates(cwd: impl Into<PathBuf>, candidates: Vec<(ConfigSource, PathBuf)>) -> Self {
        Self {
            cwd: cwd.into(),
            candidates,
        }
    }

    pub async fn resolve(&self) -> ResolvedConfig {
        for (source, candidate) in &self.candidates {
            let path = self.cwd.join(candidate);
            debug!("Checking for ZMK config at {:?}", path);

            if is_dir(&path).await {
                let dir = fs::canonicalize(&path).await.unwrap_or(path);
                println!("Using {} ZMK config: {}", source, dir.display());
                return ResolvedConfig::found(*source, dir);
            }
        }

        println!("No external ZMK config found, building with the defaults in the source tree");
        ResolvedConfig::absent()
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}
