pub mod cli;
pub mod core;
pub mod detection;
pub mod error;
pub mod execution;
pub mod orchestrator;

use async_trait::async_trait;
use crate::core::{BuildOutcome, BuildTarget};
use crate::detection::ResolvedConfig;
use crate::execution::BuildSettings;

#[async_trait]
pub trait BuildRunner: Send + Sync {
    async fn execute(&self, target: BuildTarget, config: &ResolvedConfig) -> BuildOutcome;
}

pub struct FirmwareBuildRunner {
    settings: BuildSettings,
}

impl FirmwareBuildRunner {
    pub fn new(settings: BuildSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BuildRunner for FirmwareBuildRunner {
    async fn execute(&self, target: BuildTarget, config: &ResolvedConfig) -> BuildOutcome {
        execution::execute_build(&self.settings, target, config).await
    }
}
