use super::config::ConfigError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Docking engine executable not found: {}", .path.display())]
    EngineNotFound { path: PathBuf },

    #[error("Docking engine failed ({status}): {}", .stderr.trim())]
    EngineExecution {
        status: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Docking engine did not finish within {after:?} and was killed")]
    Timeout { after: Duration },

    #[error("Failed to run docking engine: {0}")]
    Io(#[from] io::Error),

    #[error("Docking worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Invalid scheduler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    PoolSetup(String),
}

impl EngineError {
    /// Whether running the same job again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EngineExecution { .. } | Self::Timeout { .. } | Self::Io(_) | Self::WorkerPanicked(_)
        )
    }
}
