use crate::analysis::export::ExportFormat;
use crate::core::io::artifact::DEFAULT_EXTENSION;
use crate::prep::binding_site::BindingSite;
use crate::prep::ligands::LigandFilters;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How to launch the docking engine. The executable is always an explicit value; nothing
/// in the engine looks at the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub executable: PathBuf,
    /// Per-job deadline. `None` waits for the engine indefinitely.
    pub timeout: Option<Duration>,
    pub exhaustiveness: Option<u32>,
    pub num_modes: Option<u32>,
    pub seed: Option<i64>,
}

impl EngineConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
            exhaustiveness: None,
            num_modes: None,
            seed: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of parallel workers; `None` uses the physical core count.
    pub worker_count: Option<usize>,
    /// Extra attempts for a failed job. Missing executables are never retried.
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningConfig {
    pub receptor_path: PathBuf,
    pub library_path: PathBuf,
    pub output_dir: PathBuf,
    pub binding_site: BindingSite,
    pub filters: LigandFilters,
    pub engine: EngineConfig,
    pub scheduler: SchedulerConfig,
    pub artifact_extension: String,
    pub export_format: ExportFormat,
    pub skip_analysis: bool,
}

#[derive(Default)]
pub struct ScreeningConfigBuilder {
    receptor_path: Option<PathBuf>,
    library_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    binding_site: Option<BindingSite>,
    filters: Option<LigandFilters>,
    engine: Option<EngineConfig>,
    scheduler: Option<SchedulerConfig>,
    artifact_extension: Option<String>,
    export_format: Option<ExportFormat>,
    skip_analysis: bool,
}

impl ScreeningConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receptor_path(mut self, path: PathBuf) -> Self {
        self.receptor_path = Some(path);
        self
    }
    pub fn library_path(mut self, path: PathBuf) -> Self {
        self.library_path = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn binding_site(mut self, site: BindingSite) -> Self {
        self.binding_site = Some(site);
        self
    }
    pub fn filters(mut self, filters: LigandFilters) -> Self {
        self.filters = Some(filters);
        self
    }
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }
    pub fn scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
    pub fn artifact_extension(mut self, extension: impl Into<String>) -> Self {
        self.artifact_extension = Some(extension.into());
        self
    }
    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }
    pub fn skip_analysis(mut self, skip: bool) -> Self {
        self.skip_analysis = skip;
        self
    }

    pub fn build(self) -> Result<ScreeningConfig, ConfigError> {
        let binding_site = self
            .binding_site
            .ok_or(ConfigError::MissingParameter("binding_site"))?;
        if binding_site.size.iter().any(|&edge| edge.is_nan() || edge <= 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "binding_site.size",
                reason: "every box edge must be a positive length".to_string(),
            });
        }

        let scheduler = self.scheduler.unwrap_or_default();
        if scheduler.worker_count == Some(0) {
            return Err(ConfigError::InvalidValue {
                parameter: "worker_count",
                reason: "at least one worker is required".to_string(),
            });
        }

        let filters = self.filters.unwrap_or_default();
        if filters.min_logp > filters.max_logp {
            return Err(ConfigError::InvalidValue {
                parameter: "filters.logp",
                reason: format!(
                    "minimum logP {} exceeds maximum {}",
                    filters.min_logp, filters.max_logp
                ),
            });
        }

        let artifact_extension = self
            .artifact_extension
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        if artifact_extension.is_empty() || artifact_extension.contains(['/', '\\', '.']) {
            return Err(ConfigError::InvalidValue {
                parameter: "artifact_extension",
                reason: format!("'{artifact_extension}' is not a bare file extension"),
            });
        }

        Ok(ScreeningConfig {
            receptor_path: self
                .receptor_path
                .ok_or(ConfigError::MissingParameter("receptor_path"))?,
            library_path: self
                .library_path
                .ok_or(ConfigError::MissingParameter("library_path"))?,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            binding_site,
            filters,
            engine: self.engine.ok_or(ConfigError::MissingParameter("engine"))?,
            scheduler,
            artifact_extension,
            export_format: self.export_format.unwrap_or_default(),
            skip_analysis: self.skip_analysis,
        })
    }
}
