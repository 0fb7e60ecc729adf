use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub protein: Option<PathBuf>,
    pub ligands: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub binding_site: Option<FileBindingSiteConfig>,
    pub filters: Option<FileFilterConfig>,
    pub docking: Option<FileDockingConfig>,
    pub preparation: Option<FilePreparationConfig>,
    pub analysis: Option<FileAnalysisConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBindingSiteConfig {
    pub center: Option<[f64; 3]>,
    pub size: Option<[f64; 3]>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFilterConfig {
    pub max_mol_weight: Option<f64>,
    pub max_rotatable_bonds: Option<u32>,
    pub min_logp: Option<f64>,
    pub max_logp: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDockingConfig {
    pub executable: Option<PathBuf>,
    pub workers: Option<usize>,
    pub exhaustiveness: Option<u32>,
    pub num_modes: Option<u32>,
    pub seed: Option<i64>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub artifact_extension: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePreparationConfig {
    pub obabel: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAnalysisConfig {
    pub export_format: Option<String>,
    pub skip: Option<bool>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
