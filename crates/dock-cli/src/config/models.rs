use naturadock::engine::config::ScreeningConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub screening: ScreeningConfig,
    /// Open Babel executable shared by receptor and ligand preparation.
    pub obabel: PathBuf,
}
