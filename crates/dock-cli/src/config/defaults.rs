use naturadock::core::io::artifact::DEFAULT_EXTENSION;
use naturadock::prep::binding_site::DEFAULT_BOX_EDGE;
use naturadock::prep::ligands::LigandFilters;

pub const VINA_EXECUTABLE_ENV: &str = "VINA_EXECUTABLE";

pub struct DefaultsConfig {
    pub box_edge: f64,
    pub filters: LigandFilters,
    pub vina: String,
    pub obabel: String,
    pub retries: u32,
    pub artifact_extension: String,
    pub export_format: String,
    pub skip_analysis: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            box_edge: DEFAULT_BOX_EDGE,
            filters: LigandFilters::default(),
            vina: "vina".to_string(),
            obabel: "obabel".to_string(),
            retries: 0,
            artifact_extension: DEFAULT_EXTENSION.to_string(),
            export_format: "csv".to_string(),
            skip_analysis: false,
        }
    }
}
