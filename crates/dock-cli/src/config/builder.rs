use super::defaults::{DefaultsConfig, VINA_EXECUTABLE_ENV};
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ScreenArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nalgebra::{Point3, Vector3};
use naturadock::analysis::export::ExportFormat;
use naturadock::engine::config::{EngineConfig, SchedulerConfig, ScreeningConfigBuilder};
use naturadock::prep::binding_site::{BindingSite, BoxCenter};
use naturadock::prep::ligands::LigandFilters;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(args: &ScreenArgs, workers: Option<usize>) -> Result<AppConfig> {
    build_config_with_env(args, workers, std::env::var_os(VINA_EXECUTABLE_ENV))
}

fn build_config_with_env(
    args: &ScreenArgs,
    workers: Option<usize>,
    vina_env: Option<OsString>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let receptor_path = require_existing_input(
        args.protein.clone().or(file_config.protein.take()),
        "protein",
    )?;
    let library_path = require_existing_input(
        args.ligands.clone().or(file_config.ligands.take()),
        "ligands",
    )?;
    let output_dir = args
        .output
        .clone()
        .or(file_config.output.take())
        .ok_or_else(|| missing_value("output"))?;

    let site_file = file_config.binding_site.take().unwrap_or_default();
    let center = match args.center.or(site_file.center) {
        Some([x, y, z]) => BoxCenter::Explicit(Point3::new(x, y, z)),
        None => BoxCenter::Centroid,
    };
    let [file_x, file_y, file_z] = site_file.size.unwrap_or([defaults.box_edge; 3]);
    let size = Vector3::new(
        args.size_x.unwrap_or(file_x),
        args.size_y.unwrap_or(file_y),
        args.size_z.unwrap_or(file_z),
    );

    let filters_file = file_config.filters.take().unwrap_or_default();
    let filters = LigandFilters {
        max_mol_weight: args
            .max_mol_weight
            .or(filters_file.max_mol_weight)
            .unwrap_or(defaults.filters.max_mol_weight),
        max_rotatable_bonds: args
            .max_rotatable_bonds
            .or(filters_file.max_rotatable_bonds)
            .unwrap_or(defaults.filters.max_rotatable_bonds),
        min_logp: args
            .min_logp
            .or(filters_file.min_logp)
            .unwrap_or(defaults.filters.min_logp),
        max_logp: args
            .max_logp
            .or(filters_file.max_logp)
            .unwrap_or(defaults.filters.max_logp),
    };

    let docking_file = file_config.docking.take().unwrap_or_default();
    let executable = resolve_executable(
        args.vina.as_deref(),
        docking_file.executable.as_deref(),
        vina_env,
        &defaults.vina,
    );
    let timeout = match args.timeout.or(docking_file.timeout_secs) {
        Some(0) => {
            return Err(CliError::Config(
                "The docking timeout must be at least one second.".to_string(),
            ));
        }
        other => other.map(Duration::from_secs),
    };
    let engine = EngineConfig {
        executable,
        timeout,
        exhaustiveness: args.exhaustiveness.or(docking_file.exhaustiveness),
        num_modes: args.num_modes.or(docking_file.num_modes),
        seed: args.seed.or(docking_file.seed),
    };
    let scheduler = SchedulerConfig {
        worker_count: workers.or(docking_file.workers),
        retries: args
            .retries
            .or(docking_file.retries)
            .unwrap_or(defaults.retries),
    };
    let artifact_extension = docking_file
        .artifact_extension
        .unwrap_or(defaults.artifact_extension);

    let obabel = args
        .obabel
        .clone()
        .or(file_config.preparation.take().and_then(|p| p.obabel))
        .unwrap_or_else(|| PathBuf::from(&defaults.obabel));

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let export_format = args
        .export_format
        .as_deref()
        .or(analysis_file.export_format.as_deref())
        .unwrap_or(defaults.export_format.as_str())
        .parse::<ExportFormat>()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let skip_analysis =
        args.skip_analysis || analysis_file.skip.unwrap_or(defaults.skip_analysis);

    let screening = ScreeningConfigBuilder::new()
        .receptor_path(receptor_path)
        .library_path(library_path)
        .output_dir(output_dir)
        .binding_site(BindingSite::new(center, size))
        .filters(filters)
        .engine(engine)
        .scheduler(scheduler)
        .artifact_extension(artifact_extension)
        .export_format(export_format)
        .skip_analysis(skip_analysis)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig { screening, obabel })
}

/// The first of: the `--vina` flag, `docking.executable` from the file, the
/// `VINA_EXECUTABLE` environment variable, the bare default name.
fn resolve_executable(
    cli_arg: Option<&Path>,
    file_arg: Option<&Path>,
    env_value: Option<OsString>,
    default_arg: &str,
) -> PathBuf {
    if let Some(path) = cli_arg.or(file_arg) {
        return path.to_path_buf();
    }
    env_value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_arg))
}

fn missing_value(kind: &str) -> CliError {
    CliError::Config(format!(
        "A value for '{}' is required either in the config file or via CLI argument.",
        kind
    ))
}

fn require_existing_input(path: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    let path = path.ok_or_else(|| missing_value(kind))?;
    if !path.exists() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Provided {} path does not exist: {}", kind, path.display()),
        )));
    }
    Ok(path)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "binding-site.center" | "binding-site.size" => {
                let triple = parser::parse_triple(value_str)
                    .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
                let site = config.binding_site.get_or_insert_with(Default::default);
                if key.ends_with("center") {
                    site.center = Some(triple);
                } else {
                    site.size = Some(triple);
                }
            }
            "filters.max-mol-weight" => {
                config.filters.get_or_insert_with(Default::default).max_mol_weight =
                    Some(parse_value(key, value_str, "float")?);
            }
            "filters.max-rotatable-bonds" => {
                config
                    .filters
                    .get_or_insert_with(Default::default)
                    .max_rotatable_bonds = Some(parse_value(key, value_str, "integer")?);
            }
            "filters.min-logp" => {
                config.filters.get_or_insert_with(Default::default).min_logp =
                    Some(parse_value(key, value_str, "float")?);
            }
            "filters.max-logp" => {
                config.filters.get_or_insert_with(Default::default).max_logp =
                    Some(parse_value(key, value_str, "float")?);
            }
            "docking.executable" => {
                config.docking.get_or_insert_with(Default::default).executable =
                    Some(PathBuf::from(value_str));
            }
            "docking.workers" => {
                config.docking.get_or_insert_with(Default::default).workers =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.exhaustiveness" => {
                config.docking.get_or_insert_with(Default::default).exhaustiveness =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.num-modes" => {
                config.docking.get_or_insert_with(Default::default).num_modes =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.seed" => {
                config.docking.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.timeout-secs" => {
                config.docking.get_or_insert_with(Default::default).timeout_secs =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.retries" => {
                config.docking.get_or_insert_with(Default::default).retries =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "docking.artifact-extension" => {
                config
                    .docking
                    .get_or_insert_with(Default::default)
                    .artifact_extension = Some(value_str.to_string());
            }
            "preparation.obabel" => {
                config.preparation.get_or_insert_with(Default::default).obabel =
                    Some(PathBuf::from(value_str));
            }
            "analysis.export-format" => {
                config.analysis.get_or_insert_with(Default::default).export_format =
                    Some(value_str.to_string());
            }
            "analysis.skip" => {
                config.analysis.get_or_insert_with(Default::default).skip =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
