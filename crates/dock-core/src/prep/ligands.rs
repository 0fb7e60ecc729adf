use super::error::PrepError;
use super::tool;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Drug-likeness window applied while the library is converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LigandFilters {
    pub max_mol_weight: f64,
    pub max_rotatable_bonds: u32,
    pub min_logp: f64,
    pub max_logp: f64,
}

impl Default for LigandFilters {
    fn default() -> Self {
        Self {
            max_mol_weight: 500.0,
            max_rotatable_bonds: 10,
            min_logp: -5.0,
            max_logp: 5.0,
        }
    }
}

impl LigandFilters {
    /// The filter in Open Babel `--filter` syntax, where space-separated terms must all hold.
    pub fn to_filter_expression(&self) -> String {
        format!(
            "MW<={} rotors<={} logP>={} logP<={}",
            self.max_mol_weight, self.max_rotatable_bonds, self.min_logp, self.max_logp
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Sdf,
    Smiles,
    Mol2,
}

impl LibraryFormat {
    pub fn from_path(path: &Path) -> Result<Self, PrepError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "sdf" => Ok(Self::Sdf),
            "smi" | "smiles" => Ok(Self::Smiles),
            "mol2" => Ok(Self::Mol2),
            _ => Err(PrepError::UnsupportedLibrary {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn input_flag(self) -> &'static str {
        match self {
            Self::Sdf => "-isdf",
            Self::Smiles => "-ismi",
            Self::Mol2 => "-imol2",
        }
    }
}

/// Turns a compound library into one docking-ready ligand file per compound.
pub trait LigandPreparer: Send + Sync {
    /// Returns the prepared ligand files, sorted by file name.
    fn prepare(
        &self,
        library: &Path,
        out_dir: &Path,
        filters: &LigandFilters,
    ) -> Result<Vec<PathBuf>, PrepError>;
}

fn is_prepared_ligand(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pdbqt") && path.is_file()
}

/// Lists the `.pdbqt` files directly inside `dir`, sorted by file name.
///
/// The extension is matched exactly, so `a.pdbqt` and `a.PDBQT` never both become jobs
/// writing to the same `a_docked` artifact.
pub fn collect_prepared(dir: &Path) -> Result<Vec<PathBuf>, PrepError> {
    let mut ligands = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_prepared_ligand(&path) {
            ligands.push(path);
        }
    }
    ligands.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(ligands)
}

/// Removes ligands left in `dir` by an earlier conversion.
fn clear_prepared(dir: &Path) -> Result<(), PrepError> {
    let stale = collect_prepared(dir)?;
    for path in &stale {
        fs::remove_file(path)?;
    }
    if !stale.is_empty() {
        debug!(removed = stale.len(), dir = %dir.display(), "Cleared stale prepared ligands.");
    }
    Ok(())
}

/// A directory of ligands that are already prepared. Filters do not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreparedLigands;

impl LigandPreparer for PreparedLigands {
    fn prepare(
        &self,
        library: &Path,
        _out_dir: &Path,
        _filters: &LigandFilters,
    ) -> Result<Vec<PathBuf>, PrepError> {
        if !library.is_dir() {
            return Err(PrepError::NotFound(library.to_path_buf()));
        }
        let ligands = collect_prepared(library)?;
        if ligands.is_empty() {
            return Err(PrepError::NoLigands {
                library: library.to_path_buf(),
            });
        }
        info!(count = ligands.len(), library = %library.display(), "Using prepared ligands.");
        Ok(ligands)
    }
}

/// Library conversion through Open Babel: split into one file per molecule, add hydrogens,
/// generate 3D coordinates and drop compounds outside the filter window.
///
/// A directory given as the library is treated as already prepared.
#[derive(Debug, Clone)]
pub struct OpenBabelLigands {
    executable: PathBuf,
}

impl OpenBabelLigands {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn arguments(
        &self,
        library: &Path,
        format: LibraryFormat,
        out_dir: &Path,
        filters: &LigandFilters,
    ) -> Vec<OsString> {
        let stem = library
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ligand".to_string());
        vec![
            format.input_flag().into(),
            library.into(),
            "-opdbqt".into(),
            "-O".into(),
            out_dir.join(format!("{stem}_.pdbqt")).into(),
            "-m".into(),
            "--gen3d".into(),
            "-h".into(),
            "--filter".into(),
            filters.to_filter_expression().into(),
        ]
    }
}

impl LigandPreparer for OpenBabelLigands {
    fn prepare(
        &self,
        library: &Path,
        out_dir: &Path,
        filters: &LigandFilters,
    ) -> Result<Vec<PathBuf>, PrepError> {
        if library.is_dir() {
            return PreparedLigands.prepare(library, out_dir, filters);
        }
        if !library.is_file() {
            return Err(PrepError::NotFound(library.to_path_buf()));
        }
        let format = LibraryFormat::from_path(library)?;

        fs::create_dir_all(out_dir)?;
        clear_prepared(out_dir)?;
        let report = tool::run(
            &self.executable,
            self.arguments(library, format, out_dir, filters),
        )?;
        debug!(report = %report.trim(), "Open Babel conversion report.");

        let ligands = collect_prepared(out_dir)?;
        if ligands.is_empty() {
            return Err(PrepError::NoLigands {
                library: library.to_path_buf(),
            });
        }
        info!(
            count = ligands.len(),
            filter = %filters.to_filter_expression(),
            "Prepared ligands."
        );
        Ok(ligands)
    }
}
