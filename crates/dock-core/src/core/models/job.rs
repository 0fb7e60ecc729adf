use crate::core::io::artifact;
use nalgebra::{Point3, Vector3};
use std::path::{Path, PathBuf};

/// Position of a job inside the batch it was submitted with.
pub type JobId = usize;

/// The 3D region the docking engine is allowed to search, in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBox {
    pub center: Point3<f64>,
    pub size: Vector3<f64>,
}

impl SearchBox {
    pub fn new(center: Point3<f64>, size: Vector3<f64>) -> Self {
        Self { center, size }
    }

    pub fn cube(center: Point3<f64>, edge: f64) -> Self {
        Self::new(center, Vector3::repeat(edge))
    }
}

/// One docking task: a receptor, a ligand, the search box and where the posed ligand goes.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    receptor_path: PathBuf,
    ligand_path: PathBuf,
    search_box: SearchBox,
    output_path: PathBuf,
}

impl JobDescriptor {
    pub fn new(
        receptor_path: impl Into<PathBuf>,
        ligand_path: impl Into<PathBuf>,
        search_box: SearchBox,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            receptor_path: receptor_path.into(),
            ligand_path: ligand_path.into(),
            search_box,
            output_path: output_path.into(),
        }
    }

    /// Builds a job whose output follows the `<ligand stem>_docked.<extension>` convention
    /// inside `results_dir`, which is what later links the artifact back to its compound.
    pub fn for_ligand(
        receptor_path: &Path,
        ligand_path: &Path,
        search_box: SearchBox,
        results_dir: &Path,
        extension: &str,
    ) -> Self {
        let stem = ligand_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_path = results_dir.join(artifact::artifact_file_name(&stem, extension));
        Self::new(receptor_path, ligand_path, search_box, output_path)
    }

    pub fn receptor_path(&self) -> &Path {
        &self.receptor_path
    }

    pub fn ligand_path(&self) -> &Path {
        &self.ligand_path
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
