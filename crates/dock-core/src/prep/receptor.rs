use super::error::PrepError;
use super::tool;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Converts a receptor structure into the docking engine's input format.
pub trait ReceptorPreparer: Send + Sync {
    /// Writes the prepared receptor into `out_dir` and returns its path.
    fn prepare(&self, structure: &Path, out_dir: &Path) -> Result<PathBuf, PrepError>;
}

fn is_pdbqt(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdbqt"))
}

/// Receptor preparation through Open Babel as a rigid PDBQT (`-xr`).
#[derive(Debug, Clone)]
pub struct OpenBabelReceptor {
    executable: PathBuf,
}

impl OpenBabelReceptor {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn arguments(&self, structure: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-ipdb".into(),
            structure.into(),
            "-xr".into(),
            "-opdbqt".into(),
            "-O".into(),
            output.into(),
        ]
    }
}

impl ReceptorPreparer for OpenBabelReceptor {
    fn prepare(&self, structure: &Path, out_dir: &Path) -> Result<PathBuf, PrepError> {
        if !structure.is_file() {
            return Err(PrepError::NotFound(structure.to_path_buf()));
        }
        if is_pdbqt(structure) {
            info!(receptor = %structure.display(), "Receptor is already prepared.");
            return Ok(structure.to_path_buf());
        }

        fs::create_dir_all(out_dir)?;
        let stem = structure
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "receptor".to_string());
        let output = out_dir.join(format!("{stem}.pdbqt"));

        tool::run(&self.executable, self.arguments(structure, &output))?;
        if !output.is_file() {
            return Err(PrepError::ToolFailed {
                tool: self.executable.clone(),
                status: "exit status: 0".to_string(),
                stderr: format!("no receptor written to {}", output.display()),
            });
        }

        info!(receptor = %output.display(), "Prepared receptor.");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_request_a_rigid_pdbqt() {
        let prep = OpenBabelReceptor::new("obabel");
        let args: Vec<String> = prep
            .arguments(Path::new("in/1abc.pdb"), Path::new("out/1abc.pdbqt"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["-ipdb", "in/1abc.pdb", "-xr", "-opdbqt", "-O", "out/1abc.pdbqt"]
        );
    }

    #[test]
    fn prepared_receptor_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let receptor = dir.path().join("target.PDBQT");
        fs::write(&receptor, "ATOM\n").unwrap();
        let prep = OpenBabelReceptor::new(dir.path().join("missing-obabel"));

        let out = prep.prepare(&receptor, &dir.path().join("out")).unwrap();

        assert_eq!(out, receptor);
    }

    #[test]
    fn missing_structure_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let prep = OpenBabelReceptor::new("obabel");
        let result = prep.prepare(&dir.path().join("absent.pdb"), dir.path());
        assert!(matches!(result, Err(PrepError::NotFound(_))));
    }

    #[test]
    fn missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let receptor = dir.path().join("target.pdb");
        fs::write(&receptor, "ATOM\n").unwrap();
        let prep = OpenBabelReceptor::new(dir.path().join("missing-obabel"));

        let result = prep.prepare(&receptor, &dir.path().join("out"));

        assert!(matches!(result, Err(PrepError::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn converts_through_the_tool() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("obabel");
        // Copies the input (second argument) to the path after -O.
        fs::write(&tool, "#!/bin/sh\ncp \"$2\" \"$6\"\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let receptor = dir.path().join("target.pdb");
        fs::write(&receptor, "ATOM\n").unwrap();

        let out = OpenBabelReceptor::new(&tool)
            .prepare(&receptor, &dir.path().join("out"))
            .unwrap();

        assert_eq!(out, dir.path().join("out").join("target.pdbqt"));
        assert_eq!(fs::read_to_string(out).unwrap(), "ATOM\n");
    }
}
