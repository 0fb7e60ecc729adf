use super::error::AnalysisError;
use crate::core::io::artifact::{self, DEFAULT_EXTENSION};
use crate::core::io::vina;
use crate::core::models::score::{ResultsTable, ScoreRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Collects docking artifacts from a directory into a [`ResultsTable`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    extension: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl Aggregator {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Scans `dir` for `<compound>_docked.<extension>` files and records the first pose
    /// score of each.
    ///
    /// Artifacts are visited in lexicographic file-name order, so the resulting table is
    /// identical for an unchanged directory. Files without a result line, or whose result
    /// line cannot be parsed, contribute nothing. Only an unreadable directory is an error.
    #[instrument(skip_all, name = "aggregate", fields(dir = %dir.display()))]
    pub fn aggregate(&self, dir: &Path) -> Result<ResultsTable, AnalysisError> {
        let artifacts = self.discover(dir)?;
        let mut table = ResultsTable::new();
        let mut unscored = 0usize;

        for (compound, path) in artifacts {
            match vina::parse_affinity_from_path(&path) {
                Ok(Some(affinity)) => {
                    if let Some(previous) = table.insert(ScoreRecord::new(&compound, affinity)) {
                        warn!(
                            compound = %compound,
                            previous,
                            affinity,
                            "Duplicate compound identifier; keeping the later score."
                        );
                    }
                }
                Ok(None) => {
                    debug!(artifact = %path.display(), "Artifact has no result line.");
                    unscored += 1;
                }
                Err(e) => {
                    warn!(artifact = %path.display(), error = %e, "Skipping unreadable artifact.");
                    unscored += 1;
                }
            }
        }

        info!(scored = table.len(), unscored, "Aggregated docking artifacts.");
        Ok(table)
    }

    fn discover(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, AnalysisError> {
        let read_dir_err = |source| AnalysisError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut found = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir_err)? {
            let path = entry.map_err(read_dir_err)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(compound) = artifact::compound_from_file_name(file_name, &self.extension)
            {
                found.push((file_name.to_string(), compound.to_string(), path.clone()));
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found
            .into_iter()
            .map(|(_, compound, path)| (compound, path))
            .collect())
    }
}

/// Aggregates `<compound>_docked.pdbqt` artifacts with the default extension.
pub fn aggregate(dir: &Path) -> Result<ResultsTable, AnalysisError> {
    Aggregator::default().aggregate(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn scores_present_artifacts_and_skips_marker_less_ones() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "comp1_docked.pdbqt", "REMARK VINA RESULT: -7.5 0.0 0.0\n");
        write(dir.path(), "comp2_docked.pdbqt", "REMARK VINA RESULT: -8.2 0.0 0.0\n");
        write(dir.path(), "comp3_docked.pdbqt", "REMARK nothing to see\n");

        let table = aggregate(dir.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("comp1"), Some(-7.5));
        assert_eq!(table.get("comp2"), Some(-8.2));
        assert_eq!(table.get("comp3"), None);
    }

    #[test]
    fn ignores_files_outside_the_naming_convention() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "comp1_docked.pdbqt", "REMARK VINA RESULT: -6.0 0.0 0.0\n");
        write(dir.path(), "comp1.pdbqt", "REMARK VINA RESULT: -1.0 0.0 0.0\n");
        write(dir.path(), "comp2_docked.log", "REMARK VINA RESULT: -2.0 0.0 0.0\n");
        fs::create_dir(dir.path().join("nested_docked.pdbqt")).unwrap();

        let table = aggregate(dir.path()).unwrap();

        assert_eq!(table.records(), [ScoreRecord::new("comp1", -6.0)]);
    }

    #[test]
    fn malformed_artifact_is_treated_as_unscored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad_docked.pdbqt", "REMARK VINA RESULT: abc 0.0 0.0\n");
        write(dir.path(), "good_docked.pdbqt", "REMARK VINA RESULT: -5.5 0.0 0.0\n");

        let table = aggregate(dir.path()).unwrap();

        assert_eq!(table.records(), [ScoreRecord::new("good", -5.5)]);
    }

    #[test]
    fn non_finite_scores_never_reach_the_table() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a_docked.pdbqt", "REMARK VINA RESULT: nan 0.0 0.0\n");
        write(dir.path(), "b_docked.pdbqt", "REMARK VINA RESULT: -7.0 0.0 0.0\n");
        write(dir.path(), "c_docked.pdbqt", "REMARK VINA RESULT: -inf 0.0 0.0\n");

        let table = aggregate(dir.path()).unwrap();

        assert_eq!(table.records(), [ScoreRecord::new("b", -7.0)]);
    }

    #[test]
    fn aggregation_is_deterministic_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zeta_docked.pdbqt", "REMARK VINA RESULT: -4.0 0.0 0.0\n");
        write(dir.path(), "alpha_docked.pdbqt", "REMARK VINA RESULT: -9.0 0.0 0.0\n");
        write(dir.path(), "mid_docked.pdbqt", "REMARK VINA RESULT: -6.5 0.0 0.0\n");

        let first = aggregate(dir.path()).unwrap();
        let second = aggregate(dir.path()).unwrap();

        assert_eq!(first, second);
        let order: Vec<_> = first.iter().map(|r| r.compound.as_str()).collect();
        assert_eq!(order, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn custom_extension_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "comp1_docked.out", "REMARK VINA RESULT: -3.0 0.0 0.0\n");
        write(dir.path(), "comp2_docked.pdbqt", "REMARK VINA RESULT: -4.0 0.0 0.0\n");

        let table = Aggregator::new("out").aggregate(dir.path()).unwrap();

        assert_eq!(table.records(), [ScoreRecord::new("comp1", -3.0)]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = aggregate(&dir.path().join("absent"));
        assert!(matches!(result, Err(AnalysisError::ReadDir { .. })));
    }

    #[test]
    fn empty_directory_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        assert!(aggregate(dir.path()).unwrap().is_empty());
    }
}
