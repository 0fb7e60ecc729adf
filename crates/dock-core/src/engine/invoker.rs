use super::config::EngineConfig;
use super::error::EngineError;
use super::process::{self, RunError};
use crate::core::models::job::JobDescriptor;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, trace};

/// Output of a successful docking run.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingOutput {
    pub output_path: PathBuf,
    /// Engine stdout followed by any stderr text.
    pub log: String,
}

/// Runs a single docking job to completion.
///
/// Implementations block the calling thread for the whole run and never retry.
pub trait DockingEngine: Send + Sync {
    fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError>;
}

/// AutoDock Vina launched as an external process, pinned to one CPU per job.
#[derive(Debug, Clone)]
pub struct VinaEngine {
    config: EngineConfig,
}

impl VinaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn arguments(&self, job: &JobDescriptor) -> Vec<OsString> {
        let b = job.search_box();
        let mut args: Vec<OsString> = vec![
            "--receptor".into(),
            job.receptor_path().into(),
            "--ligand".into(),
            job.ligand_path().into(),
            "--out".into(),
            job.output_path().into(),
            "--center_x".into(),
            b.center.x.to_string().into(),
            "--center_y".into(),
            b.center.y.to_string().into(),
            "--center_z".into(),
            b.center.z.to_string().into(),
            "--size_x".into(),
            b.size.x.to_string().into(),
            "--size_y".into(),
            b.size.y.to_string().into(),
            "--size_z".into(),
            b.size.z.to_string().into(),
            "--cpu".into(),
            "1".into(),
        ];
        if let Some(exhaustiveness) = self.config.exhaustiveness {
            args.push("--exhaustiveness".into());
            args.push(exhaustiveness.to_string().into());
        }
        if let Some(num_modes) = self.config.num_modes {
            args.push("--num_modes".into());
            args.push(num_modes.to_string().into());
        }
        if let Some(seed) = self.config.seed {
            args.push("--seed".into());
            args.push(seed.to_string().into());
        }
        args
    }
}

impl DockingEngine for VinaEngine {
    fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
        let mut command = Command::new(&self.config.executable);
        command.args(self.arguments(job));
        trace!(command = ?command, "Launching docking engine.");

        let output = match process::run_captured(&mut command, self.config.timeout) {
            Ok(output) => output,
            Err(RunError::Spawn(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(EngineError::EngineNotFound {
                    path: self.config.executable.clone(),
                });
            }
            Err(RunError::Spawn(e)) | Err(RunError::Wait(e)) => return Err(EngineError::Io(e)),
            Err(RunError::TimedOut(after)) => return Err(EngineError::Timeout { after }),
        };

        if !output.status.success() {
            return Err(EngineError::EngineExecution {
                status: output.status.to_string(),
                code: output.status.code(),
                stderr: output.stderr,
            });
        }

        debug!(
            ligand = %job.ligand_path().display(),
            output = %job.output_path().display(),
            "Docking engine finished."
        );

        let mut log = output.stdout;
        if !output.stderr.trim().is_empty() {
            log.push_str(&output.stderr);
        }
        Ok(DockingOutput {
            output_path: job.output_path().to_path_buf(),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::job::SearchBox;
    use nalgebra::{Point3, Vector3};
    use std::path::Path;

    fn sample_job(dir: &Path) -> JobDescriptor {
        JobDescriptor::new(
            dir.join("receptor.pdbqt"),
            dir.join("lig1.pdbqt"),
            SearchBox::new(Point3::new(15.0, -2.5, 0.125), Vector3::new(20.0, 22.5, 60.0)),
            dir.join("lig1_docked.pdbqt"),
        )
    }

    #[test]
    fn arguments_follow_the_engine_contract() {
        let engine = VinaEngine::new(EngineConfig::new("vina"));
        let job = sample_job(Path::new("/data"));
        let args: Vec<String> = engine
            .arguments(&job)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            [
                "--receptor",
                "/data/receptor.pdbqt",
                "--ligand",
                "/data/lig1.pdbqt",
                "--out",
                "/data/lig1_docked.pdbqt",
                "--center_x",
                "15",
                "--center_y",
                "-2.5",
                "--center_z",
                "0.125",
                "--size_x",
                "20",
                "--size_y",
                "22.5",
                "--size_z",
                "60",
                "--cpu",
                "1",
            ]
        );
    }

    #[test]
    fn optional_engine_settings_are_appended() {
        let mut config = EngineConfig::new("vina");
        config.exhaustiveness = Some(16);
        config.num_modes = Some(9);
        config.seed = Some(42);
        let engine = VinaEngine::new(config);
        let args = engine.arguments(&sample_job(Path::new("/data")));
        let tail: Vec<_> = args[args.len() - 6..]
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            tail,
            ["--exhaustiveness", "16", "--num_modes", "9", "--seed", "42"]
        );
    }

    #[test]
    fn missing_executable_is_engine_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = VinaEngine::new(EngineConfig::new(dir.path().join("no-such-vina")));
        match engine.dock(&sample_job(dir.path())) {
            Err(EngineError::EngineNotFound { path }) => {
                assert_eq!(path, dir.path().join("no-such-vina"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    mod fake_engine {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn successful_run_returns_output_path_and_log() {
            let dir = tempfile::tempdir().unwrap();
            // Writes the artifact to the path following --out.
            let script = write_script(
                dir.path(),
                "vina",
                r#"while [ "$#" -gt 0 ]; do
  if [ "$1" = "--out" ]; then out="$2"; fi
  shift
done
echo "REMARK VINA RESULT: -7.5 0.000 0.000" > "$out"
echo "mode |   affinity"
echo "warning: low exhaustiveness" >&2"#,
            );
            let engine = VinaEngine::new(EngineConfig::new(script));
            let job = sample_job(dir.path());

            let output = engine.dock(&job).unwrap();

            assert_eq!(output.output_path, job.output_path());
            assert!(output.log.contains("mode |   affinity"));
            assert!(output.log.contains("warning: low exhaustiveness"));
            let artifact = fs::read_to_string(job.output_path()).unwrap();
            assert!(artifact.starts_with("REMARK VINA RESULT: -7.5"));
        }

        #[test]
        fn non_zero_exit_carries_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(
                dir.path(),
                "vina",
                "echo 'Could not open receptor.pdbqt' >&2\nexit 2",
            );
            let engine = VinaEngine::new(EngineConfig::new(script));

            match engine.dock(&sample_job(dir.path())) {
                Err(EngineError::EngineExecution { code, stderr, .. }) => {
                    assert_eq!(code, Some(2));
                    assert_eq!(stderr.trim(), "Could not open receptor.pdbqt");
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn hung_engine_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(dir.path(), "vina", "exec sleep 30");
            let engine = VinaEngine::new(
                EngineConfig::new(script).with_timeout(Duration::from_millis(200)),
            );

            match engine.dock(&sample_job(dir.path())) {
                Err(EngineError::Timeout { after }) => {
                    assert_eq!(after, Duration::from_millis(200))
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
