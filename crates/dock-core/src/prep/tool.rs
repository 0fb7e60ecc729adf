use super::error::PrepError;
use crate::engine::process::{self, RunError};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Runs an external preparation tool and maps its failure modes onto [`PrepError`].
pub(crate) fn run(executable: &Path, args: Vec<OsString>) -> Result<String, PrepError> {
    let mut command = Command::new(executable);
    command.args(args);
    trace!(command = ?command, "Launching preparation tool.");

    let output = match process::run_captured(&mut command, None) {
        Ok(output) => output,
        Err(RunError::Spawn(e)) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PrepError::ToolNotFound {
                tool: executable.to_path_buf(),
            });
        }
        Err(RunError::Spawn(e)) | Err(RunError::Wait(e)) => return Err(PrepError::Io(e)),
        Err(RunError::TimedOut(after)) => {
            return Err(PrepError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("preparation tool timed out after {after:?}"),
            )));
        }
    };

    if !output.status.success() {
        return Err(PrepError::ToolFailed {
            tool: executable.to_path_buf(),
            status: output.status.to_string(),
            stderr: output.stderr,
        });
    }
    debug!(tool = %executable.display(), "Preparation tool finished.");
    // Open Babel reports conversion counts on stderr.
    Ok(output.stderr)
}
