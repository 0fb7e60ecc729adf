use crate::core::io::pdb::PdbError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported compound library '{}' (extension: '{extension}')", .path.display())]
    UnsupportedLibrary { path: PathBuf, extension: String },

    #[error("Preparation tool not found: {}", .tool.display())]
    ToolNotFound { tool: PathBuf },

    #[error("Preparation tool '{}' failed ({status}): {}", .tool.display(), .stderr.trim())]
    ToolFailed {
        tool: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Invalid receptor structure: {0}")]
    Pdb(#[from] PdbError),

    #[error("No ligands were produced from '{}'", .library.display())]
    NoLigands { library: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
