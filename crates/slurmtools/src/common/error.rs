use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

use crate::common::error::LaunchError::GenericError;

/// User provided input file that has to exist before a job is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFile {
    Program,
    Config,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFile::Program => f.write_str("Program"),
            InputFile::Config => f.write_str("Config"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(
        "Resource specification file {} not found, please try again with a valid path",
        .0.display()
    )]
    ConfigNotFound(PathBuf),
    #[error("Cannot parse resource specification {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },
    #[error(
        "Found {0} modified file(s) either not staged or not committed. \
         You must stage and commit every modification before submission"
    )]
    DirtyWorkingTree(usize),
    #[error("{kind} file {} not found, please try again with a valid path", .path.display())]
    FileNotFound { kind: InputFile, path: PathBuf },
    #[error(
        "Requirements file {} not found, please try again with a valid path",
        .0.display()
    )]
    RequirementsNotFound(PathBuf),
    #[error("Command `{0}` was not found in PATH")]
    CommandNotFound(String),
    #[error("Command `{command}` failed\n{details}")]
    CommandFailed { command: String, details: String },
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<anyhow::Error> for LaunchError {
    fn from(error: anyhow::Error) -> Self {
        Self::GenericError(error.to_string())
    }
}

pub fn error<T>(message: String) -> crate::Result<T> {
    Err(GenericError(message))
}
