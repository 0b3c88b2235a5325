use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use bstr::ByteSlice;

use crate::common::error::LaunchError;

pub fn create_command(program: &Path, args: &[&str], workdir: &Path) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command.current_dir(workdir);
    command
}

/// Finds `program` in `search_path`, or in `PATH` when no search path is given.
/// Fails with [`LaunchError::CommandNotFound`] if it cannot be found.
pub fn find_program(program: &str, search_path: Option<&OsString>) -> crate::Result<PathBuf> {
    let found = match search_path {
        Some(paths) => which::which_in(program, Some(paths), "."),
        None => which::which(program),
    };
    match found {
        Ok(path) => {
            log::debug!("Using {program} from {}", path.display());
            Ok(path)
        }
        Err(_) => Err(LaunchError::CommandNotFound(program.to_string())),
    }
}

pub fn check_command_output(command: &str, output: Output) -> crate::Result<Output> {
    let status = output.status;
    if !status.success() {
        return Err(LaunchError::CommandFailed {
            command: command.to_string(),
            details: format!(
                "Exit code: {}\nStderr: {}\nStdout: {}",
                status.code().unwrap_or(-1),
                output.stderr.to_str_lossy().trim(),
                output.stdout.to_str_lossy().trim()
            ),
        });
    }
    Ok(output)
}

/// Runs `program` found in `PATH` to completion and returns its trimmed stdout.
pub fn run_command(program: &str, args: &[&str], workdir: &Path) -> crate::Result<String> {
    let path = find_program(program, None)?;
    let command_line = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("Running command `{command_line}`");

    let output = create_command(&path, args, workdir).output()?;
    let output = check_command_output(&command_line, output)?;
    let stdout = output
        .stdout
        .to_str()
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in `{command_line}` output: {e:?}"))?;
    Ok(stdout.trim().to_string())
}
