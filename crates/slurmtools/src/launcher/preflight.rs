use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::common::error::{InputFile, LaunchError};
use crate::common::utils::fs::{absolute_path, parent_dir};
use crate::launcher::vcs::{CommitId, VersionControl};

/// Files whose presence next to the program means that its directory is an installable
/// Python package.
pub const PACKAGE_DESCRIPTORS: [&str; 2] = ["setup.py", "pyproject.toml"];

/// Everything that was verified and resolved before a job script can be composed.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    workdir: PathBuf,
    program: PathBuf,
    program_dir: PathBuf,
    config: PathBuf,
    tool_dir: PathBuf,
    commit_id: CommitId,
    package_install: String,
}

impl LaunchContext {
    /// Root of the source tree that is copied into the job.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Program path as given by the user, it is resolved inside the copied source tree.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Absolute directory of the program on the submitting machine.
    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    pub fn config(&self) -> &Path {
        &self.config
    }

    pub fn tool_dir(&self) -> &Path {
        &self.tool_dir
    }

    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    /// Install command for the program's package, or an empty string.
    pub fn package_install(&self) -> &str {
        &self.package_install
    }
}

/// Runs all checks that have to pass before a job is composed, in this order:
/// clean working tree, commit resolution, input file existence and package detection.
///
/// Relative paths are resolved against `workdir`.
pub fn run_preflight(
    workdir: &Path,
    program: &Path,
    config: &Path,
    vcs: &dyn VersionControl,
) -> crate::Result<LaunchContext> {
    let workdir = absolute_path(workdir.to_path_buf())?;

    check_working_tree(vcs)?;
    let commit_id = vcs.head_commit()?;
    log::info!("Job will run commit {commit_id}");

    check_input_file(InputFile::Program, &workdir, program)?;
    check_input_file(InputFile::Config, &workdir, config)?;

    let program_dir = workdir.join(parent_dir(program));
    let package_install = detect_package_install(program, &program_dir);
    if !package_install.is_empty() {
        log::debug!("Program directory is a package, adding `{package_install}`");
    }

    Ok(LaunchContext {
        workdir,
        program: program.to_path_buf(),
        program_dir,
        config: config.to_path_buf(),
        tool_dir: resolve_tool_dir()?,
        commit_id,
        package_install,
    })
}

/// The job checks out a commit by its hash, so uncommitted modifications would be silently lost.
fn check_working_tree(vcs: &dyn VersionControl) -> crate::Result<()> {
    let count = vcs.dirty_count()?;
    if count > 0 {
        return Err(LaunchError::DirtyWorkingTree(count));
    }
    Ok(())
}

fn check_input_file(kind: InputFile, workdir: &Path, path: &Path) -> crate::Result<()> {
    if !workdir.join(path).exists() {
        return Err(LaunchError::FileNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn detect_package_install(program: &Path, program_dir: &Path) -> String {
    let is_package = PACKAGE_DESCRIPTORS
        .iter()
        .any(|descriptor| program_dir.join(descriptor).exists());
    if is_package {
        format!("pip install -e {}", parent_dir(program).display())
    } else {
        String::new()
    }
}

fn resolve_tool_dir() -> crate::Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot get slurmtools path")?;
    Ok(parent_dir(&exe).to_path_buf())
}
