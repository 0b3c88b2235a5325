use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::common::command::{create_command, find_program};
use crate::common::manager::slurm::SBATCH_PROGRAM;

/// Name of the script that will be submitted to Slurm, it is overwritten on every launch.
pub const JOB_SCRIPT_NAME: &str = "job.sbatch";

pub enum SubmitMode {
    /// Write the job script and submit it.
    Submit,
    /// Only write the job script, to inspect it before a real submission.
    DryRun,
}

/// Hands a written job script over to a workload manager.
pub trait JobSubmitter {
    fn submit(&mut self, script_path: &Path) -> crate::Result<()>;
}

/// Submits job scripts with `sbatch`.
pub struct SlurmSubmitter {
    workdir: PathBuf,
    /// Directories searched for `sbatch` instead of `PATH`.
    search_path: Option<OsString>,
}

impl SlurmSubmitter {
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            workdir,
            search_path: None,
        }
    }

    #[cfg(test)]
    fn with_search_path(workdir: PathBuf, search_path: OsString) -> Self {
        Self {
            workdir,
            search_path: Some(search_path),
        }
    }
}

impl JobSubmitter for SlurmSubmitter {
    /// The output of `sbatch` goes straight to the terminal. A rejected submission is
    /// only reported as a warning.
    fn submit(&mut self, script_path: &Path) -> crate::Result<()> {
        let program = find_program(SBATCH_PROGRAM, self.search_path.as_ref())?;

        let script_path = script_path.display().to_string();
        log::debug!("Running command `{SBATCH_PROGRAM} {script_path}`");

        let status = create_command(&program, &[script_path.as_str()], &self.workdir).status()?;
        if !status.success() {
            log::warn!("{SBATCH_PROGRAM} exited with {status}, the job was probably not queued");
        }
        Ok(())
    }
}

/// Writes the script into `directory`, replacing a script from a previous launch.
pub fn write_job_script(directory: &Path, script: &str) -> crate::Result<PathBuf> {
    let script_path = directory.join(JOB_SCRIPT_NAME);
    std::fs::write(&script_path, script)?;
    log::debug!("Job script written to {}", script_path.display());
    Ok(script_path)
}
