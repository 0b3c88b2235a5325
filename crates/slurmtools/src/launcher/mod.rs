//! Launching of a program as a Slurm job.
//!
//! A launch reads the resource specification, verifies that the git working tree is clean,
//! renders a job script that runs the program from a scratch copy of the tree at the current
//! commit and finally submits the script with `sbatch`. Nothing is submitted unless every
//! step before the submission succeeds.
pub mod config;
pub mod environment;
pub mod preflight;
pub mod script;
pub mod submit;
pub mod vcs;

use std::path::PathBuf;

use crate::launcher::config::{create_log_dir, load_resource_config};
use crate::launcher::environment::PackageManager;
use crate::launcher::preflight::run_preflight;
use crate::launcher::script::{ScriptExtensions, build_job_script};
use crate::launcher::submit::{JobSubmitter, SubmitMode, write_job_script};
use crate::launcher::vcs::{CommitId, VersionControl};

pub struct LaunchRequest {
    /// Root of the source tree, the job script is written here.
    pub workdir: PathBuf,
    pub program: PathBuf,
    pub config: PathBuf,
    pub resources: PathBuf,
    pub package_manager: PackageManager,
    pub extensions: ScriptExtensions,
    pub mode: SubmitMode,
}

#[derive(Debug)]
pub struct LaunchOutcome {
    pub job_name: String,
    pub commit_id: CommitId,
    pub script_path: PathBuf,
    pub submitted: bool,
}

pub fn launch_job(
    request: LaunchRequest,
    vcs: &dyn VersionControl,
    submitter: &mut dyn JobSubmitter,
) -> crate::Result<LaunchOutcome> {
    let LaunchRequest {
        workdir,
        program,
        config,
        resources,
        package_manager,
        extensions,
        mode,
    } = request;

    let resource_config = load_resource_config(&workdir.join(&resources))?;
    let log_dir = create_log_dir(&resource_config, &workdir)?;
    log::debug!("Job logs will be stored in {}", log_dir.display());

    let context = run_preflight(&workdir, &program, &config, vcs)?;
    log::debug!(
        "Launching {} from {} with {} environment (slurmtools at {})",
        context.program().display(),
        context.program_dir().display(),
        package_manager.name(),
        context.tool_dir().display()
    );

    let script = build_job_script(&resource_config, &context, &package_manager, &extensions)?;
    let script_path = write_job_script(&workdir, &script)?;

    let submitted = match mode {
        SubmitMode::Submit => {
            submitter.submit(&script_path)?;
            true
        }
        SubmitMode::DryRun => false,
    };

    Ok(LaunchOutcome {
        job_name: resource_config.job_name().to_string(),
        commit_id: context.commit_id().to_string(),
        script_path,
        submitted,
    })
}
