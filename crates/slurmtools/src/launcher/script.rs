use crate::common::manager::slurm::{
    SLURM_ARRAY_JOB_ID, SLURM_ARRAY_TASK_ID, build_sbatch_directives,
};
use crate::launcher::config::ResourceConfig;
use crate::launcher::environment::{PackageManager, render_environment};
use crate::launcher::preflight::LaunchContext;

/// Subdirectory of the source tree that is never copied to scratch storage.
const EXCLUDED_DIR: &str = "runs";

/// Application specific additions to the job script. Both are empty by default.
#[derive(Debug, Clone, Default)]
pub struct ScriptExtensions {
    /// Bash instructions executed right before the program starts.
    pub bash: String,
    /// Additional command line arguments of the program.
    pub args: Vec<String>,
}

/// Renders the whole job script. The output depends only on the arguments,
/// so the same inputs always produce the same script.
pub fn build_job_script(
    config: &ResourceConfig,
    context: &LaunchContext,
    manager: &PackageManager,
    extensions: &ScriptExtensions,
) -> crate::Result<String> {
    let environment = render_environment(manager, config, context.workdir())?;
    let name = config.job_name();
    let scratch_dir = format!("$TMPDIR/{name}");
    let extra_args: String = extensions
        .args
        .iter()
        .map(|arg| format!(" {arg}"))
        .collect();

    let mut setup = String::new();
    for fragment in [context.package_install(), extensions.bash.trim_end()] {
        if !fragment.is_empty() {
            setup.push_str(fragment);
            setup.push_str("\n\n");
        }
    }

    Ok(format!(
        r##"#!/bin/bash

{directives}
current_dir=`pwd`
pwd
echo "Session " {name}_{SLURM_ARRAY_JOB_ID}_{SLURM_ARRAY_TASK_ID}

job_name={name}_{SLURM_ARRAY_JOB_ID}_{SLURM_ARRAY_TASK_ID}

echo "Copying the source directory and data"
date
mkdir -p {scratch_dir}
rsync -r . {scratch_dir} --exclude {EXCLUDED_DIR}

echo "Checking out the correct version of the code commit_id {commit}"
cd {scratch_dir}/
pwd
ls
git checkout {commit}

echo "Setting up environment and dependencies"
{environment}
python --version

{setup}echo "Starting computation..."
nvidia-smi -q | grep "CUDA Version"

python {program} --config {program_config} --job_name $job_name{extra_args}

if [[ $? != 0 ]]; then
    exit -1
fi
"##,
        directives = build_sbatch_directives(config),
        commit = context.commit_id(),
        program = context.program().display(),
        program_config = context.config().display(),
    ))
}
