use clap::{CommandFactory, FromArgMatches};

use slurmtools::common::cli::RootOptions;
use slurmtools::common::setup::setup_logging;
use slurmtools::launcher::submit::SlurmSubmitter;
use slurmtools::launcher::vcs::Git;
use slurmtools::launcher::{LaunchRequest, launch_job};

fn command_launch(opts: RootOptions) -> slurmtools::Result<()> {
    let workdir = std::env::current_dir()?;
    let vcs = Git::new(workdir.clone());
    let mut submitter = SlurmSubmitter::new(workdir.clone());

    let request = LaunchRequest {
        extensions: opts.job.extensions(),
        mode: opts.job.mode(),
        workdir,
        program: opts.program,
        config: opts.config,
        resources: opts.resources,
        package_manager: opts.subcmd.into(),
    };
    let outcome = launch_job(request, &vcs, &mut submitter)?;

    if outcome.submitted {
        log::info!(
            "Job {} submitted with {} (commit {})",
            outcome.job_name,
            outcome.script_path.display(),
            outcome.commit_id
        );
    } else {
        log::info!(
            "Dry run: job script written to {}, nothing was submitted",
            outcome.script_path.display()
        );
    }
    Ok(())
}

fn main() -> slurmtools::Result<()> {
    let matches = RootOptions::command().get_matches();
    let opts = match RootOptions::from_arg_matches(&matches) {
        Ok(opts) => opts,
        Err(error) => error.exit(),
    };

    setup_logging(opts.common.debug);

    if let Err(e) = command_launch(opts) {
        log::error!("{e}");
        std::process::exit(1);
    }

    Ok(())
}
