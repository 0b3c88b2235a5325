use std::path::PathBuf;

use clap::Parser;

use crate::launcher::environment::PackageManager;
use crate::launcher::script::ScriptExtensions;
use crate::launcher::submit::SubmitMode;

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Enables more detailed log output
    #[arg(
        long,
        env = "SLURMTOOLS_DEBUG",
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub debug: bool,
}

#[derive(Parser)]
pub struct JobOpts {
    /// Write the job script without submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Bash instructions executed right before the program starts
    #[arg(long, value_name = "BASH")]
    pub extra_bash: Option<String>,

    /// Additional argument passed to the program, can be used multiple times
    #[arg(long, value_name = "ARG", allow_hyphen_values(true))]
    pub extra_args: Vec<String>,
}

impl JobOpts {
    pub fn extensions(&self) -> ScriptExtensions {
        ScriptExtensions {
            bash: self.extra_bash.clone().unwrap_or_default(),
            args: self.extra_args.clone(),
        }
    }

    pub fn mode(&self) -> SubmitMode {
        if self.dry_run {
            SubmitMode::DryRun
        } else {
            SubmitMode::Submit
        }
    }
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version(crate::SLURMTOOLS_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    /// Program launched inside the job
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub program: PathBuf,

    /// Configuration file passed to the program with `--config`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Resource specification of the job (YAML, or TOML with a `.toml` extension)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub resources: PathBuf,

    #[clap(flatten)]
    pub job: JobOpts,

    #[clap(subcommand)]
    pub subcmd: PackageManagerCommand,
}

#[derive(Parser)]
pub enum PackageManagerCommand {
    /// Install dependencies into a fresh virtual environment with pip
    Pip(PipOpts),
    /// Activate an existing conda environment
    Conda(CondaOpts),
}

#[derive(Parser)]
pub struct PipOpts {
    /// Requirements file installed with `pip3 install -r`
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub requirements: PathBuf,
}

#[derive(Parser)]
pub struct CondaOpts {
    /// Name of the conda environment
    #[arg(long)]
    pub env: String,

    /// Conda installation directory [default: `CONDA_DIR` of the resource specification,
    /// then ~/miniconda3]
    #[arg(long, env = "CONDA_DIR", value_hint = clap::ValueHint::DirPath)]
    pub conda_dir: Option<PathBuf>,
}

impl From<PackageManagerCommand> for PackageManager {
    fn from(command: PackageManagerCommand) -> Self {
        match command {
            PackageManagerCommand::Pip(PipOpts { requirements }) => {
                PackageManager::Pip { requirements }
            }
            PackageManagerCommand::Conda(CondaOpts { env, conda_dir }) => {
                PackageManager::Conda { env, conda_dir }
            }
        }
    }
}
