use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::common::error::LaunchError;
use crate::launcher::config::ResourceConfig;

/// Deep learning framework build installed into every pip environment before the requirements.
const PIP_FRAMEWORK_INSTALL: &str =
    "pip3 install torch torchvision --extra-index-url https://download.pytorch.org/whl/cu116";

/// Used when no conda directory was configured and the home directory is unknown.
/// It is expanded by the shell on the compute node.
const FALLBACK_CONDA_DIR: &str = "$HOME/miniconda3";

/// Strategy used to make the program's dependencies available inside the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageManager {
    /// Create a fresh virtual environment and install the requirements file into it.
    Pip { requirements: PathBuf },
    /// Activate an already existing conda environment.
    Conda {
        env: String,
        conda_dir: Option<PathBuf>,
    },
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Pip { .. } => "pip",
            PackageManager::Conda { .. } => "conda",
        }
    }
}

/// Renders the part of the job script that sets up dependencies.
/// A relative requirements path is looked up in `workdir`.
pub fn render_environment(
    manager: &PackageManager,
    config: &ResourceConfig,
    workdir: &Path,
) -> crate::Result<String> {
    match manager {
        PackageManager::Pip { requirements } => render_pip_environment(workdir, requirements),
        PackageManager::Conda { env, conda_dir } => Ok(render_conda_environment(
            env,
            &resolve_conda_dir(conda_dir.as_deref(), config),
        )),
    }
}

fn render_pip_environment(workdir: &Path, requirements: &Path) -> crate::Result<String> {
    if !workdir.join(requirements).exists() {
        return Err(LaunchError::RequirementsNotFound(requirements.to_path_buf()));
    }
    Ok(format!(
        r#"echo "Setting up the virtual environment"
python3 -m pip install virtualenv --user
virtualenv -p python3 venv
source venv/bin/activate
{PIP_FRAMEWORK_INSTALL}
pip3 install -r {requirements}"#,
        requirements = requirements.display()
    ))
}

fn render_conda_environment(env: &str, conda_dir: &str) -> String {
    let mut fragment = String::new();
    writeln!(
        fragment,
        r#"# >>> conda initialize >>>
__conda_setup="$('{conda_dir}/bin/conda' 'shell.bash' 'hook' 2> /dev/null)"
if [ $? -eq 0 ]; then
    eval "$__conda_setup"
else
    if [ -f "{conda_dir}/etc/profile.d/conda.sh" ]; then
        . "{conda_dir}/etc/profile.d/conda.sh"
    else
        export PATH="{conda_dir}/bin:$PATH"
    fi
fi
unset __conda_setup
# <<< conda initialize <<<
"#
    )
    .unwrap();
    writeln!(fragment, "echo {env}").unwrap();
    writeln!(fragment, "conda activate {env}").unwrap();
    write!(
        fragment,
        "export LD_LIBRARY_PATH=$LD_LIBRARY_PATH:$CONDA_PREFIX/lib/"
    )
    .unwrap();
    fragment
}

/// Conda installation used by the job: the explicit override, then the resource
/// specification, then `miniconda3` in the user's home directory.
pub fn resolve_conda_dir(explicit: Option<&Path>, config: &ResourceConfig) -> String {
    explicit
        .or(config.conda_dir())
        .map(|dir| dir.display().to_string())
        .or_else(|| dirs::home_dir().map(|home| home.join("miniconda3").display().to_string()))
        .unwrap_or_else(|| FALLBACK_CONDA_DIR.to_string())
}
