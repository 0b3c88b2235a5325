use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::common::error::LaunchError;

const DEFAULT_JOB_NAME: &str = "sbatch";
const DEFAULT_NTASKS: u32 = 1;
const DEFAULT_CPUS_PER_TASK: u32 = 1;
const DEFAULT_QOS: &str = "co_long_gpu";
const DEFAULT_TIME_LIMIT: &str = "96:00:00";
const DEFAULT_LOG_DIR: &str = "../logslurm";

/// Resources requested for a single job, read from a resource specification document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    job_name: String,
    ntasks: u32,
    cpus_per_task: u32,
    qos_name: String,
    time_limit: String,
    log_dir: PathBuf,
    exclude_nodes: String,
    conda_dir: Option<PathBuf>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceDocument::default().into()
    }
}

impl ResourceConfig {
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, String> {
        let document: ResourceDocument = if content.trim().is_empty() {
            ResourceDocument::default()
        } else {
            match format {
                DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
                DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
            }
        };
        Ok(document.into())
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn ntasks(&self) -> u32 {
        self.ntasks
    }

    pub fn cpus_per_task(&self) -> u32 {
        self.cpus_per_task
    }

    pub fn qos_name(&self) -> &str {
        &self.qos_name
    }

    pub fn time_limit(&self) -> &str {
        &self.time_limit
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn exclude_nodes(&self) -> &str {
        &self.exclude_nodes
    }

    /// Conda installation directory, if the document overrides it.
    pub fn conda_dir(&self) -> Option<&Path> {
        self.conda_dir.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
}

impl DocumentFormat {
    /// `.toml` files are read as TOML, everything else as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Raw contents of a resource specification. Unknown keys are ignored.
#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ResourceDocument {
    job_name: Option<String>,
    ntasks: Option<u32>,
    cpus_per_task: Option<u32>,
    qos: Option<String>,
    #[serde(default, deserialize_with = "deserialize_time")]
    time: Option<String>,
    logdir: Option<PathBuf>,
    exclude: Option<String>,
    conda_dir: Option<PathBuf>,
}

impl From<ResourceDocument> for ResourceConfig {
    fn from(document: ResourceDocument) -> Self {
        Self {
            job_name: document
                .job_name
                .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string()),
            ntasks: document.ntasks.unwrap_or(DEFAULT_NTASKS),
            cpus_per_task: document.cpus_per_task.unwrap_or(DEFAULT_CPUS_PER_TASK),
            qos_name: document.qos.unwrap_or_else(|| DEFAULT_QOS.to_string()),
            time_limit: document
                .time
                .unwrap_or_else(|| DEFAULT_TIME_LIMIT.to_string()),
            log_dir: document
                .logdir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            exclude_nodes: document.exclude.unwrap_or_default(),
            conda_dir: document.conda_dir,
        }
    }
}

/// Slurm accepts a plain number of minutes as a time limit, so `TIME: 30` is kept as `"30"`.
fn deserialize_time<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimeValue {
        Text(String),
        Minutes(u64),
    }

    Ok(
        Option::<TimeValue>::deserialize(deserializer)?.map(|value| match value {
            TimeValue::Text(text) => text,
            TimeValue::Minutes(minutes) => minutes.to_string(),
        }),
    )
}

/// Reads the resource specification at `path`, filling in defaults for missing keys.
pub fn load_resource_config(path: &Path) -> crate::Result<ResourceConfig> {
    if !path.exists() {
        return Err(LaunchError::ConfigNotFound(path.to_path_buf()));
    }
    log::debug!("Reading resource specification from {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let config = ResourceConfig::parse(&content, DocumentFormat::from_path(path)).map_err(
        |message| LaunchError::ConfigParse {
            path: path.to_path_buf(),
            message,
        },
    )?;
    log::debug!("Resource configuration: {config:?}");
    Ok(config)
}

/// Makes sure that the directory receiving the job's stdout/stderr exists,
/// because Slurm does not create it.
pub fn create_log_dir(config: &ResourceConfig, workdir: &Path) -> crate::Result<PathBuf> {
    let log_dir = workdir.join(config.log_dir());
    std::fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}
