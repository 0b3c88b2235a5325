use std::fmt::Write;

use crate::launcher::config::ResourceConfig;

/// Program that accepts job scripts.
pub const SBATCH_PROGRAM: &str = "sbatch";

/// Variables set by Slurm for every job, they are expanded on the compute node.
pub const SLURM_ARRAY_JOB_ID: &str = "${SLURM_ARRAY_JOB_ID}";
pub const SLURM_ARRAY_TASK_ID: &str = "${SLURM_ARRAY_TASK_ID}";

/// Builds the `#SBATCH` header of a job script from the requested resources.
pub fn build_sbatch_directives(config: &ResourceConfig) -> String {
    let name = config.job_name();
    let log_file = |extension: &str| {
        config
            .log_dir()
            .join(format!("{name}-%A_%a.{extension}"))
            .display()
            .to_string()
    };

    let mut directives = format!(
        r##"#SBATCH --job-name={name}
#SBATCH --ntasks={ntasks}
#SBATCH --cpus-per-task={cpus}
#SBATCH --time={time}
#SBATCH --qos={qos}
#SBATCH --output={stdout}
#SBATCH --error={stderr}
"##,
        ntasks = config.ntasks(),
        cpus = config.cpus_per_task(),
        time = config.time_limit(),
        qos = config.qos_name(),
        stdout = log_file("out"),
        stderr = log_file("err"),
    );

    // Slurm refuses an empty node list
    if !config.exclude_nodes().is_empty() {
        writeln!(directives, "#SBATCH --exclude={}", config.exclude_nodes()).unwrap();
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::build_sbatch_directives;
    use crate::launcher::config::{DocumentFormat, ResourceConfig};

    #[test]
    fn test_default_directives() {
        insta::assert_snapshot!(build_sbatch_directives(&ResourceConfig::default()), @r###"
        #SBATCH --job-name=sbatch
        #SBATCH --ntasks=1
        #SBATCH --cpus-per-task=1
        #SBATCH --time=96:00:00
        #SBATCH --qos=co_long_gpu
        #SBATCH --output=../logslurm/sbatch-%A_%a.out
        #SBATCH --error=../logslurm/sbatch-%A_%a.err
        "###);
    }

    #[test]
    fn test_every_field_is_present() {
        let config = ResourceConfig::parse(
            r#"
JOB_NAME: unet
NTASKS: 4
CPUS_PER_TASK: 16
QOS: debugq
TIME: "02:30:00"
LOGDIR: /scratch/logs
EXCLUDE: node12,node13
"#,
            DocumentFormat::Yaml,
        )
        .unwrap();
        let directives = build_sbatch_directives(&config);
        let lines: Vec<&str> = directives.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#SBATCH --job-name=unet",
                "#SBATCH --ntasks=4",
                "#SBATCH --cpus-per-task=16",
                "#SBATCH --time=02:30:00",
                "#SBATCH --qos=debugq",
                "#SBATCH --output=/scratch/logs/unet-%A_%a.out",
                "#SBATCH --error=/scratch/logs/unet-%A_%a.err",
                "#SBATCH --exclude=node12,node13",
            ]
        );
    }
}
