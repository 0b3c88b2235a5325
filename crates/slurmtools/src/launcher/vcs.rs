use std::path::PathBuf;

use crate::common::command::run_command;
use crate::common::error::error;

/// Full hash of a commit, e.g. the one that will be checked out inside a job.
pub type CommitId = String;

/// Queries about the state of the source tree that is going to be copied into a job.
pub trait VersionControl {
    /// Number of files with modifications that were not staged.
    fn unstaged_count(&self) -> crate::Result<usize>;

    /// Number of files with staged modifications that were not committed.
    fn staged_count(&self) -> crate::Result<usize>;

    /// Most recent commit of the current branch.
    fn head_commit(&self) -> crate::Result<CommitId>;

    fn dirty_count(&self) -> crate::Result<usize> {
        Ok(self.unstaged_count()? + self.staged_count()?)
    }
}

const GIT_PROGRAM: &str = "git";

/// Git repository containing the working directory.
/// The `git` binary is looked up when the first query runs.
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    fn count_lines(&self, args: &[&str]) -> crate::Result<usize> {
        let output = run_command(GIT_PROGRAM, args, &self.workdir)?;
        Ok(output.lines().filter(|line| !line.trim().is_empty()).count())
    }
}

impl VersionControl for Git {
    fn unstaged_count(&self) -> crate::Result<usize> {
        self.count_lines(&["diff", "--name-only"])
    }

    fn staged_count(&self) -> crate::Result<usize> {
        self.count_lines(&["diff", "--name-only", "--cached"])
    }

    fn head_commit(&self) -> crate::Result<CommitId> {
        let commit = run_command(
            GIT_PROGRAM,
            &["log", "--pretty=format:%H", "-n", "1"],
            &self.workdir,
        )?;
        if commit.is_empty() {
            return error(format!(
                "Repository at {} has no commit to check out",
                self.workdir.display()
            ));
        }
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Git, VersionControl};
    use crate::common::command::run_command;
    use std::path::Path;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let mut arguments = vec![
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@test",
            "-c",
            "commit.gpgsign=false",
        ];
        arguments.extend_from_slice(args);
        run_command("git", &arguments, dir).unwrap();
    }

    fn init_repository() -> TempDir {
        let tmp_dir = TempDir::with_prefix("slurmtools").unwrap();
        git(tmp_dir.path(), &["init", "-q"]);
        std::fs::write(tmp_dir.path().join("train.py"), "print('hello')\n").unwrap();
        git(tmp_dir.path(), &["add", "train.py"]);
        git(tmp_dir.path(), &["commit", "-q", "-m", "initial"]);
        tmp_dir
    }

    #[test]
    fn test_clean_repository() {
        let repo = init_repository();
        let git = Git::new(repo.path().to_path_buf());
        assert_eq!(git.dirty_count().unwrap(), 0);

        let commit = git.head_commit().unwrap();
        assert_eq!(commit.len(), 40);
        assert!(commit.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unstaged_and_staged_changes_are_summed() {
        let repo = init_repository();
        let path = repo.path();
        std::fs::write(path.join("train.py"), "print('changed')\n").unwrap();
        std::fs::write(path.join("model.py"), "").unwrap();
        git(path, &["add", "model.py"]);

        let git = Git::new(path.to_path_buf());
        assert_eq!(git.unstaged_count().unwrap(), 1);
        assert_eq!(git.staged_count().unwrap(), 1);
        assert_eq!(git.dirty_count().unwrap(), 2);
    }

    #[test]
    fn test_untracked_files_are_not_dirty() {
        let repo = init_repository();
        std::fs::write(repo.path().join("notes.txt"), "").unwrap();
        let git = Git::new(repo.path().to_path_buf());
        assert_eq!(git.dirty_count().unwrap(), 0);
    }

    #[test]
    fn test_outside_of_repository() {
        let tmp_dir = TempDir::with_prefix("slurmtools").unwrap();
        let git = Git::new(tmp_dir.path().to_path_buf());
        assert!(git.head_commit().is_err());
    }
}
