use std::cell::Cell;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::launcher::submit::JobSubmitter;
use crate::launcher::vcs::{CommitId, VersionControl};

/// Repository with a fixed state, so that tests do not depend on git.
pub struct FakeRepository {
    unstaged: usize,
    staged: usize,
    head_queries: Cell<usize>,
}

impl FakeRepository {
    pub const COMMIT: &'static str = "6f1e0a4c9d2b7e8f0a1b2c3d4e5f60718293a4b5";

    pub fn clean() -> Self {
        Self::dirty(0, 0)
    }

    pub fn dirty(unstaged: usize, staged: usize) -> Self {
        Self {
            unstaged,
            staged,
            head_queries: Cell::new(0),
        }
    }

    pub fn head_queries(&self) -> usize {
        self.head_queries.get()
    }
}

impl VersionControl for FakeRepository {
    fn unstaged_count(&self) -> crate::Result<usize> {
        Ok(self.unstaged)
    }

    fn staged_count(&self) -> crate::Result<usize> {
        Ok(self.staged)
    }

    fn head_commit(&self) -> crate::Result<CommitId> {
        self.head_queries.set(self.head_queries.get() + 1);
        Ok(Self::COMMIT.to_string())
    }
}

/// Remembers every script it was asked to submit.
#[derive(Default)]
pub struct RecordingSubmitter {
    pub submitted: Vec<PathBuf>,
}

impl JobSubmitter for RecordingSubmitter {
    fn submit(&mut self, script_path: &Path) -> crate::Result<()> {
        self.submitted.push(script_path.to_path_buf());
        Ok(())
    }
}

/// Temporary source tree with a program, its configuration and pip requirements.
pub struct ProjectDir {
    dir: TempDir,
    root: PathBuf,
}

impl ProjectDir {
    pub fn new() -> Self {
        let dir = TempDir::with_prefix("slurmtools").unwrap();
        let root = dir.path().to_path_buf();
        Self::with_root(dir, root)
    }

    /// Source tree placed in a subdirectory of the temporary directory, so that relative
    /// paths going up from the tree (e.g. the `../logslurm` log directory) stay inside it.
    pub fn nested(name: &str) -> Self {
        let dir = TempDir::with_prefix("slurmtools").unwrap();
        let root = dir.path().join(name);
        Self::with_root(dir, root)
    }

    fn with_root(dir: TempDir, root: PathBuf) -> Self {
        let project = Self { dir, root };
        project.write("train.py", "print('training')\n");
        project.write("configs/run.yml", "epochs: 10\n");
        project.write("requirements.txt", "numpy\n");
        project
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Temporary directory that contains the source tree.
    pub fn tmp_path(&self) -> &Path {
        self.dir.path()
    }

    pub fn program(&self) -> PathBuf {
        PathBuf::from("train.py")
    }

    pub fn config(&self) -> PathBuf {
        PathBuf::from("configs/run.yml")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}
