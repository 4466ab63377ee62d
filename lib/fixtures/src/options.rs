use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixtures_vfs::{host_fs, mem_fs, FileSystem, FsError};
use tracing::trace;

/// Where extracted fixtures are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    Memory,
    /// A fresh sub-directory of the given directory, removed once the
    /// filesystem is dropped.
    Directory(PathBuf),
    /// A fresh directory under the system's temporary directory.
    TempDir,
}

/// Settings for [`Fixture::dot_git`](crate::Fixture::dot_git) and
/// [`Fixture::worktree`](crate::Fixture::worktree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    target: Target,
}

impl Options {
    pub fn memory() -> Self {
        Options {
            target: Target::Memory,
        }
    }

    pub fn target_dir(dir: impl Into<PathBuf>) -> Self {
        Options {
            target: Target::Directory(dir.into()),
        }
    }

    pub fn temp_dir() -> Self {
        Options {
            target: Target::TempDir,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) fn new_filesystem(&self) -> Result<Arc<dyn FileSystem>, FsError> {
        let fs: Arc<dyn FileSystem> = match &self.target {
            Target::Memory => Arc::new(mem_fs::FileSystem::default()),
            Target::Directory(dir) => Arc::new(new_host_fs_in(dir)?),
            Target::TempDir => Arc::new(host_fs::FileSystem::temporary()?),
        };

        trace!(?fs, "created fixture filesystem");
        Ok(fs)
    }
}

fn new_host_fs_in(dir: &Path) -> Result<host_fs::FileSystem, FsError> {
    std::fs::create_dir_all(dir)?;
    host_fs::FileSystem::new_temp_in(dir)
}
