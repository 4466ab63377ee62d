use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    path, DirEntry, FileOpener, FileSystem, FsError, Metadata, OpenOptions, OpenOptionsConfig,
    ReadDir, Result, VirtualFile,
};

/// A [`FileSystem`] that exposes a sub-directory of another filesystem as
/// its root.
#[derive(Debug, Clone)]
pub struct ScopedFileSystem {
    root: String,
    inner: Arc<dyn FileSystem>,
}

impl ScopedFileSystem {
    pub fn new(root: impl AsRef<Path>, inner: Arc<dyn FileSystem>) -> Self {
        ScopedFileSystem {
            root: path::key(root.as_ref()),
            inner,
        }
    }

    /// The sub-directory of the inner filesystem, without a leading `/`.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn inner(&self) -> &Arc<dyn FileSystem> {
        &self.inner
    }

    fn prepare_path(&self, path: &Path) -> PathBuf {
        Path::new("/").join(path::scoped_key(&self.root, path))
    }

    fn strip_root(&self, path: &Path) -> Result<PathBuf> {
        let key = path::key(path);
        let relative = if self.root.is_empty() {
            Some(key.as_str())
        } else {
            key.strip_prefix(self.root.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        };

        relative
            .map(|relative| Path::new("/").join(relative))
            .ok_or(FsError::InvalidData)
    }
}

impl FileSystem for ScopedFileSystem {
    fn read_dir(&self, path: &Path) -> Result<ReadDir> {
        let path = self.prepare_path(path);

        let mut entries = Vec::new();
        for entry in self.inner.read_dir(&path)? {
            let entry = entry?;
            entries.push(DirEntry {
                path: self.strip_root(&entry.path)?,
                ..entry
            });
        }

        Ok(ReadDir::new(entries))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.inner.create_dir(&self.prepare_path(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.inner.create_dir_all(&self.prepare_path(path))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.inner.remove_dir(&self.prepare_path(path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.inner
            .rename(&self.prepare_path(from), &self.prepare_path(to))
    }

    fn metadata(&self, path: &Path) -> Result<Metadata> {
        self.inner.metadata(&self.prepare_path(path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.inner.remove_file(&self.prepare_path(path))
    }

    fn new_open_options(&self) -> OpenOptions<'_> {
        OpenOptions::new(self)
    }

    fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        self.inner.chmod(&self.prepare_path(path), mode)
    }
}

impl FileOpener for ScopedFileSystem {
    fn open(
        &self,
        path: &Path,
        conf: &OpenOptionsConfig,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        let path = self.prepare_path(path);
        self.inner
            .new_open_options()
            .options(conf.clone())
            .open(&path)
    }
}
