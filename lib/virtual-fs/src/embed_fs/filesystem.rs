use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use super::file::FileHandle;
use super::tree::{EmbeddedFile, EmbeddedTree, Node};
use crate::{
    path, DirEntry, FileOpener, FileSystem, FsError, Metadata, OpenOptions, OpenOptionsConfig,
    ReadDir, Result, VirtualFile,
};

/// A read-only [`FileSystem`] over blobs compiled into the binary.
///
/// Every path is resolved inside `scope`, so an instance scoped to `data`
/// serves `data/foo.txt` as `foo.txt` and `..` never leaves the scope.
/// Clones share the underlying [`EmbeddedTree`].
#[derive(Debug, Clone)]
pub struct EmbeddedFileSystem {
    tree: Arc<EmbeddedTree>,
    scope: String,
}

impl EmbeddedFileSystem {
    pub fn new(files: &'static [EmbeddedFile]) -> Self {
        EmbeddedFileSystem::from_tree(Arc::new(EmbeddedTree::new(files)))
    }

    pub fn from_tree(tree: Arc<EmbeddedTree>) -> Self {
        EmbeddedFileSystem {
            tree,
            scope: String::new(),
        }
    }

    /// Returns a view of the same tree rooted at `scope`, which is itself
    /// resolved relative to the current scope.
    pub fn with_scope(&self, scope: impl AsRef<Path>) -> Self {
        EmbeddedFileSystem {
            tree: Arc::clone(&self.tree),
            scope: path::scoped_key(&self.scope, scope.as_ref()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn resolve(&self, path: &Path) -> Result<Node<'_>> {
        let key = path::scoped_key(&self.scope, path);
        self.tree.resolve(&key).inspect_err(|_| {
            trace!(path = %path.display(), %key, "embedded entry not found");
        })
    }

    fn reject(&self, operation: &'static str, path: &Path) -> Result<()> {
        trace!(
            operation,
            path = %path.display(),
            "rejecting mutation of the embedded filesystem"
        );
        Err(FsError::ReadOnlyFilesystem)
    }
}

impl FileSystem for EmbeddedFileSystem {
    fn read_dir(&self, path: &Path) -> Result<ReadDir> {
        let key = path::scoped_key(&self.scope, path);
        let base = PathBuf::from(path::clean(&path.to_string_lossy()));

        let entries = self
            .tree
            .read_dir(&key)?
            .into_iter()
            .map(|(name, metadata)| DirEntry {
                path: base.join(name),
                metadata: Ok(metadata),
            })
            .collect();

        Ok(ReadDir::new(entries))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.reject("create_dir", path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.reject("create_dir_all", path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.reject("remove_dir", path)
    }

    fn rename(&self, from: &Path, _to: &Path) -> Result<()> {
        self.reject("rename", from)
    }

    fn metadata(&self, path: &Path) -> Result<Metadata> {
        Ok(self.resolve(path)?.metadata())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.reject("remove_file", path)
    }

    fn new_open_options(&self) -> OpenOptions<'_> {
        OpenOptions::new(self)
    }

    fn chmod(&self, path: &Path, _mode: u32) -> Result<()> {
        self.reject("chmod", path)
    }
}

impl FileOpener for EmbeddedFileSystem {
    fn open(
        &self,
        path: &Path,
        conf: &OpenOptionsConfig,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        if conf.would_mutate() {
            self.reject("open", path)?;
        }

        match self.resolve(path)? {
            Node::File(file) => Ok(Box::new(FileHandle::new(file))),
            Node::Directory(_) => Err(FsError::NotAFile),
        }
    }
}
