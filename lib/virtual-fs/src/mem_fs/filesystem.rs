//! This module contains the [`FileSystem`] type itself.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use slab::Slab;
use tracing::trace;

use super::file::{File, FileHandle};
use super::*;
use crate::{
    path, DirEntry, FileType, FsError, Metadata, OpenOptions, OpenOptionsConfig, ReadDir, Result,
    VirtualFile,
};

/// The in-memory file system!
///
/// This `FileSystem` type can be cloned, it's a light copy of the
/// `FileSystemInner` (which is behind an `Arc` + `RwLock`).
#[derive(Clone, Default)]
pub struct FileSystem {
    pub(super) inner: Arc<RwLock<FileSystemInner>>,
}

impl FileSystem {
    fn new_file(&self, inode_of_parent: Inode, name: String) -> Result<Inode> {
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        let time = time();
        let inode = fs.storage.insert(Node::File(FileNode {
            name,
            file: File::default(),
            metadata: Metadata {
                ft: FileType::new_file(),
                accessed: time,
                created: time,
                modified: time,
                len: 0,
                mode: DEFAULT_FILE_MODE,
            },
        }));
        fs.add_child_to_node(inode_of_parent, inode)?;
        Ok(inode)
    }
}

impl crate::FileSystem for FileSystem {
    fn read_dir(&self, path: &Path) -> Result<ReadDir> {
        let key = path::key(path);
        let guard = self.inner.read().map_err(|_| FsError::Lock)?;
        let inode = guard.inode_of(&key)?;

        let mut children: Vec<DirEntry> = match guard.storage.get(inode) {
            Some(Node::Directory(DirectoryNode { children, .. })) => children
                .iter()
                .filter_map(|inode| guard.storage.get(*inode))
                .map(|node| DirEntry {
                    path: Path::new("/").join(&key).join(node.name()),
                    metadata: Ok(*node.metadata()),
                })
                .collect(),
            _ => return Err(FsError::NotADirectory),
        };
        children.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ReadDir::new(children))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        let key = path::key(path);
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        if key.is_empty() {
            return Err(FsError::AlreadyExists);
        }

        let (inode_of_parent, name) = fs.parent_and_name(&key)?;
        if fs.child_of(inode_of_parent, name).is_some() {
            return Err(FsError::AlreadyExists);
        }

        fs.new_directory(inode_of_parent, name.to_string())?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let key = path::key(path);
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;

        let mut inode = ROOT_INODE;
        for name in key.split('/').filter(|name| !name.is_empty()) {
            inode = match fs.child_of(inode, name) {
                Some(child) => match fs.storage.get(child) {
                    Some(Node::Directory(_)) => child,
                    _ => return Err(FsError::NotADirectory),
                },
                None => fs.new_directory(inode, name.to_string())?,
            };
        }

        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let key = path::key(path);
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        if key.is_empty() {
            return Err(FsError::PermissionDenied);
        }

        let inode = fs.inode_of(&key)?;
        match fs.storage.get(inode) {
            Some(Node::Directory(DirectoryNode { children, .. })) if children.is_empty() => {}
            Some(Node::Directory(_)) => return Err(FsError::DirectoryNotEmpty),
            _ => return Err(FsError::NotADirectory),
        }

        fs.remove_inode(inode)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from_key = path::key(from);
        let to_key = path::key(to);
        if from_key.is_empty() || to_key.is_empty() {
            return Err(FsError::PermissionDenied);
        }
        if from_key == to_key {
            return Ok(());
        }
        if to_key.starts_with(&format!("{from_key}/")) {
            return Err(FsError::InvalidInput);
        }

        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        let inode = fs.inode_of(&from_key)?;
        let (inode_of_from_parent, _) = fs.parent_and_name(&from_key)?;
        let (inode_of_to_parent, name_of_to) = fs.parent_and_name(&to_key)?;

        if let Some(existing) = fs.child_of(inode_of_to_parent, name_of_to) {
            // Only a file may replace another file.
            let replaceable = matches!(
                (fs.storage.get(inode), fs.storage.get(existing)),
                (Some(Node::File(_)), Some(Node::File(_)))
            );
            if !replaceable {
                return Err(FsError::AlreadyExists);
            }
            fs.remove_inode(existing)?;
        }

        fs.remove_child_from_node(inode_of_from_parent, inode)?;
        let name_of_to = name_of_to.to_string();
        if let Some(node) = fs.storage.get_mut(inode) {
            node.set_name(name_of_to);
            node.metadata_mut().modified = time();
        }
        fs.add_child_to_node(inode_of_to_parent, inode)?;

        trace!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }

    fn metadata(&self, path: &Path) -> Result<Metadata> {
        let key = path::key(path);
        let guard = self.inner.read().map_err(|_| FsError::Lock)?;
        let inode = guard.inode_of(&key)?;

        guard
            .storage
            .get(inode)
            .map(|node| *node.metadata())
            .ok_or(FsError::EntryNotFound)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let key = path::key(path);
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        let inode = fs.inode_of(&key)?;

        if !matches!(fs.storage.get(inode), Some(Node::File(_))) {
            return Err(FsError::NotAFile);
        }
        fs.remove_inode(inode)
    }

    fn new_open_options(&self) -> OpenOptions<'_> {
        OpenOptions::new(self)
    }

    fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        let key = path::key(path);
        let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
        let inode = fs.inode_of(&key)?;

        let node = fs.storage.get_mut(inode).ok_or(FsError::EntryNotFound)?;
        node.metadata_mut().mode = mode & 0o7777;
        Ok(())
    }
}

impl crate::FileOpener for FileSystem {
    fn open(
        &self,
        path: &Path,
        conf: &OpenOptionsConfig,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        let read = conf.read();
        let write = conf.write();
        let append = conf.append();
        let create_new = conf.create_new();
        // `create_new` makes `create` and `truncate` irrelevant.
        let create = conf.create() && !create_new;
        let truncate = conf.truncate() && !create_new;

        // To truncate a file, `write` must be used.
        if truncate && !write {
            return Err(FsError::PermissionDenied);
        }

        let key = path::key(path);
        let (inode_of_parent, name, existing) = {
            let fs = self.inner.read().map_err(|_| FsError::Lock)?;
            if key.is_empty() {
                return Err(FsError::NotAFile);
            }
            let (inode_of_parent, name) = fs.parent_and_name(&key)?;
            let existing = fs.child_of(inode_of_parent, name);
            (inode_of_parent, name.to_string(), existing)
        };

        let inode = match existing {
            Some(_) if create_new => return Err(FsError::AlreadyExists),
            Some(inode) => {
                let mut fs = self.inner.write().map_err(|_| FsError::Lock)?;
                match fs.storage.get_mut(inode) {
                    Some(Node::File(FileNode { file, metadata, .. })) => {
                        metadata.accessed = time();
                        if truncate {
                            file.truncate();
                            metadata.len = 0;
                        }
                    }
                    _ => return Err(FsError::NotAFile),
                }
                inode
            }
            None if create || create_new => {
                if !(write || append) {
                    return Err(FsError::PermissionDenied);
                }
                self.new_file(inode_of_parent, name)?
            }
            None => return Err(FsError::EntryNotFound),
        };

        Ok(Box::new(FileHandle::new(
            inode,
            self.clone(),
            read,
            write || append,
            append,
        )))
    }
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.read().map_err(|_| fmt::Error)?;
        let fs: &FileSystemInner = &guard;
        fs.fmt(formatter)
    }
}

/// The core of the file system. It contains a collection of `Node`s,
/// indexed by their respective `Inode` in a slab.
pub(super) struct FileSystemInner {
    pub(super) storage: Slab<Node>,
}

impl FileSystemInner {
    /// Get the inode associated to a lookup key if it exists.
    pub(super) fn inode_of(&self, key: &str) -> Result<Inode> {
        let mut inode = ROOT_INODE;

        for name in key.split('/').filter(|name| !name.is_empty()) {
            if !matches!(self.storage.get(inode), Some(Node::Directory(_))) {
                return Err(FsError::NotADirectory);
            }
            inode = self.child_of(inode, name).ok_or(FsError::EntryNotFound)?;
        }

        Ok(inode)
    }

    /// Splits `key` into the inode of its parent directory and its base
    /// name.
    pub(super) fn parent_and_name<'k>(&self, key: &'k str) -> Result<(Inode, &'k str)> {
        let (parent, name) = path::split(key);
        if name.is_empty() {
            return Err(FsError::InvalidInput);
        }

        let inode_of_parent = self.inode_of(parent)?;
        match self.storage.get(inode_of_parent) {
            Some(Node::Directory(_)) => Ok((inode_of_parent, name)),
            _ => Err(FsError::NotADirectory),
        }
    }

    pub(super) fn child_of(&self, inode_of_parent: Inode, name: &str) -> Option<Inode> {
        match self.storage.get(inode_of_parent) {
            Some(Node::Directory(DirectoryNode { children, .. })) => children
                .iter()
                .copied()
                .find(|inode| self.storage.get(*inode).map(Node::name) == Some(name)),
            _ => None,
        }
    }

    pub(super) fn new_directory(&mut self, inode_of_parent: Inode, name: String) -> Result<Inode> {
        let time = time();
        let inode = self.storage.insert(Node::Directory(DirectoryNode {
            name,
            children: Vec::new(),
            metadata: Metadata {
                ft: FileType::new_dir(),
                accessed: time,
                created: time,
                modified: time,
                len: 0,
                mode: DEFAULT_DIR_MODE,
            },
        }));
        self.add_child_to_node(inode_of_parent, inode)?;
        Ok(inode)
    }

    /// Add a new child to a directory node.
    pub(super) fn add_child_to_node(&mut self, inode: Inode, new_child: Inode) -> Result<()> {
        match self.storage.get_mut(inode) {
            Some(Node::Directory(DirectoryNode {
                children, metadata, ..
            })) => {
                children.push(new_child);
                metadata.modified = time();
                Ok(())
            }
            _ => Err(FsError::NotADirectory),
        }
    }

    /// Remove a child from a directory node.
    pub(super) fn remove_child_from_node(&mut self, inode: Inode, child: Inode) -> Result<()> {
        match self.storage.get_mut(inode) {
            Some(Node::Directory(DirectoryNode {
                children, metadata, ..
            })) => {
                children.retain(|inode| *inode != child);
                metadata.modified = time();
                Ok(())
            }
            _ => Err(FsError::NotADirectory),
        }
    }

    /// Detaches `inode` from its parent directory and frees it.
    pub(super) fn remove_inode(&mut self, inode: Inode) -> Result<()> {
        let parent = self
            .storage
            .iter()
            .find_map(|(parent, node)| match node {
                Node::Directory(DirectoryNode { children, .. }) if children.contains(&inode) => {
                    Some(parent)
                }
                _ => None,
            })
            .ok_or(FsError::EntryNotFound)?;

        self.remove_child_from_node(parent, inode)?;
        self.storage.remove(inode);
        Ok(())
    }
}

impl fmt::Debug for FileSystemInner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "\n{ty:<4}    name", ty = "type")?;

        fn debug(
            nodes: &[&Node],
            slf: &FileSystemInner,
            formatter: &mut fmt::Formatter<'_>,
            indentation: usize,
        ) -> fmt::Result {
            for node in nodes {
                let ty = match node {
                    Node::File(_) => "file",
                    Node::Directory(_) => "dir",
                };
                writeln!(
                    formatter,
                    "{ty:<4}    {indentation_symbol:indentation_width$}{name}",
                    name = node.name(),
                    indentation_symbol = " ",
                    indentation_width = indentation * 2 + 1,
                )?;

                if let Node::Directory(DirectoryNode { children, .. }) = node {
                    let children: Vec<&Node> = children
                        .iter()
                        .filter_map(|inode| slf.storage.get(*inode))
                        .collect();
                    debug(&children, slf, formatter, indentation + 1)?;
                }
            }

            Ok(())
        }

        match self.storage.get(ROOT_INODE) {
            Some(root) => debug(&[root], self, formatter, 0),
            None => Ok(()),
        }
    }
}

impl Default for FileSystemInner {
    fn default() -> Self {
        let time = time();

        let mut slab = Slab::new();
        slab.insert(Node::Directory(DirectoryNode {
            name: "/".to_string(),
            children: Vec::new(),
            metadata: Metadata {
                ft: FileType::new_dir(),
                accessed: time,
                created: time,
                modified: time,
                len: 0,
                mode: DEFAULT_DIR_MODE,
            },
        }));

        Self { storage: slab }
    }
}
