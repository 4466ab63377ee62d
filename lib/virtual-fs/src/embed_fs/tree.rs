use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::{path, FileType, FsError, Metadata, Result};

/// Permission bits reported for embedded files.
pub const FILE_MODE: u32 = 0o444;
/// Permission bits reported for embedded directories.
pub const DIR_MODE: u32 = 0o555;

/// A blob compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedFile {
    path: &'static str,
    contents: &'static [u8],
}

impl EmbeddedFile {
    pub const fn new(path: &'static str, contents: &'static [u8]) -> Self {
        EmbeddedFile { path, contents }
    }

    /// The path of the blob, relative to the root of the tree.
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn contents(&self) -> &'static [u8] {
        self.contents
    }

    pub fn len(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub(crate) fn metadata(&self) -> Metadata {
        Metadata {
            ft: FileType::new_file(),
            len: self.len(),
            mode: FILE_MODE,
            ..Default::default()
        }
    }
}

/// What a lookup key resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(EmbeddedFile),
    Directory(&'a BTreeSet<String>),
}

impl Node<'_> {
    pub fn metadata(&self) -> Metadata {
        match self {
            Node::File(file) => file.metadata(),
            Node::Directory(_) => Metadata {
                ft: FileType::new_dir(),
                mode: DIR_MODE,
                ..Default::default()
            },
        }
    }
}

/// Index over an immutable table of [`EmbeddedFile`]s.
///
/// Every proper ancestor of a blob is recorded as a directory. The root of
/// the tree is never a directory node, so a tree whose blobs all live at
/// the top level has no directories at all.
#[derive(Debug, Default)]
pub struct EmbeddedTree {
    files: BTreeMap<String, EmbeddedFile>,
    directories: BTreeMap<String, BTreeSet<String>>,
}

impl EmbeddedTree {
    pub fn new(table: &'static [EmbeddedFile]) -> Self {
        let mut tree = EmbeddedTree::default();

        for file in table {
            let key = path::key(Path::new(file.path()));
            if key.is_empty() {
                continue;
            }

            let mut child = key.as_str();
            loop {
                let (parent, name) = path::split(child);
                if parent.is_empty() {
                    break;
                }
                tree.directories
                    .entry(parent.to_string())
                    .or_default()
                    .insert(name.to_string());
                child = parent;
            }

            tree.files.insert(key, *file);
        }

        tree
    }

    /// Looks up an already normalized key.
    pub fn resolve(&self, key: &str) -> Result<Node<'_>> {
        if let Some(file) = self.files.get(key) {
            return Ok(Node::File(*file));
        }

        self.directories
            .get(key)
            .map(Node::Directory)
            .ok_or(FsError::EntryNotFound)
    }

    /// The immediate children of the directory at `key`, sorted by name.
    pub fn read_dir(&self, key: &str) -> Result<Vec<(&str, Metadata)>> {
        let children = match self.resolve(key)? {
            Node::File(_) => return Err(FsError::NotADirectory),
            Node::Directory(children) => children,
        };

        children
            .iter()
            .map(|name| {
                let child = if key.is_empty() {
                    name.clone()
                } else {
                    format!("{key}/{name}")
                };
                let metadata = self.resolve(&child)?.metadata();
                Ok((name.as_str(), metadata))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
