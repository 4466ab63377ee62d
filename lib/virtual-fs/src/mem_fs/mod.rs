//! An in-memory [`FileSystem`](crate::FileSystem).
//!
//! Nodes live in a [`slab::Slab`] and refer to each other by inode. The
//! whole tree sits behind one `RwLock`, and clones of a [`FileSystem`]
//! share it.

mod file;
mod filesystem;

use std::time::{SystemTime, UNIX_EPOCH};

pub use filesystem::FileSystem;

use crate::Metadata;
use file::File;

type Inode = usize;
const ROOT_INODE: Inode = 0;

/// Permission bits of new files.
const DEFAULT_FILE_MODE: u32 = 0o644;
/// Permission bits of new directories.
const DEFAULT_DIR_MODE: u32 = 0o755;

#[derive(Debug)]
struct FileNode {
    name: String,
    file: File,
    metadata: Metadata,
}

#[derive(Debug)]
struct DirectoryNode {
    name: String,
    children: Vec<Inode>,
    metadata: Metadata,
}

#[derive(Debug)]
enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}

impl Node {
    fn name(&self) -> &str {
        match self {
            Self::File(FileNode { name, .. }) => name,
            Self::Directory(DirectoryNode { name, .. }) => name,
        }
    }

    fn metadata(&self) -> &Metadata {
        match self {
            Self::File(FileNode { metadata, .. }) => metadata,
            Self::Directory(DirectoryNode { metadata, .. }) => metadata,
        }
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Self::File(FileNode { metadata, .. }) => metadata,
            Self::Directory(DirectoryNode { metadata, .. }) => metadata,
        }
    }

    fn set_name(&mut self, new_name: String) {
        match self {
            Self::File(FileNode { name, .. }) => *name = new_name,
            Self::Directory(DirectoryNode { name, .. }) => *name = new_name,
        }
    }
}

fn time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
