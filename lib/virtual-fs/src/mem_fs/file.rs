//! `FileHandle` and `File` are private; only `FileHandle` escapes, as a
//! `VirtualFile` trait object.

use std::fmt;
use std::io::{self, Read, Seek, Write};

use super::{time, FileNode, FileSystem, Inode, Node};
use crate::{FsError, Result, VirtualFile};

/// A handle on a file of the in-memory filesystem.
///
/// It holds the inode, the open flags and a light clone of the
/// filesystem. Every operation checks the flags, then looks the inode up
/// again, so a handle on an unlinked file fails with `EntryNotFound`.
pub(super) struct FileHandle {
    inode: Inode,
    filesystem: FileSystem,
    readable: bool,
    writable: bool,
    append_mode: bool,
    cursor: u64,
    closed: bool,
}

impl FileHandle {
    pub(super) fn new(
        inode: Inode,
        filesystem: FileSystem,
        readable: bool,
        writable: bool,
        append_mode: bool,
    ) -> Self {
        Self {
            inode,
            filesystem,
            readable,
            writable,
            append_mode,
            cursor: 0,
            closed: false,
        }
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other(format!(
                "the file (inode `{}`) is closed",
                self.inode
            )));
        }
        Ok(())
    }

    fn with_node<T>(&self, f: impl FnOnce(&FileNode) -> T) -> Result<T> {
        let fs = self.filesystem.inner.read().map_err(|_| FsError::Lock)?;
        match fs.storage.get(self.inode) {
            Some(Node::File(node)) => Ok(f(node)),
            _ => Err(FsError::EntryNotFound),
        }
    }

    fn with_node_mut<T>(&self, f: impl FnOnce(&mut FileNode) -> T) -> Result<T> {
        let mut fs = self.filesystem.inner.write().map_err(|_| FsError::Lock)?;
        match fs.storage.get_mut(self.inode) {
            Some(Node::File(node)) => Ok(f(node)),
            _ => Err(FsError::EntryNotFound),
        }
    }
}

impl VirtualFile for FileHandle {
    fn last_accessed(&self) -> u64 {
        self.with_node(|node| node.metadata.accessed)
            .unwrap_or_default()
    }

    fn last_modified(&self) -> u64 {
        self.with_node(|node| node.metadata.modified)
            .unwrap_or_default()
    }

    fn created_time(&self) -> u64 {
        self.with_node(|node| node.metadata.created)
            .unwrap_or_default()
    }

    fn size(&self) -> u64 {
        self.with_node(|node| node.file.len() as u64)
            .unwrap_or_default()
    }

    fn set_len(&mut self, new_size: u64) -> Result<()> {
        if !self.writable {
            return Err(FsError::PermissionDenied);
        }

        let new_size = usize::try_from(new_size).map_err(|_| FsError::InvalidInput)?;
        self.with_node_mut(|node| {
            node.file.resize(new_size);
            node.metadata.len = new_size as u64;
            node.metadata.modified = time();
        })
    }

    fn unlink(&mut self) -> Result<()> {
        let mut fs = self.filesystem.inner.write().map_err(|_| FsError::Lock)?;
        if !matches!(fs.storage.get(self.inode), Some(Node::File(_))) {
            return Err(FsError::EntryNotFound);
        }
        fs.remove_inode(self.inode)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        if !self.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "the file (inode `{}`) doesn't have the `read` permission",
                    self.inode
                ),
            ));
        }

        let cursor = &mut self.cursor;
        let fs = self.filesystem.inner.read().map_err(|_| FsError::Lock)?;
        match fs.storage.get(self.inode) {
            Some(Node::File(FileNode { file, .. })) => Ok(file.read(buf, cursor)),
            _ => Err(FsError::EntryNotFound.into()),
        }
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, position: io::SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;

        let len = self.with_node(|node| node.file.len() as u64)?;
        let next = match position {
            io::SeekFrom::Start(offset) => i128::from(offset),
            io::SeekFrom::Current(offset) => i128::from(self.cursor) + i128::from(offset),
            io::SeekFrom::End(offset) => i128::from(len) + i128::from(offset),
        };

        self.cursor = u64::try_from(next).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "seeking before the byte 0")
        })?;
        Ok(self.cursor)
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_open()?;
        if !self.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "the file (inode `{}`) doesn't have the `write` permission",
                    self.inode
                ),
            ));
        }

        let append_mode = self.append_mode;
        let cursor = &mut self.cursor;
        let mut fs = self.filesystem.inner.write().map_err(|_| FsError::Lock)?;
        match fs.storage.get_mut(self.inode) {
            Some(Node::File(FileNode { file, metadata, .. })) => {
                if append_mode {
                    *cursor = file.len() as u64;
                }
                let written = file.write(buf, cursor)?;
                metadata.len = file.len() as u64;
                metadata.modified = time();
                Ok(written)
            }
            _ => Err(FsError::EntryNotFound.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FileHandle")
            .field("inode", &self.inode)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("append_mode", &self.append_mode)
            .field("cursor", &self.cursor)
            .field("closed", &self.closed)
            .finish()
    }
}

/// The contents of a file: a plain growable buffer.
#[derive(Debug, Default)]
pub(super) struct File {
    buffer: Vec<u8>,
}

impl File {
    pub(super) fn truncate(&mut self) {
        self.buffer.clear();
    }

    pub(super) fn resize(&mut self, new_size: usize) {
        self.buffer.resize(new_size, 0);
    }

    pub(super) fn len(&self) -> usize {
        self.buffer.len()
    }

    fn read(&self, buf: &mut [u8], cursor: &mut u64) -> usize {
        let start = usize::try_from(*cursor)
            .unwrap_or(usize::MAX)
            .min(self.buffer.len());
        let remaining = &self.buffer[start..];
        let read = remaining.len().min(buf.len());

        buf[..read].copy_from_slice(&remaining[..read]);
        *cursor += read as u64;
        read
    }

    /// Overwrites the buffer at `cursor`, zero-filling any gap between the
    /// end of the buffer and the cursor.
    fn write(&mut self, buf: &[u8], cursor: &mut u64) -> io::Result<usize> {
        let start = usize::try_from(*cursor).map_err(|_| FsError::InvalidInput)?;
        let end = start.checked_add(buf.len()).ok_or(FsError::InvalidInput)?;

        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[start..end].copy_from_slice(buf);

        *cursor = end as u64;
        Ok(buf.len())
    }
}

#[cfg(test)]
mod test_file {
    use std::io::{Read, Seek, SeekFrom, Write};
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use crate::{mem_fs::FileSystem, FileSystem as _, FsError};

    macro_rules! path {
        ($path:expr) => {
            Path::new($path)
        };
    }

    #[test]
    fn test_writing_at_various_positions() {
        let fs = FileSystem::default();
        let mut file = fs
            .new_open_options()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path!("/foo.txt"))
            .unwrap();

        file.write_all(b"foobar").unwrap();
        file.seek(SeekFrom::Start(3)).unwrap();
        file.write_all(b"BAZ").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "fooBAZ");
        assert_eq!(file.size(), 6);
    }

    #[test]
    fn test_writing_past_the_end_zero_fills() {
        let fs = FileSystem::default();
        let mut file = fs.create(path!("/gap.bin")).unwrap();

        file.write_all(b"ab").unwrap();
        file.seek(SeekFrom::End(2)).unwrap();
        file.write_all(b"cd").unwrap();
        file.close().unwrap();

        let mut contents = Vec::new();
        fs.open(path!("/gap.bin"))
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"ab\0\0cd");
        assert_eq!(fs.metadata(path!("/gap.bin")).unwrap().len(), 6);
    }

    #[test]
    fn test_append_mode_writes_at_the_end() {
        let fs = FileSystem::default();
        let mut file = fs.create(path!("/log")).unwrap();
        file.write_all(b"one\n").unwrap();

        let mut file = fs
            .new_open_options()
            .append(true)
            .open(path!("/log"))
            .unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.write_all(b"two\n").unwrap();

        let mut contents = String::new();
        fs.open(path!("/log"))
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }

    #[test]
    fn test_permissions_follow_open_flags() {
        let fs = FileSystem::default();
        let mut file = fs.create(path!("/write-only")).unwrap();

        let mut buf = [0; 1];
        let error = file.read(&mut buf).unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::PermissionDenied);

        let mut file = fs.open(path!("/write-only")).unwrap();
        let error = file.write(b"x").unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::PermissionDenied);
        assert_eq!(file.set_len(10), Err(FsError::PermissionDenied));
    }

    #[test]
    fn test_set_len_and_unlink() {
        let fs = FileSystem::default();
        let mut file = fs.create(path!("/file")).unwrap();
        file.write_all(b"hello").unwrap();

        file.set_len(2).unwrap();
        assert_eq!(file.size(), 2);
        file.set_len(4).unwrap();
        assert_eq!(fs.metadata(path!("/file")).unwrap().len(), 4);

        file.unlink().unwrap();
        assert_eq!(
            fs.metadata(path!("/file")),
            Err(FsError::EntryNotFound),
            "the file is gone",
        );
        assert_eq!(file.unlink(), Err(FsError::EntryNotFound));
    }

    #[test]
    fn test_seek_rules() {
        let fs = FileSystem::default();
        let mut file = fs.create(path!("/file")).unwrap();
        file.write_all(b"0123456789").unwrap();

        assert_eq!(file.seek(SeekFrom::End(-3)).unwrap(), 7);
        assert_eq!(file.seek(SeekFrom::Current(-7)).unwrap(), 0);
        assert_eq!(
            file.seek(SeekFrom::Current(-1)).unwrap_err().kind(),
            std::io::ErrorKind::InvalidInput
        );
        assert_eq!(file.seek(SeekFrom::Start(20)).unwrap(), 20);

        file.close().unwrap();
        assert!(file.seek(SeekFrom::Start(0)).is_err());
    }
}
