use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::{EmbeddedFile, FsError, Result, VirtualFile};

/// A read-only cursor over one embedded blob.
#[derive(Debug)]
pub struct FileHandle {
    file: EmbeddedFile,
    cursor: u64,
    closed: bool,
}

impl FileHandle {
    pub(crate) fn new(file: EmbeddedFile) -> Self {
        FileHandle {
            file,
            cursor: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &'static str {
        self.file.path()
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other(format!(
                "embedded file `{}` is closed",
                self.file.path()
            )));
        }
        Ok(())
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;

        let contents = self.file.contents();
        let start = usize::try_from(self.cursor)
            .unwrap_or(usize::MAX)
            .min(contents.len());
        let remaining = &contents[start..];
        let read = remaining.len().min(buf.len());

        buf[..read].copy_from_slice(&remaining[..read]);
        self.cursor += read as u64;
        Ok(read)
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;

        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => i128::from(self.cursor) + i128::from(offset),
            SeekFrom::End(offset) => i128::from(self.file.len()) + i128::from(offset),
        };

        self.cursor = u64::try_from(target).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        Ok(self.cursor)
    }
}

impl Write for FileHandle {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(FsError::ReadOnlyFilesystem.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl VirtualFile for FileHandle {
    fn size(&self) -> u64 {
        self.file.len()
    }

    fn set_len(&mut self, _new_size: u64) -> Result<()> {
        Err(FsError::ReadOnlyFilesystem)
    }

    fn unlink(&mut self) -> Result<()> {
        Err(FsError::ReadOnlyFilesystem)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed
    }
}
