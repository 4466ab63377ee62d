use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use crate::{
    path, DirEntry, FileType, FsError, Metadata, OpenOptions, OpenOptionsConfig, ReadDir, Result,
    VirtualFile,
};

/// A [`FileSystem`](crate::FileSystem) backed by a directory of the host.
///
/// Paths are cleaned as if absolute and joined under `root`, so nothing
/// outside of it is reachable.
#[derive(Debug, Clone)]
pub struct FileSystem {
    root: PathBuf,
    /// Keeps a temporary root alive; it is deleted when the last clone is
    /// dropped.
    guard: Option<Arc<TempDir>>,
}

impl FileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(FsError::InvalidInput);
        }

        Ok(FileSystem {
            root: fs::canonicalize(root)?,
            guard: None,
        })
    }

    /// Roots a filesystem in a fresh directory under the system's temporary
    /// directory.
    pub fn temporary() -> Result<Self> {
        Self::from_temp_dir(tempfile::Builder::new().prefix("fixtures").tempdir()?)
    }

    /// Roots a filesystem in a fresh directory created inside `dir`.
    pub fn new_temp_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_temp_dir(
            tempfile::Builder::new()
                .prefix("fixtures")
                .tempdir_in(dir)?,
        )
    }

    fn from_temp_dir(dir: TempDir) -> Result<Self> {
        Ok(FileSystem {
            root: fs::canonicalize(dir.path())?,
            guard: Some(Arc::new(dir)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn prepare_path(&self, path: &Path) -> PathBuf {
        self.root.join(path::key(path))
    }
}

impl crate::FileSystem for FileSystem {
    fn read_dir(&self, path: &Path) -> Result<ReadDir> {
        let path = self.prepare_path(path);

        let mut data = fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                let path = entry
                    .path()
                    .strip_prefix(&self.root)
                    .map_err(|_| FsError::InvalidData)?
                    .to_owned();

                Ok(DirEntry {
                    path: Path::new("/").join(path),
                    metadata: Ok(entry.metadata()?.into()),
                })
            })
            .collect::<std::result::Result<Vec<DirEntry>, io::Error>>()?;
        data.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        Ok(ReadDir::new(data))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        if path::key(path).is_empty() {
            return Err(FsError::AlreadyExists);
        }

        fs::create_dir(self.prepare_path(path)).map_err(Into::into)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(self.prepare_path(path)).map_err(Into::into)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        if path::key(path).is_empty() {
            return Err(FsError::PermissionDenied);
        }
        let path = self.prepare_path(path);

        // DirectoryNotEmpty is not reported consistently across platforms.
        if path.is_dir() && fs::read_dir(&path)?.next().is_some() {
            return Err(FsError::DirectoryNotEmpty);
        }
        fs::remove_dir(path).map_err(Into::into)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if path::key(from).is_empty() || path::key(to).is_empty() {
            return Err(FsError::PermissionDenied);
        }

        let from = self.prepare_path(from);
        let to = self.prepare_path(to);
        if !from.exists() {
            return Err(FsError::EntryNotFound);
        }

        fs::rename(from, to).map_err(Into::into)
    }

    fn metadata(&self, path: &Path) -> Result<Metadata> {
        fs::metadata(self.prepare_path(path))
            .map(Into::into)
            .map_err(Into::into)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(self.prepare_path(path)).map_err(Into::into)
    }

    fn new_open_options(&self) -> OpenOptions<'_> {
        OpenOptions::new(self)
    }

    fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        let path = self.prepare_path(path);

        #[cfg(unix)]
        let permissions = {
            use std::os::unix::fs::PermissionsExt;
            fs::Permissions::from_mode(mode & 0o7777)
        };
        #[cfg(not(unix))]
        let permissions = {
            let mut permissions = fs::metadata(&path)?.permissions();
            permissions.set_readonly(mode & 0o222 == 0);
            permissions
        };

        fs::set_permissions(path, permissions).map_err(Into::into)
    }
}

impl From<fs::Metadata> for Metadata {
    fn from(metadata: fs::Metadata) -> Self {
        let filetype = metadata.file_type();

        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o7777
        };
        #[cfg(not(unix))]
        let mode = if metadata.permissions().readonly() {
            0o444
        } else {
            0o644
        };

        Metadata {
            ft: FileType {
                dir: filetype.is_dir(),
                file: filetype.is_file(),
                symlink: filetype.is_symlink(),
            },
            accessed: nanos_since_epoch(metadata.accessed()),
            created: nanos_since_epoch(metadata.created()),
            modified: nanos_since_epoch(metadata.modified()),
            len: metadata.len(),
            mode,
        }
    }
}

fn nanos_since_epoch(time: io::Result<SystemTime>) -> u64 {
    time.ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |time| time.as_nanos() as u64)
}

impl crate::FileOpener for FileSystem {
    fn open(
        &self,
        path: &Path,
        conf: &OpenOptionsConfig,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        let path = self.prepare_path(path);

        // std refuses `truncate` together with `append`; truncation wins.
        let append = conf.append() && !conf.truncate();

        let file = fs::OpenOptions::new()
            .read(conf.read())
            .write(conf.write())
            .create_new(conf.create_new())
            .create(conf.create())
            .append(append)
            .truncate(conf.truncate())
            .open(&path)?;

        Ok(Box::new(File::new(file, path)))
    }
}

/// A thin wrapper around `std::fs::File`
#[derive(Debug)]
pub struct File {
    inner: Option<fs::File>,
    pub host_path: PathBuf,
}

impl File {
    /// creates a new host file from a `std::fs::File` and a path
    pub fn new(file: fs::File, host_path: PathBuf) -> Self {
        Self {
            inner: Some(file),
            host_path,
        }
    }

    fn inner(&self) -> io::Result<&fs::File> {
        self.inner.as_ref().ok_or_else(|| self.closed())
    }

    fn inner_mut(&mut self) -> io::Result<&mut fs::File> {
        let closed = self.closed();
        self.inner.as_mut().ok_or(closed)
    }

    fn closed(&self) -> io::Error {
        io::Error::other(format!("`{}` is closed", self.host_path.display()))
    }

    fn metadata(&self) -> Option<fs::Metadata> {
        self.inner().ok()?.metadata().ok()
    }
}

impl VirtualFile for File {
    fn last_accessed(&self) -> u64 {
        self.metadata()
            .map_or(0, |metadata| nanos_since_epoch(metadata.accessed()))
    }

    fn last_modified(&self) -> u64 {
        self.metadata()
            .map_or(0, |metadata| nanos_since_epoch(metadata.modified()))
    }

    fn created_time(&self) -> u64 {
        self.metadata()
            .map_or(0, |metadata| nanos_since_epoch(metadata.created()))
    }

    fn size(&self) -> u64 {
        self.metadata().map_or(0, |metadata| metadata.len())
    }

    fn set_len(&mut self, new_size: u64) -> Result<()> {
        self.inner()?.set_len(new_size).map_err(Into::into)
    }

    fn unlink(&mut self) -> Result<()> {
        fs::remove_file(&self.host_path).map_err(Into::into)
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            tracing::trace!(?self.host_path, "Closing host file");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.inner.is_some()
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner_mut()?.read(buf)
    }
}

impl Write for File {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner_mut()?.flush()
    }
}

impl Seek for File {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.inner_mut()?.seek(pos)
    }
}
