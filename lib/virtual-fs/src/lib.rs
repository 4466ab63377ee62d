use std::ffi::OsString;
use std::fmt;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod embed_fs;
pub mod host_fs;
pub mod mem_fs;
pub mod path;
mod scoped_fs;

pub use embed_fs::{EmbeddedFile, EmbeddedFileSystem, EmbeddedTree};
pub use scoped_fs::ScopedFileSystem;

pub type Result<T> = std::result::Result<T, FsError>;

/// The filesystem contract shared by every backend.
///
/// Callers should only ever depend on this trait (usually through
/// `Arc<dyn FileSystem>`), so that the embedded, in-memory and host
/// implementations can be swapped without touching the calling code.
pub trait FileSystem: fmt::Debug + Send + Sync + 'static {
    /// Lists the immediate children of a directory.
    fn read_dir(&self, path: &Path) -> Result<ReadDir>;
    fn create_dir(&self, path: &Path) -> Result<()>;
    /// Creates a directory and all of its missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn metadata(&self, path: &Path) -> Result<Metadata>;
    fn remove_file(&self, path: &Path) -> Result<()>;

    fn new_open_options(&self) -> OpenOptions<'_>;

    /// Changes the permission bits of a file.
    ///
    /// Backends without a notion of permissions keep this default, which
    /// reports [`FsError::Unsupported`] so callers can skip the change.
    fn chmod(&self, _path: &Path, _mode: u32) -> Result<()> {
        Err(FsError::Unsupported)
    }

    /// Joins and cleans path segments, see [`path::join`].
    fn join(&self, segments: &[&str]) -> PathBuf {
        PathBuf::from(path::join(segments))
    }

    /// Like [`FileSystem::metadata`], but also carries the cleaned path so
    /// the base name of the entry is available.
    fn stat(&self, path: &Path) -> Result<DirEntry> {
        let metadata = self.metadata(path)?;
        Ok(DirEntry {
            path: PathBuf::from(path::clean(&path.to_string_lossy())),
            metadata: Ok(metadata),
        })
    }

    /// Opens a file for reading.
    fn open(&self, path: &Path) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        self.new_open_options().read(true).open(path)
    }

    /// Creates a file for writing, truncating it if it already exists.
    fn create(&self, path: &Path) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        self.new_open_options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }
}

pub trait FileOpener {
    fn open(
        &self,
        path: &Path,
        conf: &OpenOptionsConfig,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>>;
}

#[derive(Debug, Clone, Default)]
pub struct OpenOptionsConfig {
    read: bool,
    write: bool,
    create_new: bool,
    create: bool,
    append: bool,
    truncate: bool,
}

impl OpenOptionsConfig {
    pub const fn read(&self) -> bool {
        self.read
    }

    pub const fn write(&self) -> bool {
        self.write
    }

    pub const fn create_new(&self) -> bool {
        self.create_new
    }

    pub const fn create(&self) -> bool {
        self.create
    }

    pub const fn append(&self) -> bool {
        self.append
    }

    pub const fn truncate(&self) -> bool {
        self.truncate
    }

    /// Whether opening with this configuration could modify the filesystem.
    pub const fn would_mutate(&self) -> bool {
        self.write || self.append || self.truncate || self.create || self.create_new
    }
}

pub struct OpenOptions<'a> {
    opener: &'a dyn FileOpener,
    conf: OpenOptionsConfig,
}

impl<'a> OpenOptions<'a> {
    pub fn new(opener: &'a dyn FileOpener) -> Self {
        Self {
            opener,
            conf: OpenOptionsConfig::default(),
        }
    }

    pub fn options(&mut self, options: OpenOptionsConfig) -> &mut Self {
        self.conf = options;
        self
    }

    pub fn read(&mut self, read: bool) -> &mut Self {
        self.conf.read = read;
        self
    }

    pub fn write(&mut self, write: bool) -> &mut Self {
        self.conf.write = write;
        self
    }

    pub fn append(&mut self, append: bool) -> &mut Self {
        self.conf.append = append;
        self
    }

    pub fn truncate(&mut self, truncate: bool) -> &mut Self {
        self.conf.truncate = truncate;
        self
    }

    pub fn create(&mut self, create: bool) -> &mut Self {
        self.conf.create = create;
        self
    }

    pub fn create_new(&mut self, create_new: bool) -> &mut Self {
        self.conf.create_new = create_new;
        self
    }

    pub fn open<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Box<dyn VirtualFile + Send + Sync + 'static>> {
        self.opener.open(path.as_ref(), &self.conf)
    }
}

impl fmt::Debug for OpenOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("conf", &self.conf)
            .finish_non_exhaustive()
    }
}

/// An open file. Dropping the handle releases it; [`VirtualFile::close`]
/// does the same explicitly and can report a failure.
pub trait VirtualFile: fmt::Debug + Write + Read + Seek {
    /// the last time the file was accessed in nanoseconds as a UNIX timestamp
    fn last_accessed(&self) -> u64 {
        0
    }

    /// the last time the file was modified in nanoseconds as a UNIX timestamp
    fn last_modified(&self) -> u64 {
        0
    }

    /// the time at which the file was created in nanoseconds as a UNIX timestamp
    fn created_time(&self) -> u64 {
        0
    }

    /// the size of the file in bytes
    fn size(&self) -> u64;

    /// Change the size of the file, if the `new_size` is greater than the current size
    /// the extra bytes will be allocated and zeroed
    fn set_len(&mut self, new_size: u64) -> Result<()>;

    /// Request deletion of the file
    fn unlink(&mut self) -> Result<()>;

    /// Closes the handle. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Indicates if the file is opened or closed.
    fn is_open(&self) -> bool;
}

#[derive(Debug)]
pub struct ReadDir {
    data: Vec<DirEntry>,
    index: usize,
}

impl ReadDir {
    pub fn new(data: Vec<DirEntry>) -> Self {
        Self { data, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for ReadDir {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Result<DirEntry>> {
        if let Some(v) = self.data.get(self.index).cloned() {
            self.index += 1;
            return Some(Ok(v));
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub metadata: Result<Metadata>,
}

impl DirEntry {
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    pub fn metadata(&self) -> Result<Metadata> {
        self.metadata
    }

    pub fn file_type(&self) -> Result<FileType> {
        let metadata = self.metadata?;
        Ok(metadata.file_type())
    }

    pub fn file_name(&self) -> OsString {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_owned()
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.map(|m| m.is_dir()).unwrap_or(false)
    }

    pub fn len(&self) -> u64 {
        self.metadata.map(|m| m.len()).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    pub ft: FileType,
    pub accessed: u64,
    pub created: u64,
    pub modified: u64,
    pub len: u64,
    /// Unix permission bits.
    pub mode: u32,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.ft.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.ft.is_dir()
    }

    pub fn accessed(&self) -> u64 {
        self.accessed
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn modified(&self) -> u64 {
        self.modified
    }

    pub fn file_type(&self) -> FileType {
        self.ft
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct FileType {
    pub dir: bool,
    pub file: bool,
    pub symlink: bool,
}

impl FileType {
    pub fn new_dir() -> Self {
        Self {
            dir: true,
            ..Default::default()
        }
    }

    pub fn new_file() -> Self {
        Self {
            file: true,
            ..Default::default()
        }
    }

    pub fn is_dir(&self) -> bool {
        self.dir
    }

    pub fn is_file(&self) -> bool {
        self.file
    }

    pub fn is_symlink(&self) -> bool {
        self.symlink
    }
}

/// Error type for external users
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FsError {
    /// The requested file or directory could not be found
    #[error("entity not found")]
    EntryNotFound,
    /// Expected a directory but found something else
    #[error("not a directory")]
    NotADirectory,
    /// Expected a file but found not a file
    #[error("not a file")]
    NotAFile,
    /// The filesystem cannot be modified
    #[error("read-only filesystem")]
    ReadOnlyFilesystem,
    /// File exists
    #[error("file exists")]
    AlreadyExists,
    /// The directory still has children
    #[error("directory not empty")]
    DirectoryNotEmpty,
    /// Caller was not allowed to perform this operation
    #[error("permission denied")]
    PermissionDenied,
    /// The backend does not implement the operation
    #[error("unsupported operation")]
    Unsupported,
    /// The provided data is invalid
    #[error("invalid input")]
    InvalidInput,
    /// Invalid internal data, if the argument data is invalid, use `InvalidInput`
    #[error("invalid internal data")]
    InvalidData,
    /// A lock guarding internal state was poisoned
    #[error("failed to acquire lock")]
    Lock,
    /// Found EOF when EOF was not expected
    #[error("unexpected eof")]
    UnexpectedEof,
    /// Something failed when doing IO. These errors can generally not be handled.
    #[error("io error")]
    IOError,
    /// Some other unhandled error. If you see this, it's probably a bug.
    #[error("unknown error found")]
    UnknownError,
}

impl From<io::Error> for FsError {
    fn from(io_error: io::Error) -> Self {
        if let Some(inner) = io_error
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<FsError>())
        {
            return *inner;
        }

        match io_error.kind() {
            io::ErrorKind::NotFound => FsError::EntryNotFound,
            io::ErrorKind::NotADirectory => FsError::NotADirectory,
            io::ErrorKind::IsADirectory => FsError::NotAFile,
            io::ErrorKind::ReadOnlyFilesystem => FsError::ReadOnlyFilesystem,
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists,
            io::ErrorKind::DirectoryNotEmpty => FsError::DirectoryNotEmpty,
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            io::ErrorKind::Unsupported => FsError::Unsupported,
            io::ErrorKind::InvalidInput => FsError::InvalidInput,
            io::ErrorKind::InvalidData => FsError::InvalidData,
            io::ErrorKind::UnexpectedEof => FsError::UnexpectedEof,
            io::ErrorKind::Other => FsError::IOError,
            // if the following triggers, a new error type was added to this non-exhaustive enum
            _ => FsError::UnknownError,
        }
    }
}

impl From<FsError> for io::Error {
    fn from(fs_error: FsError) -> Self {
        let kind = match fs_error {
            FsError::EntryNotFound => io::ErrorKind::NotFound,
            FsError::NotADirectory => io::ErrorKind::NotADirectory,
            FsError::NotAFile => io::ErrorKind::IsADirectory,
            FsError::ReadOnlyFilesystem => io::ErrorKind::ReadOnlyFilesystem,
            FsError::AlreadyExists => io::ErrorKind::AlreadyExists,
            FsError::DirectoryNotEmpty => io::ErrorKind::DirectoryNotEmpty,
            FsError::PermissionDenied => io::ErrorKind::PermissionDenied,
            FsError::Unsupported => io::ErrorKind::Unsupported,
            FsError::InvalidInput => io::ErrorKind::InvalidInput,
            FsError::InvalidData => io::ErrorKind::InvalidData,
            FsError::UnexpectedEof => io::ErrorKind::UnexpectedEof,
            FsError::Lock | FsError::IOError | FsError::UnknownError => io::ErrorKind::Other,
        };
        io::Error::new(kind, fs_error)
    }
}
