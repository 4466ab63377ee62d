//! Extraction of gzip-compressed tarballs onto a [`FileSystem`].

use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use fixtures_vfs::{FileSystem, FsError, VirtualFile};
use tar::{Archive, EntryType, Header};
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fs(#[from] FsError),
    /// The gzip or tar stream is malformed.
    #[error(transparent)]
    Decode(io::Error),
    #[error("unable to untar type: {kind} in file {name}")]
    UnsupportedEntryType { kind: char, name: String },
    #[error("mode cannot be negative")]
    NegativeMode,
    #[error("mode cannot be greater than max uint32")]
    ModeOverflow,
    #[error("invalid mode field in {name}")]
    InvalidModeField { name: String },
}

/// Decompresses the tarball read from `source` into `destination`.
///
/// Directories are created with `create_dir_all`, regular files are
/// written in full and get the archived permission bits when the
/// destination supports them. Any other entry type aborts the extraction.
/// The source is closed on every exit path.
pub fn extract(
    mut source: Box<dyn VirtualFile + Send + Sync>,
    destination: &dyn FileSystem,
) -> Result<(), ExtractError> {
    let result = untar(&mut source, destination);
    let closed = source.close();

    result?;
    closed?;
    Ok(())
}

fn untar<R: Read>(source: R, fs: &dyn FileSystem) -> Result<(), ExtractError> {
    let mut archive = Archive::new(GzDecoder::new(source));
    let mut count = 0usize;

    for entry in archive.entries().map_err(ExtractError::Decode)? {
        let mut entry = entry.map_err(ExtractError::Decode)?;
        let name = entry.path().map_err(ExtractError::Decode)?.into_owned();
        let mode = file_mode(header_mode(entry.header(), &name)?)?;

        match entry.header().entry_type() {
            EntryType::Directory => {
                trace!(path = %name.display(), "creating directory");
                fs.create_dir_all(&name)?;
            }
            EntryType::Regular => {
                trace!(path = %name.display(), mode = format_args!("{mode:o}"), "writing file");
                make_file(fs, &name, mode, &mut entry)?;
            }
            other => {
                return Err(ExtractError::UnsupportedEntryType {
                    kind: other.as_byte() as char,
                    name: name.display().to_string(),
                });
            }
        }

        count += 1;
    }

    debug!(entries = count, "extracted archive");
    Ok(())
}

fn make_file(
    fs: &dyn FileSystem,
    path: &Path,
    mode: u32,
    contents: &mut impl Read,
) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)?;
    }

    let mut file = fs.create(path)?;
    let copied = io::copy(contents, &mut file);
    let closed = file.close();
    copied.map_err(copy_error)?;
    closed?;

    match fs.chmod(path, mode) {
        Ok(()) | Err(FsError::Unsupported) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Failures on the write side carry an [`FsError`], anything else came
/// from the archive stream.
fn copy_error(error: io::Error) -> ExtractError {
    match error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<FsError>())
    {
        Some(fs_error) => ExtractError::Fs(*fs_error),
        None => ExtractError::Decode(error),
    }
}

fn header_mode(header: &Header, name: &Path) -> Result<i64, ExtractError> {
    parse_numeric(&header.as_old().mode).ok_or_else(|| ExtractError::InvalidModeField {
        name: name.display().to_string(),
    })
}

/// Parses a numeric header field, either NUL/space padded octal or GNU
/// base-256 (high bit of the first byte set, two's complement).
fn parse_numeric(field: &[u8]) -> Option<i64> {
    match field.first() {
        Some(first) if first & 0x80 != 0 => {
            let inv = if first & 0x40 != 0 { 0xff } else { 0x00 };
            let mut value: u64 = 0;
            for (i, byte) in field.iter().enumerate() {
                let mut byte = byte ^ inv;
                if i == 0 {
                    byte &= 0x7f;
                }
                if value >> 56 != 0 {
                    return None;
                }
                value = (value << 8) | u64::from(byte);
            }
            if value >> 63 != 0 {
                return None;
            }

            let value = value as i64;
            Some(if inv == 0xff { !value } else { value })
        }
        _ => {
            let text = std::str::from_utf8(field).ok()?;
            let text = text.trim_matches(|c| c == ' ' || c == '\0');
            if text.is_empty() {
                return Some(0);
            }
            let value = u64::from_str_radix(text, 8).ok()?;
            Some(i64::try_from(value).unwrap_or(i64::MAX))
        }
    }
}

fn file_mode(mode: i64) -> Result<u32, ExtractError> {
    if mode < 0 {
        return Err(ExtractError::NegativeMode);
    }

    u32::try_from(mode).map_err(|_| ExtractError::ModeOverflow)
}
