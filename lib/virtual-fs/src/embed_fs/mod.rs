//! A read-only filesystem over a table of blobs embedded at compile time.

mod file;
mod filesystem;
mod tree;

pub use file::FileHandle;
pub use filesystem::EmbeddedFileSystem;
pub use tree::{EmbeddedFile, EmbeddedTree, Node, DIR_MODE, FILE_MODE};

#[cfg(test)]
mod test_embedded_filesystem {
    use std::io::{Read, Seek, SeekFrom};
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FileSystem, FsError};

    macro_rules! path {
        ($s:expr) => {
            Path::new($s)
        };
    }

    static TESTDATA: &[EmbeddedFile] = &[
        EmbeddedFile::new(
            "testdata/empty.txt",
            include_bytes!("../../testdata/empty.txt"),
        ),
        EmbeddedFile::new(
            "testdata/empty2.txt",
            include_bytes!("../../testdata/empty2.txt"),
        ),
    ];

    static SINGLE_FILE: &[EmbeddedFile] = &[EmbeddedFile::new(
        "testdata/empty.txt",
        include_bytes!("../../testdata/empty.txt"),
    )];

    static NESTED: &[EmbeddedFile] = &[
        EmbeddedFile::new("data/foo.txt", b"foo contents"),
        EmbeddedFile::new("data/bar/baz.txt", b"baz"),
        EmbeddedFile::new("data/bar/qux/deep.bin", &[0, 1, 2, 3, 4, 5, 6, 7]),
    ];

    fn read_all(fs: &dyn FileSystem, path: &Path) -> Vec<u8> {
        let mut file = fs.open(path).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        contents
    }

    fn names(fs: &dyn FileSystem, path: &Path) -> Vec<String> {
        fs.read_dir(path)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_open_reads_embedded_bytes() {
        let fs = EmbeddedFileSystem::new(TESTDATA);

        assert_eq!(read_all(&fs, path!("testdata/empty.txt")), b"");
        assert_eq!(read_all(&fs, path!("testdata/empty2.txt")), b"test");
        assert_eq!(read_all(&fs, path!("/testdata/./empty2.txt")), b"test");

        assert!(
            matches!(fs.open(path!("testdata/missing.txt")), Err(FsError::EntryNotFound)),
            "opening a missing file",
        );
        assert!(
            matches!(fs.open(path!("testdata")), Err(FsError::NotAFile)),
            "opening a directory as a file",
        );
    }

    #[test]
    fn test_open_handles_are_independent() {
        let fs = EmbeddedFileSystem::new(NESTED);
        let mut first = fs.open(path!("data/foo.txt")).unwrap();
        let mut second = fs.open(path!("data/foo.txt")).unwrap();

        let mut buf = [0; 4];
        first.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"foo ");

        second.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"foo ");

        first.close().unwrap();
        let mut rest = String::new();
        second.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "contents");
    }

    #[test]
    fn test_open_with_mutating_flags_is_rejected() {
        let fs = EmbeddedFileSystem::new(TESTDATA);

        for existing in [path!("testdata/empty2.txt"), path!("testdata/nope.txt")] {
            let mut options = fs.new_open_options();
            assert!(
                matches!(
                    options.read(true).create(true).open(existing),
                    Err(FsError::ReadOnlyFilesystem)
                ),
                "create on {}",
                existing.display(),
            );
            assert!(matches!(
                fs.new_open_options().write(true).open(existing),
                Err(FsError::ReadOnlyFilesystem)
            ));
            assert!(matches!(
                fs.new_open_options().append(true).open(existing),
                Err(FsError::ReadOnlyFilesystem)
            ));
            assert!(matches!(
                fs.new_open_options().truncate(true).open(existing),
                Err(FsError::ReadOnlyFilesystem)
            ));
            assert!(matches!(
                fs.new_open_options().create_new(true).open(existing),
                Err(FsError::ReadOnlyFilesystem)
            ));
        }

        assert!(fs
            .new_open_options()
            .open(path!("testdata/empty2.txt"))
            .is_ok());
    }

    #[test]
    fn test_stat() {
        let fs = EmbeddedFileSystem::new(TESTDATA);

        let entry = fs.stat(path!("testdata/empty2.txt")).unwrap();
        assert_eq!(entry.file_name(), "empty2.txt");
        assert!(!entry.is_dir());
        assert_eq!(entry.len(), 4);
        assert_eq!(entry.metadata().unwrap().mode(), FILE_MODE);

        let entry = fs.stat(path!("testdata")).unwrap();
        assert_eq!(entry.file_name(), "testdata");
        assert!(entry.is_dir());
        assert_eq!(entry.len(), 0);
        assert_eq!(entry.metadata().unwrap().mode(), DIR_MODE);

        assert!(matches!(
            fs.stat(path!("testdata/missing")),
            Err(FsError::EntryNotFound)
        ));
    }

    #[test]
    fn test_read_dir() {
        let fs = EmbeddedFileSystem::new(NESTED);

        assert_eq!(names(&fs, path!("data")), vec!["bar", "foo.txt"]);
        assert_eq!(names(&fs, path!("data/bar")), vec!["baz.txt", "qux"]);
        assert_eq!(names(&fs, path!("/data/bar/../bar/qux")), vec!["deep.bin"]);

        let entries: Vec<_> = fs
            .read_dir(path!("data"))
            .unwrap()
            .map(|entry| entry.unwrap())
            .collect();
        assert!(entries[0].is_dir());
        assert!(!entries[1].is_dir());
        assert_eq!(entries[1].len(), 12);
        assert_eq!(entries[1].path(), PathBuf::from("data/foo.txt"));

        assert!(matches!(
            fs.read_dir(path!("data/foo.txt")),
            Err(FsError::NotADirectory)
        ));
        assert!(matches!(
            fs.read_dir(path!("data/nope")),
            Err(FsError::EntryNotFound)
        ));
    }

    #[test]
    fn test_read_dir_of_degenerate_trees() {
        let single = EmbeddedFileSystem::new(SINGLE_FILE);
        assert_eq!(names(&single, path!("testdata")), vec!["empty.txt"]);
        assert!(matches!(single.read_dir(path!("")), Err(FsError::EntryNotFound)));

        let empty = EmbeddedFileSystem::new(&[]);
        assert!(matches!(empty.read_dir(path!("")), Err(FsError::EntryNotFound)));
        assert!(matches!(empty.read_dir(path!("/")), Err(FsError::EntryNotFound)));
    }

    #[test]
    fn test_mutators_are_rejected() {
        let fs = EmbeddedFileSystem::new(TESTDATA);

        for path in [path!("testdata/empty.txt"), path!("does/not/exist")] {
            assert_eq!(fs.create(path).err(), Some(FsError::ReadOnlyFilesystem));
            assert_eq!(fs.remove_file(path), Err(FsError::ReadOnlyFilesystem));
            assert_eq!(fs.remove_dir(path), Err(FsError::ReadOnlyFilesystem));
            assert_eq!(fs.create_dir(path), Err(FsError::ReadOnlyFilesystem));
            assert_eq!(fs.create_dir_all(path), Err(FsError::ReadOnlyFilesystem));
            assert_eq!(
                fs.rename(path, path!("testdata/renamed.txt")),
                Err(FsError::ReadOnlyFilesystem)
            );
            assert_eq!(fs.chmod(path, 0o777), Err(FsError::ReadOnlyFilesystem));
        }

        assert_eq!(read_all(&fs, path!("testdata/empty2.txt")), b"test");
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_rejected_mutations_are_logged() {
        let fs = EmbeddedFileSystem::new(TESTDATA);

        assert_eq!(
            fs.remove_file(path!("testdata/empty.txt")),
            Err(FsError::ReadOnlyFilesystem)
        );
        assert!(logs_contain("rejecting mutation of the embedded filesystem"));
        assert!(logs_contain("remove_file"));
    }

    #[test]
    fn test_seek() {
        let fs = EmbeddedFileSystem::new(TESTDATA);
        let mut file = fs.open(path!("testdata/empty2.txt")).unwrap();

        assert_eq!(file.seek(SeekFrom::End(-2)).unwrap(), 2);
        let mut buf = [0; 2];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"st");

        let cases: &[(SeekFrom, Option<u64>, &[u8])] = &[
            (SeekFrom::Start(0), Some(0), b"test"),
            (SeekFrom::Start(1), Some(1), b"est"),
            (SeekFrom::Start(4), Some(4), b""),
            (SeekFrom::Start(10), Some(10), b""),
            (SeekFrom::End(0), Some(4), b""),
            (SeekFrom::End(-4), Some(0), b"test"),
            (SeekFrom::End(-5), None, b""),
        ];

        for (pos, expected, remaining) in cases {
            let mut file = fs.open(path!("testdata/empty2.txt")).unwrap();
            match expected {
                Some(offset) => {
                    assert_eq!(file.seek(*pos).unwrap(), *offset, "seeking to {pos:?}");
                    let mut rest = Vec::new();
                    file.read_to_end(&mut rest).unwrap();
                    assert_eq!(rest.as_slice(), *remaining, "reading after {pos:?}");
                }
                None => {
                    let error = file.seek(*pos).unwrap_err();
                    assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
                }
            }
        }
    }

    #[test]
    fn test_scope() {
        let root = EmbeddedFileSystem::new(NESTED);
        let fs = root.with_scope("data");

        assert_eq!(fs.scope(), "data");
        assert_eq!(read_all(&fs, path!("foo.txt")), b"foo contents");
        assert_eq!(read_all(&fs, path!("../../foo.txt")), b"foo contents");
        assert_eq!(names(&fs, path!("/")), vec!["bar", "foo.txt"]);
        assert_eq!(names(&fs, path!("..")), vec!["bar", "foo.txt"]);

        let nested = fs.with_scope("bar");
        assert_eq!(nested.scope(), "data/bar");
        assert_eq!(read_all(&nested, path!("baz.txt")), b"baz");
        assert!(matches!(
            nested.open(path!("../foo.txt")),
            Err(FsError::EntryNotFound)
        ));
    }

    #[test]
    fn test_join() {
        let fs = EmbeddedFileSystem::new(NESTED).with_scope("data");

        assert_eq!(fs.join(&["/data", "../bar"]), PathBuf::from("/bar"));
        assert_eq!(fs.join(&["/data", "./bar"]), PathBuf::from("/data/bar"));
        assert_eq!(fs.join(&["data", "foo/bar"]), PathBuf::from("data/foo/bar"));
        assert_eq!(fs.join(&["/data", "foo/bar"]), PathBuf::from("/data/foo/bar"));

        let joined = fs.join(&["bar", "qux", "deep.bin"]);
        assert_eq!(read_all(&fs, &joined), vec![0u8, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_is_shareable_between_threads() {
        let fs = EmbeddedFileSystem::new(NESTED);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let fs = fs.clone();
                scope.spawn(move || {
                    assert_eq!(read_all(&fs, path!("data/bar/baz.txt")), b"baz");
                    assert_eq!(names(&fs, path!("data/bar")), vec!["baz.txt", "qux"]);
                });
            }
        });
    }
}
