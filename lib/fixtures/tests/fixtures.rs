use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use git_fixtures::vfs::{FileSystem, FsError};
use git_fixtures::{ensure_is_bare, Fixture, FixtureError, Options, OsFixture};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

macro_rules! path {
    ($path:expr) => {
        Path::new($path)
    };
}

const PACK_HASH: &str = "381609ad9fb786c787683d1fb1149b4f1e3cb5fd";

static PACK: &[u8] =
    include_bytes!("../data/pack-381609ad9fb786c787683d1fb1149b4f1e3cb5fd.pack");
static IDX: &[u8] = include_bytes!("../data/pack-381609ad9fb786c787683d1fb1149b4f1e3cb5fd.idx");
static REV: &[u8] = include_bytes!("../data/pack-381609ad9fb786c787683d1fb1149b4f1e3cb5fd.rev");

const DOT_GIT_ROOT: &[&str] = &[
    "HEAD",
    "branches",
    "config",
    "index",
    "info",
    "objects",
    "packed-refs",
    "refs",
];

fn sample() -> Fixture {
    git_fixtures::by_tag("sample").one().unwrap()
}

fn read_all(mut file: impl Read) -> Vec<u8> {
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).unwrap();
    contents
}

fn read_string(fs: &dyn FileSystem, path: &str) -> String {
    String::from_utf8(read_all(fs.open(path!(path)).unwrap())).unwrap()
}

fn root_names(fs: &dyn FileSystem) -> Vec<String> {
    let mut names: Vec<String> = fs
        .read_dir(path!("/"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_sample_pack_files() {
    let fixture = sample();
    assert_eq!(fixture.packfile_hash.as_deref(), Some(PACK_HASH));
    assert_eq!(fixture.objects_count, 14);

    let mut packfile = fixture.packfile().unwrap();
    assert_eq!(packfile.size(), PACK.len() as u64);
    assert_eq!(read_all(&mut packfile), PACK);

    assert_eq!(read_all(fixture.idx().unwrap()), IDX);
    assert_eq!(read_all(fixture.rev().unwrap()), REV);
}

#[test]
fn test_pack_files_are_independent_handles() {
    let fixture = sample();
    let mut first = fixture.packfile().unwrap();
    let mut second = fixture.packfile().unwrap();

    let mut magic = [0u8; 4];
    first.read_exact(&mut magic).unwrap();
    assert_eq!(&magic, b"PACK");

    assert_eq!(read_all(&mut second), PACK);
    assert_eq!(read_all(&mut first), &PACK[4..]);
}

#[test]
fn test_embedded_data_listing() {
    let fs = git_fixtures::filesystem();
    let names = root_names(fs);

    assert!(names.contains(&format!("pack-{PACK_HASH}.pack")));
    assert!(names.contains(&"git-ce3050159dc1d4ffe4ae4002cdf7dee027ac3aba.tgz".to_string()));
    assert!(names.contains(&"worktree-d254a59594cebe0ce22579588019fc42f6bdfa4b.tgz".to_string()));
    assert_eq!(
        fs.create(path!("new.pack")).err(),
        Some(FsError::ReadOnlyFilesystem)
    );
}

#[test]
fn test_dot_git_in_memory() {
    let fs = sample().dot_git(&Options::memory()).unwrap();

    assert_eq!(root_names(fs.as_ref()), DOT_GIT_ROOT);
    assert!(read_string(fs.as_ref(), "config").contains("bare = false"));
    assert!(read_string(fs.as_ref(), "packed-refs")
        .contains("76a31dcfa80def7b010cdb3819115f2d9473acab refs/heads/master"));

    let pack = read_all(
        fs.open(path!(&format!("objects/pack/pack-{PACK_HASH}.pack")))
            .unwrap(),
    );
    assert_eq!(pack, PACK);
    assert_eq!(
        fs.metadata(path!("objects/info/commit-graph"))
            .unwrap()
            .mode(),
        0o444
    );
}

#[test]
fn test_dot_git_calls_are_independent() {
    let fixture = sample();
    let first = fixture.dot_git(&Options::default()).unwrap();
    let second = fixture.dot_git(&Options::default()).unwrap();

    first.remove_file(path!("HEAD")).unwrap();
    assert!(first.metadata(path!("HEAD")).is_err());
    assert!(second.metadata(path!("HEAD")).is_ok());
}

#[test]
fn test_dot_git_in_target_dir() {
    let dir = TempDir::new().unwrap();
    let fs = sample().dot_git(&Options::target_dir(dir.path())).unwrap();

    assert_eq!(root_names(fs.as_ref()), DOT_GIT_ROOT);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let unpacked: PathBuf = std::fs::read_dir(dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    assert_eq!(
        std::fs::read(unpacked.join(format!("objects/pack/pack-{PACK_HASH}.idx"))).unwrap(),
        IDX
    );

    drop(fs);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_dot_git_in_temp_dir() {
    let fs = sample().dot_git(&Options::temp_dir()).unwrap();
    assert_eq!(root_names(fs.as_ref()), DOT_GIT_ROOT);
}

#[test]
fn test_worktree() {
    let fixture = sample();
    let fs = fixture.worktree(&Options::memory()).unwrap();

    assert_eq!(
        root_names(fs.as_ref()),
        vec![".git", "LICENSE", "README.md", "go", "vendor"]
    );
    assert_eq!(read_string(fs.as_ref(), "LICENSE"), "MIT\n");
    assert_eq!(
        read_string(fs.as_ref(), "README.md"),
        "Sample fixture repository\n"
    );
    assert!(fs.metadata(path!("go/example/main.go")).unwrap().is_file());
}

#[test]
fn test_dot_git_of_worktree_only_fixture() {
    let fixture = git_fixtures::by_tag("sample-worktree").one().unwrap();
    assert_eq!(fixture.dot_git_hash, None);

    let fs = fixture.dot_git(&Options::memory()).unwrap();
    assert_eq!(root_names(fs.as_ref()), DOT_GIT_ROOT);
    assert!(read_string(fs.as_ref(), "HEAD").starts_with("ref: "));
}

#[test]
fn test_ensure_is_bare() {
    let fixture = sample();

    for options in [Options::memory(), Options::temp_dir()] {
        let fs = fixture.dot_git(&options).unwrap();
        ensure_is_bare(fs.as_ref()).unwrap();

        let config = read_string(fs.as_ref(), "config");
        assert_eq!(
            config,
            "[core]\nrepositoryformatversion = 0\nfilemode = true\nbare = true\n[http]\nreceivepack = true\n"
        );
    }

    let worktree = fixture.worktree(&Options::memory()).unwrap();
    assert!(matches!(
        ensure_is_bare(worktree.as_ref()),
        Err(FixtureError::NotDotGit(FsError::EntryNotFound))
    ));
}

#[test]
fn test_unvendored_fixture() {
    let fixture = git_fixtures::by_tag("merge-base").one().unwrap();

    match fixture.dot_git(&Options::memory()) {
        Err(FixtureError::Embedded { path, source }) => {
            assert_eq!(path, "git-26baa505b9f6fb2024b9999c140b75514718c988.tgz");
            assert_eq!(source, FsError::EntryNotFound);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_os_fixture() {
    let dir = TempDir::new().unwrap();
    let fixture = OsFixture::new(sample(), dir.path());
    assert!(fixture.is("packfile"));
    assert_eq!(fixture.clone(), fixture);

    let mut packfile = fixture.packfile().unwrap();
    assert_eq!(read_all(&mut packfile), PACK);
    packfile.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(read_all(&mut packfile), PACK);
    packfile.close().unwrap();

    assert_eq!(read_all(fixture.idx().unwrap()), IDX);
    assert_eq!(read_all(fixture.rev().unwrap()), REV);

    // The copies stay on disk.
    let copies: Vec<Vec<u8>> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| std::fs::read(entry.unwrap().path()).unwrap())
        .collect();
    assert_eq!(copies.len(), 3);
    assert!(copies.iter().any(|copy| copy == PACK));

    let fs: Arc<dyn FileSystem> = fixture.dot_git(&Options::memory()).unwrap();
    assert_eq!(root_names(fs.as_ref()), DOT_GIT_ROOT);
}
