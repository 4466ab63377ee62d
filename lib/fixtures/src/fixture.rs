use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use fixtures_vfs::{FileSystem, ScopedFileSystem, VirtualFile};
use tracing::debug;

use crate::catalog::{Entry, CATALOG};
use crate::error::FixtureError;
use crate::options::Options;
use crate::tgz;

const BASIC_URL: &str = "https://github.com/git-fixtures/basic.git";

const BARE_CONFIG: &str = "[core]\n\
    repositoryformatversion = 0\n\
    filemode = true\n\
    bare = true\n\
    [http]\n\
    receivepack = true\n";

/// The hash algorithm of a fixture's objects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "enable-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ObjectFormat {
    #[default]
    Sha1,
    Sha256,
}

/// A tagged bundle of Git test data.
///
/// Values are independent copies of the catalog; changing one never
/// affects later lookups.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "enable-serde",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Fixture {
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub head: Option<String>,
    pub packfile_hash: Option<String>,
    pub dot_git_hash: Option<String>,
    pub worktree_hash: Option<String>,
    pub objects_count: u32,
    pub object_format: ObjectFormat,
}

impl Fixture {
    pub fn is(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Opens `pack-<hash>.pack` from the embedded data.
    pub fn packfile(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.open_pack("pack")
    }

    /// Opens the packfile index, `pack-<hash>.idx`.
    pub fn idx(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.open_pack("idx")
    }

    /// Opens the reverse index, `pack-<hash>.rev`.
    pub fn rev(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.open_pack("rev")
    }

    /// Unpacks the repository's `.git` directory into a new filesystem.
    ///
    /// Every call returns a different filesystem. A fixture that only has
    /// a worktree yields the `.git` directory of a fresh worktree.
    pub fn dot_git(&self, options: &Options) -> Result<Arc<dyn FileSystem>, FixtureError> {
        match (&self.dot_git_hash, &self.worktree_hash) {
            (Some(hash), _) => extract(&format!("git-{hash}.tgz"), options),
            (None, Some(_)) => {
                let worktree = self.worktree(options)?;
                Ok(Arc::new(ScopedFileSystem::new(".git", worktree)))
            }
            (None, None) => Err(FixtureError::MissingHash(".git")),
        }
    }

    /// Unpacks the repository's worktree into a new filesystem.
    pub fn worktree(&self, options: &Options) -> Result<Arc<dyn FileSystem>, FixtureError> {
        let hash = self
            .worktree_hash
            .as_deref()
            .ok_or(FixtureError::MissingHash("worktree"))?;
        extract(&format!("worktree-{hash}.tgz"), options)
    }

    fn open_pack(&self, extension: &str) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        let hash = self
            .packfile_hash
            .as_deref()
            .ok_or(FixtureError::MissingHash("packfile"))?;
        open_embedded(&format!("pack-{hash}.{extension}"))
    }
}

impl From<&Entry> for Fixture {
    fn from(entry: &Entry) -> Self {
        Fixture {
            url: entry.url.map(String::from),
            tags: entry.tags.iter().map(|tag| tag.to_string()).collect(),
            head: entry.head.map(String::from),
            packfile_hash: entry.packfile_hash.map(String::from),
            dot_git_hash: entry.dot_git_hash.map(String::from),
            worktree_hash: entry.worktree_hash.map(String::from),
            objects_count: entry.objects_count,
            object_format: entry.object_format,
        }
    }
}

fn open_embedded(path: &str) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
    crate::filesystem()
        .open(Path::new(path))
        .map_err(|source| FixtureError::Embedded {
            path: path.to_string(),
            source,
        })
}

fn extract(archive: &str, options: &Options) -> Result<Arc<dyn FileSystem>, FixtureError> {
    let source = open_embedded(archive)?;
    let fs = options.new_filesystem()?;
    tgz::extract(source, fs.as_ref())?;

    debug!(archive, target = ?options.target(), "materialized fixture");
    Ok(fs)
}

/// Overwrites `config` with the configuration of a bare repository.
pub fn ensure_is_bare(fs: &dyn FileSystem) -> Result<(), FixtureError> {
    fs.metadata(Path::new("config"))
        .map_err(FixtureError::NotDotGit)?;

    let mut config = fs
        .new_open_options()
        .write(true)
        .truncate(true)
        .open("config")?;
    let written = config.write_all(BARE_CONFIG.as_bytes());
    let closed = config.close();
    written?;
    closed?;

    Ok(())
}

/// An ordered selection of fixtures.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fixtures(Vec<Fixture>);

impl Fixtures {
    pub fn by_tag(&self, tag: &str) -> Fixtures {
        self.iter().filter(|f| f.is(tag)).cloned().collect()
    }

    pub fn by_url(&self, url: &str) -> Fixtures {
        self.iter()
            .filter(|f| f.url.as_deref() == Some(url))
            .cloned()
            .collect()
    }

    /// Drops every fixture carrying `tag`.
    pub fn exclude(&self, tag: &str) -> Fixtures {
        self.iter().filter(|f| !f.is(tag)).cloned().collect()
    }

    /// A copy of the first fixture, if any.
    pub fn one(&self) -> Option<Fixture> {
        self.0.first().cloned()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fixture> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Fixture> for Fixtures {
    fn from_iter<I: IntoIterator<Item = Fixture>>(iter: I) -> Self {
        Fixtures(iter.into_iter().collect())
    }
}

impl IntoIterator for Fixtures {
    type Item = Fixture;
    type IntoIter = std::vec::IntoIter<Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fixtures {
    type Item = &'a Fixture;
    type IntoIter = std::slice::Iter<'a, Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every fixture in the catalog.
pub fn all() -> Fixtures {
    CATALOG.iter().map(Fixture::from).collect()
}

/// The fixtures of the `basic` repository, minus the single-branch clone.
pub fn basic() -> Fixtures {
    by_url(BASIC_URL).exclude("single-branch")
}

pub fn by_tag(tag: &str) -> Fixtures {
    CATALOG
        .iter()
        .filter(|entry| entry.tags.iter().any(|t| *t == tag))
        .map(Fixture::from)
        .collect()
}

pub fn by_url(url: &str) -> Fixtures {
    CATALOG
        .iter()
        .filter(|entry| entry.url.is_some_and(|u| u == url))
        .map(Fixture::from)
        .collect()
}
