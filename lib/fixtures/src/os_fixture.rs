use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixtures_vfs::{host_fs, FileSystem, VirtualFile};
use tracing::debug;

use crate::error::FixtureError;
use crate::fixture::Fixture;
use crate::options::Options;

/// A [`Fixture`] whose pack files are served from real files on disk.
///
/// Useful when the code under test needs OS file handles. The copies are
/// created under `dir` and are not removed, so `dir` is usually a
/// temporary directory owned by the test.
#[derive(Debug, Clone, PartialEq)]
pub struct OsFixture {
    fixture: Fixture,
    dir: PathBuf,
}

impl OsFixture {
    pub fn new(fixture: Fixture, dir: impl Into<PathBuf>) -> Self {
        OsFixture {
            fixture,
            dir: dir.into(),
        }
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is(&self, tag: &str) -> bool {
        self.fixture.is(tag)
    }

    pub fn packfile(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.copy_to_disk(self.fixture.packfile()?)
    }

    pub fn idx(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.copy_to_disk(self.fixture.idx()?)
    }

    pub fn rev(&self) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        self.copy_to_disk(self.fixture.rev()?)
    }

    pub fn dot_git(&self, options: &Options) -> Result<Arc<dyn FileSystem>, FixtureError> {
        self.fixture.dot_git(options)
    }

    pub fn worktree(&self, options: &Options) -> Result<Arc<dyn FileSystem>, FixtureError> {
        self.fixture.worktree(options)
    }

    fn copy_to_disk(
        &self,
        mut embedded: Box<dyn VirtualFile + Send + Sync>,
    ) -> Result<Box<dyn VirtualFile + Send + Sync>, FixtureError> {
        let copied = self.write_temp_file(&mut embedded);
        let closed = embedded.close();
        let file = copied?;
        closed?;

        Ok(Box::new(file))
    }

    fn write_temp_file(
        &self,
        source: &mut Box<dyn VirtualFile + Send + Sync>,
    ) -> Result<host_fs::File, FixtureError> {
        let (mut file, path) = tempfile::Builder::new()
            .prefix("embed")
            .tempfile_in(&self.dir)?
            .keep()
            .map_err(|e| e.error)?;

        let copied = io::copy(source, &mut file)?;
        file.seek(SeekFrom::Start(0))?;

        debug!(path = %path.display(), bytes = copied, "copied embedded file to disk");
        Ok(host_fs::File::new(file, path))
    }
}
