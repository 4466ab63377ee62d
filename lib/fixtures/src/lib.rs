//! Versioned Git repository fixtures for test suites.
//!
//! Packfiles, `.git` directories and worktrees are embedded in the library
//! at build time. Look fixtures up with [`all`], [`basic`], [`by_tag`] or
//! [`by_url`], then open their pack files or unpack their repositories:
//!
//! ```no_run
//! use git_fixtures::Options;
//!
//! let fixture = git_fixtures::by_tag("sample").one().unwrap();
//! let packfile = fixture.packfile().unwrap();
//! let dot_git = fixture.dot_git(&Options::memory()).unwrap();
//! # drop((packfile, dot_git));
//! ```

mod catalog;
mod error;
mod fixture;
mod options;
mod os_fixture;
pub mod tgz;

use once_cell::sync::Lazy;

pub use fixtures_vfs as vfs;
use fixtures_vfs::{EmbeddedFile, EmbeddedFileSystem};

pub use crate::error::FixtureError;
pub use crate::fixture::{
    all, basic, by_tag, by_url, ensure_is_bare, Fixture, Fixtures, ObjectFormat,
};
pub use crate::options::{Options, Target};
pub use crate::os_fixture::OsFixture;

include!(concat!(env!("OUT_DIR"), "/embedded_data.rs"));

static FILESYSTEM: Lazy<EmbeddedFileSystem> =
    Lazy::new(|| EmbeddedFileSystem::new(EMBEDDED_DATA).with_scope("data"));

/// The embedded `data/` directory, read-only.
pub fn filesystem() -> &'static EmbeddedFileSystem {
    &FILESYSTEM
}
