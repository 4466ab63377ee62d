use std::io;

use fixtures_vfs::FsError;

use crate::tgz::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture has no hash for the requested kind of data.
    #[error("fixture has no {0} hash")]
    MissingHash(&'static str),
    #[error("unable to open embedded file {path}")]
    Embedded {
        path: String,
        #[source]
        source: FsError,
    },
    #[error("not a .git folder")]
    NotDotGit(#[source] FsError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error("unable to extract the fixture archive")]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
