//! Error types for locating and parsing `.desktop` entries.

use std::{io, path::PathBuf};

/// Errors produced by the locator and the parser.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory that had to be listed could not be read.
    #[error("could not list directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `.desktop` file could not be read as UTF-8 text.
    #[error("could not read desktop file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `HOME` is unset, so the user-local directories cannot be derived.
    #[error("home directory is not set")]
    NoHome,
}

pub type Result<T> = std::result::Result<T, Error>;
