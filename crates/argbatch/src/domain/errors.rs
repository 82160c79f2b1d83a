//! Domain-specific errors.

use std::env::VarError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input path into arguments.
///
/// Every variant carries the path (or configuration origin) that caused it, so callers can
/// report the failure without extra bookkeeping.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed to list directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot make {} relative to {}", target.display(), base.display())]
    Relative {
        base: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot normalize an empty path")]
    EmptyPath,
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8 { path: PathBuf },
    #[error("failed to read search paths from ${name}")]
    Environment {
        name: String,
        #[source]
        source: VarError,
    },
    #[error("unable to determine working directory")]
    WorkingDir(#[source] io::Error),
}

impl ResolutionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path the failure is about, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::NonUtf8 { path } => Some(path),
            Self::Relative { target, .. } => Some(target),
            Self::EmptyPath | Self::Environment { .. } | Self::WorkingDir(_) => None,
        }
    }
}
