use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Result type used by the factory's registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifier of a [`View`](crate::View), unique within the factory that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) u64);

impl ViewId {
    /// Returns the raw numeric identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors produced by a [`Factory`](crate::Factory) and its views.
///
/// When surfaced through [`std::io::Read`], an `Error` is wrapped in an
/// [`io::Error`] and can be recovered with [`io::Error::get_ref`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The factory was constructed without a source. Permanent.
    #[error("no source to mimic")]
    NoSource,

    /// The view was never registered, or has already been removed.
    #[error("view {id} is not registered with this factory")]
    NotRegistered { id: ViewId },

    /// The view was minted by another factory.
    #[error("view {id} belongs to a different factory")]
    ForeignView { id: ViewId },
}

impl Error {
    fn kind(&self) -> io::ErrorKind {
        match self {
            Error::NoSource => io::ErrorKind::NotConnected,
            Error::NotRegistered { .. } | Error::ForeignView { .. } => {
                io::ErrorKind::InvalidInput
            }
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(err.kind(), err)
    }
}

/// A failure reported by the wrapped source, cached and replayed to every view.
///
/// The original [`io::Error`] is kept behind an [`Arc`] so each replay carries
/// the same kind and message without re-reading the source.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SourceError(Arc<io::Error>);

impl SourceError {
    pub(crate) fn new(err: io::Error) -> Self {
        Self(Arc::new(err))
    }

    /// The [`io::ErrorKind`] the source reported.
    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }

    /// The error exactly as the source returned it.
    pub fn get_ref(&self) -> &io::Error {
        &self.0
    }

    pub(crate) fn to_io(&self) -> io::Error {
        io::Error::new(self.kind(), self.clone())
    }
}
