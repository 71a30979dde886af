//! Registry and compile errors.

use std::io;
use std::path::PathBuf;

use mibreg_core::TranslateError;

use crate::cache::CacheError;
use crate::notify::SubscriberError;

/// A definition file could not be compiled at all.
///
/// Problems inside a file are diagnostics, not errors; this is reserved for
/// failures that leave nothing to parse.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File being compiled.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Error returned by [`Registry`](crate::Registry) operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An argument was rejected before any work was done.
    #[error("invalid argument `{param}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        param: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Translation failed.
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// A file could not be compiled; nothing was imported.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// A folder could not be listed.
    #[error("cannot list {}: {source}", path.display())]
    Io {
        /// Folder being listed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A change subscriber failed; later subscribers were not called.
    #[error("change subscriber failed: {0}")]
    Subscriber(#[source] SubscriberError),
    /// A module cache could not be written or read.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl RegistryError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// True for [`RegistryError::InvalidArgument`].
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
