//! Error types for translation and tree lookups.

use crate::oid::Oid;
use alloc::string::String;
use core::fmt;

/// Lookup failure reported by a [`DefinitionTree`](crate::DefinitionTree).
///
/// Translation never rewrites these; they reach the caller exactly as the
/// tree produced them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No module with this name has been loaded.
    #[error("module {module} is not loaded")]
    ModuleNotFound {
        /// Requested module name.
        module: String,
    },
    /// The module is loaded but does not define `name`.
    #[error("{module}::{name} is not defined")]
    NameNotFound {
        /// Module that was searched.
        module: String,
        /// Requested symbol.
        name: String,
    },
    /// No known definition covers this numeric path.
    #[error("no definition covers {oid}")]
    OidNotFound {
        /// Requested path.
        oid: Oid,
    },
}

/// Why a textual reference was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatReason {
    /// Not exactly one `::` separator.
    SeparatorCount,
    /// Module or name segment is empty.
    EmptySegment,
    /// More than one `.` in the name.
    TooManyDots,
    /// The index after `.` is not a non-negative 32-bit integer.
    InvalidIndex,
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SeparatorCount => "expected exactly one `::` separator",
            Self::EmptySegment => "module and name must be non-empty",
            Self::TooManyDots => "name can contain at most one `.`",
            Self::InvalidIndex => "index after `.` must be a non-negative integer",
        };
        f.write_str(text)
    }
}

/// Error returned by the translation functions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// An argument was empty.
    #[error("invalid argument `{param}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        param: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The textual reference is malformed.
    #[error("malformed reference {input:?}: {reason}")]
    Format {
        /// The rejected input.
        input: String,
        /// What is wrong with it.
        reason: FormatReason,
    },
    /// The tree could not resolve the reference.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl TranslateError {
    pub(crate) fn empty(param: &'static str) -> Self {
        Self::InvalidArgument {
            param,
            reason: "must not be empty",
        }
    }

    pub(crate) fn format(input: &str, reason: FormatReason) -> Self {
        Self::Format {
            input: input.into(),
            reason,
        }
    }

    /// True for [`TranslateError::Format`].
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
