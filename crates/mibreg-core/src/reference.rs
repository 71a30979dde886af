//! Textual references: `MODULE::name` and `MODULE::name.index`.

use crate::error::{FormatReason, TranslateError};
use core::fmt;

/// Separator between module and name.
pub const MODULE_SEPARATOR: &str = "::";

/// A parsed textual reference, borrowing from its input.
///
/// `IF-MIB::ifTable` has no index; `IF-MIB::ifDescr.3` carries index `3`,
/// which becomes a trailing arc after the base name is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextualReference<'a> {
    /// Module name.
    pub module: &'a str,
    /// Object name, without the index.
    pub name: &'a str,
    /// Optional trailing arc.
    pub index: Option<u32>,
}

impl<'a> TextualReference<'a> {
    /// Parse `MODULE::name[.index]`.
    ///
    /// # Errors
    ///
    /// [`TranslateError::InvalidArgument`] for empty input,
    /// [`TranslateError::Format`] when the separator count, the segments or
    /// the index are malformed.
    pub fn parse(input: &'a str) -> Result<Self, TranslateError> {
        if input.is_empty() {
            return Err(TranslateError::empty("textual"));
        }
        let mut parts = input.split(MODULE_SEPARATOR);
        let (Some(module), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TranslateError::format(input, FormatReason::SeparatorCount));
        };
        if module.is_empty() || name.is_empty() {
            return Err(TranslateError::format(input, FormatReason::EmptySegment));
        }
        Self::from_parts(module, name)
    }

    /// Build a reference from an already split module and name. The name may
    /// still carry an `.index` suffix.
    ///
    /// # Errors
    ///
    /// [`TranslateError::InvalidArgument`] for an empty module or name,
    /// [`TranslateError::Format`] for a malformed name.
    pub fn from_parts(module: &'a str, name: &'a str) -> Result<Self, TranslateError> {
        if module.is_empty() {
            return Err(TranslateError::empty("module"));
        }
        if name.is_empty() {
            return Err(TranslateError::empty("name"));
        }

        let Some((base, suffix)) = name.split_once('.') else {
            return Ok(Self {
                module,
                name,
                index: None,
            });
        };
        if suffix.contains('.') {
            return Err(TranslateError::format(name, FormatReason::TooManyDots));
        }
        if base.is_empty() {
            return Err(TranslateError::format(name, FormatReason::EmptySegment));
        }
        let index = parse_index(suffix)
            .ok_or_else(|| TranslateError::format(name, FormatReason::InvalidIndex))?;

        Ok(Self {
            module,
            name: base,
            index: Some(index),
        })
    }
}

/// Decimal digits only; no sign, no whitespace.
fn parse_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for TextualReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{MODULE_SEPARATOR}{}", self.module, self.name)?;
        if let Some(index) = self.index {
            write!(f, ".{index}")?;
        }
        Ok(())
    }
}
