//! Translation between textual references and numeric paths.
//!
//! All functions work against any [`DefinitionTree`]. Argument and format
//! checks run before the tree is consulted; tree lookup failures are passed
//! through as [`TranslateError::Lookup`] without modification.

use crate::error::TranslateError;
use crate::oid::Oid;
use crate::reference::TextualReference;
use crate::tree::DefinitionTree;
use alloc::string::String;

/// Suffix that marks a table by naming convention.
pub const TABLE_SUFFIX: &str = "Table";

/// Resolve `MODULE::name` or `MODULE::name.index` to a numeric path.
///
/// # Errors
///
/// [`TranslateError::InvalidArgument`] for empty input,
/// [`TranslateError::Format`] for a malformed reference, or the tree's
/// lookup error.
pub fn translate<T: DefinitionTree + ?Sized>(tree: &T, textual: &str) -> Result<Oid, TranslateError> {
    let reference = TextualReference::parse(textual)?;
    resolve(tree, &reference)
}

/// Resolve a module and a name (optionally with `.index`) to a numeric path.
///
/// # Errors
///
/// Same as [`translate`].
pub fn translate_qualified<T: DefinitionTree + ?Sized>(
    tree: &T,
    module: &str,
    name: &str,
) -> Result<Oid, TranslateError> {
    let reference = TextualReference::from_parts(module, name)?;
    resolve(tree, &reference)
}

fn resolve<T: DefinitionTree + ?Sized>(
    tree: &T,
    reference: &TextualReference<'_>,
) -> Result<Oid, TranslateError> {
    let mut oid = tree.find(reference.module, reference.name)?.oid;
    if let Some(index) = reference.index {
        oid.push(index);
    }
    Ok(oid)
}

/// Canonical text for a numeric path, e.g. `IF-MIB::ifDescr` or
/// `IF-MIB::ifDescr.3` for a path below a named node.
///
/// # Errors
///
/// [`TranslateError::InvalidArgument`] for an empty path, otherwise the
/// tree's lookup error.
pub fn translate_oid<T: DefinitionTree + ?Sized>(tree: &T, oid: &Oid) -> Result<String, TranslateError> {
    if oid.is_empty() {
        return Err(TranslateError::empty("oid"));
    }
    Ok(tree.search(oid)?.text())
}

/// Naming heuristic: does the canonical text end in `Table`?
///
/// This is a convention check only. A table whose descriptor does not end
/// in `Table` is not recognised, and a non-table that happens to is. Use
/// [`NodeKind::is_table`](crate::NodeKind::is_table) for the structural
/// answer when the tree provides it.
#[must_use]
pub fn looks_like_table(text: &str) -> bool {
    text.ends_with(TABLE_SUFFIX)
}

/// Apply [`looks_like_table`] to the canonical text of `oid`.
///
/// # Errors
///
/// Same as [`translate_oid`].
pub fn is_table_id<T: DefinitionTree + ?Sized>(tree: &T, oid: &Oid) -> Result<bool, TranslateError> {
    translate_oid(tree, oid).map(|text| looks_like_table(&text))
}

/// Resolve a textual reference and apply [`is_table_id`] to the result.
///
/// # Errors
///
/// Same as [`translate`].
pub fn validate_table<T: DefinitionTree + ?Sized>(tree: &T, textual: &str) -> Result<bool, TranslateError> {
    let oid = translate(tree, textual)?;
    is_table_id(tree, &oid)
}
