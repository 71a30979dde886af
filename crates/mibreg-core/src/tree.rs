//! The namespace tree contract consumed by translation and the registry.

use crate::definition::ModuleDefinition;
use crate::error::LookupError;
use crate::oid::Oid;
use crate::reference::MODULE_SEPARATOR;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// A named node in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinitionNode {
    /// Module that defines the node.
    pub module: String,
    /// Symbol name.
    pub name: String,
    /// Numeric path of the node.
    pub oid: Oid,
}

impl DefinitionNode {
    /// Canonical textual form, `MODULE::name`.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}{MODULE_SEPARATOR}{}", self.module, self.name)
    }
}

/// Result of a search by numeric path.
///
/// `node` is the deepest named node that is a prefix of the requested path;
/// `remaining` holds the arcs below it (empty for an exact hit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Deepest matching named node.
    pub node: DefinitionNode,
    /// Arcs not covered by `node`.
    pub remaining: Vec<u32>,
}

impl SearchResult {
    /// True if the path named `node` exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Canonical text: `MODULE::name`, followed by `.arc` for every
    /// remaining arc.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = self.node.text();
        for arc in &self.remaining {
            text.push('.');
            text.push_str(&arc.to_string());
        }
        text
    }
}

/// Storage for imported modules with lookup by name and by numeric path.
///
/// Lookups reflect the state as of the last [`refresh`](Self::refresh);
/// [`import`](Self::import) only stages modules.
pub trait DefinitionTree {
    /// Resolve `module::name` to its node.
    ///
    /// # Errors
    ///
    /// [`LookupError::ModuleNotFound`] or [`LookupError::NameNotFound`].
    fn find(&self, module: &str, name: &str) -> Result<DefinitionNode, LookupError>;

    /// Find the deepest named node covering `oid`.
    ///
    /// # Errors
    ///
    /// [`LookupError::OidNotFound`] when no named node is a prefix of `oid`.
    fn search(&self, oid: &Oid) -> Result<SearchResult, LookupError>;

    /// Stage modules for the next refresh.
    fn import(&mut self, modules: Vec<ModuleDefinition>);

    /// Recompute internal lookup structures from everything imported.
    fn refresh(&mut self);

    /// Modules currently held by the tree, staged ones included. A cache
    /// written from a tree holds exactly these.
    fn modules(&self) -> &[ModuleDefinition];
}
