//! Arena-backed OID tree.
//!
//! [`Namespace`] is the [`DefinitionTree`] shipped with the crate. Imported
//! modules are stored as-is; [`refresh`](DefinitionTree::refresh) throws the
//! tree away and rebuilds it from the built-in roots plus every module,
//! resolving forward references over several passes.
//!
//! # Name scope
//!
//! A name in an OID value resolves, in order, against:
//!
//! 1. definitions of the module itself,
//! 2. the module named in its IMPORTS for that symbol (followed transitively),
//! 3. the built-in roots, when the import names an SMI base module,
//! 4. `ccitt`, `iso` and `joint-iso-ccitt`, visible everywhere.

mod builtins;
mod node;
mod resolve;

pub use builtins::{is_base_module, BUILTIN_MODULE};
pub use node::{NodeId, NodeLabel, OidNode};

use crate::definition::{ModuleDefinition, NodeKind};
use crate::error::LookupError;
use crate::oid::Oid;
use crate::trace::{NoopTracer, TraceEvent, TraceLevel, Tracer};
use crate::trace_event;
use crate::tree::{DefinitionNode, DefinitionTree, SearchResult};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A definition the last refresh could not place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedDefinition {
    /// Defining module.
    pub module: String,
    /// Definition name.
    pub name: String,
    /// The OID component that never resolved.
    pub component: String,
}

/// OID tree built from imported modules.
pub struct Namespace {
    modules: Vec<ModuleDefinition>,
    seeded: bool,
    nodes: Vec<OidNode>,
    roots: Vec<NodeId>,
    oid_index: BTreeMap<Oid, NodeId>,
    symbols: BTreeMap<String, BTreeMap<String, NodeId>>,
    module_index: BTreeMap<String, usize>,
    unresolved: Vec<UnresolvedDefinition>,
    tracer: Option<Box<dyn Tracer + Send>>,
}

impl Namespace {
    /// A namespace seeded with the built-in SMI roots (`iso`, `internet`,
    /// `enterprises`, ...) under [`BUILTIN_MODULE`].
    #[must_use]
    pub fn new() -> Self {
        let mut namespace = Self::with_seed(true);
        namespace.rebuild(&mut NoopTracer);
        namespace
    }

    /// A namespace with no built-in roots. Every path must come from
    /// imported modules.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_seed(false)
    }

    fn with_seed(seeded: bool) -> Self {
        Self {
            modules: Vec::new(),
            seeded,
            nodes: Vec::new(),
            roots: Vec::new(),
            oid_index: BTreeMap::new(),
            symbols: BTreeMap::new(),
            module_index: BTreeMap::new(),
            unresolved: Vec::new(),
            tracer: None,
        }
    }

    /// Install a tracer used by every later import and refresh.
    #[must_use]
    pub fn with_tracer(mut self, tracer: impl Tracer + Send + 'static) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Replace or remove the installed tracer.
    pub fn set_tracer(&mut self, tracer: Option<Box<dyn Tracer + Send>>) {
        self.tracer = tracer;
    }

    /// Refresh, reporting to `tracer` instead of the installed one.
    pub fn refresh_traced<T: Tracer>(&mut self, tracer: &mut T) {
        self.rebuild(tracer);
    }

    /// Node at `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OidNode> {
        self.nodes.get(id.to_index())
    }

    /// Node at exactly `oid`, named or not.
    #[must_use]
    pub fn node_id(&self, oid: &Oid) -> Option<NodeId> {
        self.oid_index.get(oid).copied()
    }

    /// Kind of the node at exactly `oid`.
    #[must_use]
    pub fn node_kind(&self, oid: &Oid) -> Option<NodeKind> {
        self.node_id(oid)
            .and_then(|id| self.node(id))
            .map(|node| node.kind)
    }

    /// Full path of a node.
    #[must_use]
    pub fn oid_of(&self, id: NodeId) -> Oid {
        let mut arcs = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            arcs.push(node.arc);
            current = node.parent;
        }
        arcs.reverse();
        Oid::new(arcs)
    }

    /// Definitions the last refresh could not place.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedDefinition] {
        &self.unresolved
    }

    /// Nodes in the tree, named or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Imported modules, counting staged ones.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// An imported module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleDefinition> {
        self.modules.iter().find(|m| m.name == name)
    }

    fn symbol(&self, module: &str, name: &str) -> Option<NodeId> {
        self.symbols.get(module)?.get(name).copied()
    }

    fn is_loaded(&self, module: &str) -> bool {
        self.module_index.contains_key(module) || (self.seeded && is_base_module(module))
    }

    fn definition_node(&self, label: &NodeLabel, oid: Oid) -> DefinitionNode {
        DefinitionNode {
            module: label.module.clone(),
            name: label.name.clone(),
            oid,
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("modules", &self.modules.len())
            .field("seeded", &self.seeded)
            .field("nodes", &self.nodes.len())
            .field("unresolved", &self.unresolved.len())
            .field("traced", &self.tracer.is_some())
            .finish_non_exhaustive()
    }
}

impl DefinitionTree for Namespace {
    fn find(&self, module: &str, name: &str) -> Result<DefinitionNode, LookupError> {
        // Any SMI base module answers for the built-in roots.
        let found = self.symbol(module, name).or_else(|| {
            if self.seeded && is_base_module(module) {
                self.symbol(BUILTIN_MODULE, name)
            } else {
                None
            }
        });
        if let Some(id) = found {
            return Ok(DefinitionNode {
                module: module.into(),
                name: name.into(),
                oid: self.oid_of(id),
            });
        }
        if self.is_loaded(module) {
            Err(LookupError::NameNotFound {
                module: module.into(),
                name: name.into(),
            })
        } else {
            Err(LookupError::ModuleNotFound {
                module: module.into(),
            })
        }
    }

    fn search(&self, oid: &Oid) -> Result<SearchResult, LookupError> {
        let mut best: Option<(&NodeLabel, usize)> = None;
        let mut siblings = &self.roots;

        for (depth, &arc) in oid.arcs().iter().enumerate() {
            let Some(node) = siblings
                .iter()
                .filter_map(|&id| self.node(id))
                .find(|node| node.arc == arc)
            else {
                break;
            };
            if let Some(label) = node.primary_label() {
                best = Some((label, depth + 1));
            }
            siblings = &node.children;
        }

        let Some((label, depth)) = best else {
            return Err(LookupError::OidNotFound { oid: oid.clone() });
        };
        let (matched, remaining) = oid.arcs().split_at(depth);
        Ok(SearchResult {
            node: self.definition_node(label, Oid::from(matched)),
            remaining: remaining.to_vec(),
        })
    }

    fn import(&mut self, modules: Vec<ModuleDefinition>) {
        for module in modules {
            if let Some(slot) = self.modules.iter_mut().find(|m| m.name == module.name) {
                if let Some(tracer) = self.tracer.as_deref_mut() {
                    trace_event!(
                        tracer,
                        TraceLevel::Info,
                        TraceEvent::ModuleReplaced {
                            module: &module.name
                        }
                    );
                }
                *slot = module;
            } else {
                self.modules.push(module);
            }
        }
    }

    fn refresh(&mut self) {
        let mut installed = self.tracer.take();
        match installed.as_deref_mut() {
            Some(tracer) => self.rebuild(tracer),
            None => self.rebuild(&mut NoopTracer),
        }
        self.tracer = installed;
    }

    fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }
}
