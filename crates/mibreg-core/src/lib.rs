//! mibreg-core: OID translation and namespace resolution
//!
//! This crate holds the I/O-free half of the object registry:
//!
//! - [`Oid`] numeric paths and [`TextualReference`] parsing (`MODULE::name.idx`)
//! - translation over any [`DefinitionTree`] ([`translate`] module)
//! - a lenient SMI definition parser ([`parser`]) producing [`ModuleDefinition`]s
//! - [`Namespace`], the built-in OID tree implementation
//!
//! It is `no_std` compatible; file access, compile orchestration and change
//! notification live in `mibreg-std`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod definition;
pub mod error;
pub mod lexer;
pub mod namespace;
pub mod oid;
pub mod parser;
pub mod reference;
pub mod trace;
pub mod translate;
pub mod tree;
pub mod variable;

pub use definition::{Definition, ImportClause, ModuleDefinition, NodeKind, OidComponent};
pub use error::{FormatReason, LookupError, TranslateError};
pub use lexer::{Diagnostic, Severity, Span};
pub use namespace::Namespace;
pub use oid::Oid;
pub use reference::TextualReference;
pub use tree::{DefinitionNode, DefinitionTree, SearchResult};
pub use variable::{Value, Variable};
