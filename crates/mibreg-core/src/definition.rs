//! Module definitions produced by the parser and consumed by a tree.

use alloc::string::String;
use alloc::vec::Vec;

/// Node kind inferred from the defining macro.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Implicit node created by an OID path, with no definition of its own.
    #[default]
    Internal,
    /// OBJECT IDENTIFIER value, OBJECT-IDENTITY or MODULE-IDENTITY.
    Node,
    /// OBJECT-TYPE outside a table.
    Scalar,
    /// OBJECT-TYPE whose SYNTAX is `SEQUENCE OF`.
    Table,
    /// OBJECT-TYPE with an INDEX or AUGMENTS clause.
    Row,
    /// OBJECT-TYPE whose parent is a row.
    Column,
    /// NOTIFICATION-TYPE or TRAP-TYPE.
    Notification,
    /// OBJECT-GROUP or NOTIFICATION-GROUP.
    Group,
    /// MODULE-COMPLIANCE.
    Compliance,
    /// AGENT-CAPABILITIES.
    Capabilities,
}

impl NodeKind {
    /// OBJECT-TYPE kinds.
    #[must_use]
    pub fn is_object_type(&self) -> bool {
        matches!(self, Self::Scalar | Self::Table | Self::Row | Self::Column)
    }

    /// Structural table check, based on the parsed SYNTAX clause.
    #[must_use]
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table)
    }
}

/// One component of an OID value, `{ iso org(3) 6 }`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OidComponent {
    /// A symbol: `internet`, `ifEntry`.
    Name(String),
    /// A bare arc: `1`.
    Number(u32),
    /// A labelled arc: `org(3)`.
    NamedNumber {
        /// Label.
        name: String,
        /// Arc.
        number: u32,
    },
}

impl OidComponent {
    /// The arc, if the component carries one.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Name(_) => None,
            Self::Number(n) | Self::NamedNumber { number: n, .. } => Some(*n),
        }
    }

    /// The label, if the component carries one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) | Self::NamedNumber { name, .. } => Some(name),
            Self::Number(_) => None,
        }
    }
}

/// `sym1, sym2 FROM MODULE`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportClause {
    /// Imported symbols.
    pub symbols: Vec<String>,
    /// Source module.
    pub from_module: String,
}

/// A definition that places a name in the OID tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    /// Symbol name.
    pub name: String,
    /// Kind inferred from the macro and its clauses.
    pub kind: NodeKind,
    /// The `::= { ... }` value.
    pub oid: Vec<OidComponent>,
}

impl Definition {
    /// Create a definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind, oid: Vec<OidComponent>) -> Self {
        Self {
            name: name.into(),
            kind,
            oid,
        }
    }
}

/// A compiled module: header, imports and OID-bearing definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleDefinition {
    /// Module name from `NAME DEFINITIONS ::= BEGIN`.
    pub name: String,
    /// IMPORTS clauses in source order.
    pub imports: Vec<ImportClause>,
    /// Definitions in source order.
    pub definitions: Vec<Definition>,
    /// Name of the MODULE-IDENTITY definition, if present.
    pub identity: Option<String>,
}

impl ModuleDefinition {
    /// Create an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a definition (builder style).
    #[must_use]
    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Append an import clause (builder style).
    #[must_use]
    pub fn with_import(mut self, from_module: impl Into<String>, symbols: &[&str]) -> Self {
        self.imports.push(ImportClause {
            symbols: symbols.iter().map(|s| String::from(*s)).collect(),
            from_module: from_module.into(),
        });
        self
    }

    /// Source module of an imported symbol.
    #[must_use]
    pub fn import_source(&self, symbol: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|clause| clause.symbols.iter().any(|s| s == symbol))
            .map(|clause| clause.from_module.as_str())
    }

    /// A definition by name.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}
