//! Variable bindings: a numeric path with an optional value.

use crate::error::TranslateError;
use crate::oid::Oid;
use crate::translate::translate;
use crate::tree::DefinitionTree;
use alloc::vec::Vec;

/// SMI value carried by a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// INTEGER / Integer32.
    Integer32(i32),
    /// OCTET STRING.
    OctetString(Vec<u8>),
    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),
    /// IpAddress.
    IpAddress([u8; 4]),
    /// Counter32.
    Counter32(u32),
    /// Gauge32 / Unsigned32.
    Gauge32(u32),
    /// TimeTicks, in hundredths of a second.
    TimeTicks(u32),
    /// Opaque.
    Opaque(Vec<u8>),
    /// Counter64.
    Counter64(u64),
    /// NULL.
    Null,
}

impl Value {
    /// SMI type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer32(_) => "Integer32",
            Self::OctetString(_) => "OCTET STRING",
            Self::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Self::IpAddress(_) => "IpAddress",
            Self::Counter32(_) => "Counter32",
            Self::Gauge32(_) => "Gauge32",
            Self::TimeTicks(_) => "TimeTicks",
            Self::Opaque(_) => "Opaque",
            Self::Counter64(_) => "Counter64",
            Self::Null => "NULL",
        }
    }
}

/// A numeric path paired with an optional value. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    oid: Oid,
    value: Option<Value>,
}

impl Variable {
    /// Pair a path with a value.
    #[must_use]
    pub fn new(oid: Oid, value: Option<Value>) -> Self {
        Self { oid, value }
    }

    /// Resolve `textual` against `tree` and pair the result with `value`.
    ///
    /// # Errors
    ///
    /// Whatever [`translate`] fails with.
    pub fn from_reference<T: DefinitionTree + ?Sized>(
        tree: &T,
        textual: &str,
        value: Option<Value>,
    ) -> Result<Self, TranslateError> {
        Ok(Self::new(translate(tree, textual)?, value))
    }

    /// The numeric path.
    #[must_use]
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// The value, if one was supplied.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Split into path and value.
    #[must_use]
    pub fn into_parts(self) -> (Oid, Option<Value>) {
        (self.oid, self.value)
    }
}
