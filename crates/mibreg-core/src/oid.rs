//! Numeric object identifiers.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// A numeric path through the OID tree, e.g. `1.3.6.1.2.1.2.2`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: Vec<u32>,
}

/// Error returned when dotted notation cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid arc {position} in dotted OID")]
pub struct ParseOidError {
    /// Zero-based position of the offending arc.
    pub position: usize,
}

impl Oid {
    /// Create an OID that owns the given arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    /// Parse dotted notation. A leading dot (`.1.3.6`) is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOidError`] if any arc is empty or not a `u32`.
    pub fn from_dotted(s: &str) -> Result<Self, ParseOidError> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split('.')
            .enumerate()
            .map(|(position, arc)| {
                if arc.bytes().all(|b| b.is_ascii_digit()) {
                    arc.parse().map_err(|_| ParseOidError { position })
                } else {
                    Err(ParseOidError { position })
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The arcs of this OID.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// True if the OID has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Last arc, if any.
    #[must_use]
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// The OID one level up, or `None` for single-arc and empty OIDs.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.arcs.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::from(rest)),
            _ => None,
        }
    }

    /// A new OID with `arc` appended.
    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Self::new(arcs)
    }

    /// Append an arc in place.
    pub fn push(&mut self, arc: u32) {
        self.arcs.push(arc);
    }

    /// True if `self` is `other` or one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Self::new(arcs)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::new(arcs.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs.to_vec())
    }
}

impl FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dotted(s)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
            for arc in arcs {
                write!(f, ".{arc}")?;
            }
        }
        Ok(())
    }
}
