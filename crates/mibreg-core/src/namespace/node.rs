//! Arena nodes of the namespace tree.
//!
//! `NodeId` wraps a `NonZeroU32` so `Option<NodeId>` costs nothing extra.

// Arena size is limited to u32::MAX nodes
#![allow(clippy::cast_possible_truncation)]

use crate::definition::NodeKind;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroU32;

/// Index of a node in the namespace arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Create from a 0-based arena index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index as u32))
    }

    /// The 0-based arena index.
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A name placed at a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeLabel {
    /// Defining module.
    pub module: String,
    /// Symbol name.
    pub name: String,
}

/// A node in the OID tree.
#[derive(Clone, Debug)]
pub struct OidNode {
    /// Arc below the parent.
    pub arc: u32,
    /// Parent, or `None` for a root.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
    /// Kind taken from the most specific definition.
    pub kind: NodeKind,
    /// Every name placed here, first one primary.
    pub labels: Vec<NodeLabel>,
}

impl OidNode {
    /// An unnamed internal node.
    #[must_use]
    pub fn new(arc: u32, parent: Option<NodeId>) -> Self {
        Self {
            arc,
            parent,
            children: Vec::new(),
            kind: NodeKind::Internal,
            labels: Vec::new(),
        }
    }

    /// The first label placed here.
    #[must_use]
    pub fn primary_label(&self) -> Option<&NodeLabel> {
        self.labels.first()
    }

    /// Add a label unless the same module already placed the same name.
    pub fn add_label(&mut self, module: &str, name: &str) {
        if !self
            .labels
            .iter()
            .any(|label| label.module == module && label.name == name)
        {
            self.labels.push(NodeLabel {
                module: module.into(),
                name: name.into(),
            });
        }
    }

    /// Merge a definition's kind. A specific kind replaces `Internal` and
    /// the generic `Node`; it is never downgraded.
    pub fn merge_kind(&mut self, kind: NodeKind) {
        match (self.kind, kind) {
            (_, NodeKind::Internal) => {}
            (NodeKind::Internal, _) => self.kind = kind,
            (NodeKind::Node, k) if k != NodeKind::Node => self.kind = k,
            _ => {}
        }
    }
}
