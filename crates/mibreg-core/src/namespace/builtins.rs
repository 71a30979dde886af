//! Built-in OID roots.
//!
//! The SMI base modules are not shipped as files; their OID roots are
//! seeded directly and answer for any import from a base module.

/// Module the built-in roots are registered under. Lookups through any
/// other base module reach the same nodes.
pub const BUILTIN_MODULE: &str = "SNMPv2-SMI";

/// Roots visible from every module without an import.
pub const GLOBAL_ROOTS: &[&str] = &["ccitt", "iso", "joint-iso-ccitt"];

/// A seeded node: name, arc, index of the parent in [`BUILTIN_OID_NODES`].
#[derive(Clone, Copy, Debug)]
pub struct BuiltinOidNode {
    /// Canonical name.
    pub name: &'static str,
    /// Arc below the parent.
    pub arc: u32,
    /// Parent index, `None` for a root.
    pub parent: Option<usize>,
}

const fn node(name: &'static str, arc: u32, parent: Option<usize>) -> BuiltinOidNode {
    BuiltinOidNode { name, arc, parent }
}

/// Seeded nodes; every parent precedes its children.
pub static BUILTIN_OID_NODES: &[BuiltinOidNode] = &[
    node("ccitt", 0, None),                // 0
    node("iso", 1, None),                  // 1
    node("joint-iso-ccitt", 2, None),      // 2
    node("zeroDotZero", 0, Some(0)),       // 3
    node("org", 3, Some(1)),               // 4
    node("dod", 6, Some(4)),               // 5
    node("internet", 1, Some(5)),          // 6
    node("directory", 1, Some(6)),         // 7
    node("mgmt", 2, Some(6)),              // 8
    node("mib-2", 1, Some(8)),             // 9
    node("transmission", 10, Some(9)),     // 10
    node("experimental", 3, Some(6)),      // 11
    node("private", 4, Some(6)),           // 12
    node("enterprises", 1, Some(12)),      // 13
    node("security", 5, Some(6)),          // 14
    node("snmpV2", 6, Some(6)),            // 15
    node("snmpDomains", 1, Some(15)),      // 16
    node("snmpProxys", 2, Some(15)),       // 17
    node("snmpModules", 3, Some(15)),      // 18
];

/// SMI base modules. Imports from these fall back to the built-in roots
/// when the module is not loaded or does not define the symbol.
pub static BASE_MODULES: &[&str] = &[
    "SNMPv2-SMI",
    "SNMPv2-TC",
    "SNMPv2-CONF",
    "RFC1155-SMI",
    "RFC1065-SMI",
    "RFC-1212",
    "RFC-1215",
];

/// True for an SMI base module name.
#[must_use]
pub fn is_base_module(name: &str) -> bool {
    BASE_MODULES.contains(&name)
}
