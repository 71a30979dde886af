//! Tree rebuild: seeding, multi-pass OID resolution, kind inference.

use super::builtins::{is_base_module, BUILTIN_MODULE, BUILTIN_OID_NODES, GLOBAL_ROOTS};
use super::node::{NodeId, OidNode};
use super::{Namespace, UnresolvedDefinition};
use crate::definition::{NodeKind, OidComponent};
use crate::oid::Oid;
use crate::trace::{TraceEvent, TraceLevel, Tracer};
use crate::trace_event;
use alloc::string::String;
use alloc::vec::Vec;

/// One step of a resolved OID value.
#[derive(Clone, Copy)]
enum Step {
    /// Jump to a named node.
    Node(NodeId),
    /// Descend one arc, creating the node if needed.
    Arc(u32),
}

enum Plan {
    Ready(Vec<Step>),
    Blocked(String),
}

impl Namespace {
    pub(super) fn rebuild(&mut self, tracer: &mut dyn Tracer) {
        trace_event!(
            tracer,
            TraceLevel::Info,
            TraceEvent::RefreshStart {
                modules: self.modules.len()
            }
        );

        self.reset();
        if self.seeded {
            self.seed_builtins();
        }

        let mut pending: Vec<(usize, usize)> = self
            .modules
            .iter()
            .enumerate()
            .flat_map(|(m, module)| (0..module.definitions.len()).map(move |d| (m, d)))
            .collect();

        // Each pass places at least one definition or ends resolution, so
        // this runs at most once per definition.
        for pass in 0.. {
            if pending.is_empty() {
                break;
            }
            trace_event!(
                tracer,
                TraceLevel::Debug,
                TraceEvent::PassStart {
                    pass,
                    pending: pending.len()
                }
            );

            let before = pending.len();
            let mut waiting = Vec::new();
            for (m, d) in core::mem::take(&mut pending) {
                match self.plan(m, d) {
                    Plan::Ready(steps) => self.place(m, d, &steps, tracer),
                    Plan::Blocked(component) => waiting.push((m, d, component)),
                }
            }

            let resolved = before - waiting.len();
            trace_event!(
                tracer,
                TraceLevel::Debug,
                TraceEvent::PassEnd {
                    pass,
                    resolved,
                    remaining: waiting.len()
                }
            );

            if resolved == 0 {
                for (m, d, component) in waiting {
                    self.record_unresolved(m, d, component, tracer);
                }
                break;
            }
            pending = waiting.into_iter().map(|(m, d, _)| (m, d)).collect();
        }

        self.infer_columns();
        self.rebuild_oid_index();

        trace_event!(
            tracer,
            TraceLevel::Info,
            TraceEvent::RefreshEnd {
                nodes: self.nodes.len(),
                unresolved: self.unresolved.len()
            }
        );
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.oid_index.clear();
        self.symbols.clear();
        self.unresolved.clear();
        self.module_index = self
            .modules
            .iter()
            .enumerate()
            .map(|(i, module)| (module.name.clone(), i))
            .collect();
    }

    fn seed_builtins(&mut self) {
        let mut ids: Vec<NodeId> = Vec::with_capacity(BUILTIN_OID_NODES.len());
        for builtin in BUILTIN_OID_NODES {
            let parent = builtin.parent.map(|i| ids[i]);
            let id = self.child_or_insert(parent, builtin.arc);
            self.label(id, BUILTIN_MODULE, builtin.name, NodeKind::Node);
            ids.push(id);
        }
    }

    /// Resolve every component of a definition's OID value, without
    /// touching the tree.
    fn plan(&self, m: usize, d: usize) -> Plan {
        let definition = &self.modules[m].definitions[d];
        if definition.oid.is_empty() {
            return Plan::Blocked(String::new());
        }

        let mut steps = Vec::with_capacity(definition.oid.len());
        for (i, component) in definition.oid.iter().enumerate() {
            let step = match component {
                OidComponent::Name(name) => match self.lookup(m, name) {
                    Some(id) => Step::Node(id),
                    None => return Plan::Blocked(name.clone()),
                },
                OidComponent::Number(arc) => Step::Arc(*arc),
                OidComponent::NamedNumber { name, number } => {
                    // `{ iso(1) 3 }` may name a known root; otherwise the
                    // arc is authoritative.
                    let root = if i == 0 { self.lookup(m, name) } else { None };
                    root.map_or(Step::Arc(*number), Step::Node)
                }
            };
            steps.push(step);
        }
        Plan::Ready(steps)
    }

    fn place(&mut self, m: usize, d: usize, steps: &[Step], tracer: &mut dyn Tracer) {
        let mut current = None;
        for step in steps {
            current = Some(match *step {
                Step::Node(id) => id,
                Step::Arc(arc) => self.child_or_insert(current, arc),
            });
        }
        let Some(id) = current else {
            return;
        };

        let module = self.modules[m].name.clone();
        let definition = &self.modules[m].definitions[d];
        let name = definition.name.clone();
        let kind = definition.kind;
        self.label(id, &module, &name, kind);

        trace_event!(
            tracer,
            TraceLevel::Trace,
            TraceEvent::Resolved {
                module: &module,
                name: &name,
                oid: &self.oid_of(id)
            }
        );
    }

    fn label(&mut self, id: NodeId, module: &str, name: &str, kind: NodeKind) {
        if let Some(node) = self.nodes.get_mut(id.to_index()) {
            node.add_label(module, name);
            node.merge_kind(kind);
        }
        self.symbols
            .entry(module.into())
            .or_default()
            .entry(name.into())
            .or_insert(id);
    }

    fn record_unresolved(&mut self, m: usize, d: usize, component: String, tracer: &mut dyn Tracer) {
        let module = &self.modules[m];
        let definition = &module.definitions[d];
        trace_event!(
            tracer,
            TraceLevel::Debug,
            TraceEvent::Unresolved {
                module: &module.name,
                name: &definition.name,
                component: &component
            }
        );
        self.unresolved.push(UnresolvedDefinition {
            module: module.name.clone(),
            name: definition.name.clone(),
            component,
        });
    }

    fn child_or_insert(&mut self, parent: Option<NodeId>, arc: u32) -> NodeId {
        let siblings = match parent {
            Some(p) => &self.nodes[p.to_index()].children,
            None => &self.roots,
        };
        if let Some(&existing) = siblings
            .iter()
            .find(|&&id| self.nodes[id.to_index()].arc == arc)
        {
            return existing;
        }

        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(OidNode::new(arc, parent));
        match parent {
            Some(p) => self.nodes[p.to_index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Resolve `symbol` as seen from module `m`.
    fn lookup(&self, m: usize, symbol: &str) -> Option<NodeId> {
        let mut visited = Vec::new();
        self.lookup_in(&self.modules[m].name, symbol, &mut visited)
            .or_else(|| {
                if self.seeded && GLOBAL_ROOTS.contains(&symbol) {
                    self.symbol(BUILTIN_MODULE, symbol)
                } else {
                    None
                }
            })
    }

    fn lookup_in<'a>(
        &'a self,
        module: &'a str,
        symbol: &str,
        visited: &mut Vec<&'a str>,
    ) -> Option<NodeId> {
        if let Some(id) = self.symbol(module, symbol) {
            return Some(id);
        }
        if visited.contains(&module) {
            return None;
        }
        visited.push(module);

        let source = self
            .module_index
            .get(module)
            .and_then(|&i| self.modules[i].import_source(symbol));
        if let Some(id) = source.and_then(|source| self.lookup_in(source, symbol, visited)) {
            return Some(id);
        }

        if self.seeded && is_base_module(module) {
            return self.symbol(BUILTIN_MODULE, symbol);
        }
        None
    }

    fn infer_columns(&mut self) {
        let columns: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                node.kind == NodeKind::Scalar
                    && node
                        .parent
                        .is_some_and(|p| self.nodes[p.to_index()].kind == NodeKind::Row)
            })
            .map(|(i, _)| i)
            .collect();
        for i in columns {
            self.nodes[i].kind = NodeKind::Column;
        }
    }

    fn rebuild_oid_index(&mut self) {
        let mut stack: Vec<(NodeId, Oid)> = self
            .roots
            .iter()
            .map(|&id| (id, Oid::from([self.nodes[id.to_index()].arc])))
            .collect();
        while let Some((id, oid)) = stack.pop() {
            for &child in &self.nodes[id.to_index()].children {
                stack.push((child, oid.child(self.nodes[child.to_index()].arc)));
            }
            self.oid_index.insert(oid, id);
        }
    }
}
