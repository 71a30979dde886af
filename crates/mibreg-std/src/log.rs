//! Forward namespace trace events to `tracing`.

use mibreg_core::trace::{TraceEvent, TraceLevel, Tracer};
use tracing::{debug, info, trace, warn, Level};

/// [`Tracer`] that emits every event through the `tracing` macros.
///
/// The verbosity follows whatever subscriber the application installed, so
/// per-definition events are only built when `TRACE` is enabled for this
/// crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn level(&self) -> TraceLevel {
        if tracing::enabled!(Level::TRACE) {
            TraceLevel::Trace
        } else if tracing::enabled!(Level::DEBUG) {
            TraceLevel::Debug
        } else {
            TraceLevel::Info
        }
    }

    fn trace(&mut self, _level: TraceLevel, event: TraceEvent<'_>) {
        match event {
            TraceEvent::RefreshStart { modules } => {
                info!(modules, "namespace refresh started");
            }
            TraceEvent::RefreshEnd { nodes, unresolved } if unresolved > 0 => {
                warn!(nodes, unresolved, "namespace refreshed with unresolved definitions");
            }
            TraceEvent::RefreshEnd { nodes, .. } => {
                info!(nodes, "namespace refreshed");
            }
            TraceEvent::ModuleReplaced { module } => {
                info!(module, "module replaced by newer import");
            }
            TraceEvent::PassStart { pass, pending } => {
                debug!(pass, pending, "resolution pass started");
            }
            TraceEvent::PassEnd {
                pass,
                resolved,
                remaining,
            } => {
                debug!(pass, resolved, remaining, "resolution pass finished");
            }
            TraceEvent::Resolved { module, name, oid } => {
                trace!(module, name, oid = %oid, "definition placed");
            }
            TraceEvent::Unresolved {
                module,
                name,
                component,
            } => {
                debug!(module, name, component, "definition unresolved");
            }
        }
    }
}
