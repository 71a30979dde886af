//! Structured trace events emitted while the namespace is rebuilt.
//!
//! The core crate has no logger of its own. Callers plug in a [`Tracer`]
//! (`mibreg-std` forwards to `tracing`); [`NoopTracer`] discards everything.

use crate::oid::Oid;

/// Trace verbosity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Refresh boundaries and summary counts.
    Info,
    /// Per-pass progress and unresolved definitions.
    Debug,
    /// Every resolved definition.
    Trace,
}

/// Events emitted by [`Namespace`](crate::Namespace).
#[derive(Clone, Debug)]
pub enum TraceEvent<'a> {
    /// A refresh is starting.
    RefreshStart {
        /// Number of imported modules.
        modules: usize,
    },
    /// A refresh has finished.
    RefreshEnd {
        /// Nodes in the rebuilt tree.
        nodes: usize,
        /// Definitions that could not be placed.
        unresolved: usize,
    },
    /// An imported module replaced one with the same name.
    ModuleReplaced {
        /// Module name.
        module: &'a str,
    },
    /// A resolution pass is starting.
    PassStart {
        /// Pass number (0-indexed).
        pass: usize,
        /// Definitions still waiting.
        pending: usize,
    },
    /// A resolution pass has ended.
    PassEnd {
        /// Pass number (0-indexed).
        pass: usize,
        /// Definitions placed in this pass.
        resolved: usize,
        /// Definitions still waiting.
        remaining: usize,
    },
    /// A definition was placed in the tree.
    Resolved {
        /// Defining module.
        module: &'a str,
        /// Definition name.
        name: &'a str,
        /// Resulting path.
        oid: &'a Oid,
    },
    /// A definition could not be placed.
    Unresolved {
        /// Defining module.
        module: &'a str,
        /// Definition name.
        name: &'a str,
        /// The component that failed to resolve.
        component: &'a str,
    },
}

/// Receiver for trace events.
pub trait Tracer {
    /// Most verbose level to emit. Default: [`TraceLevel::Info`].
    fn level(&self) -> TraceLevel {
        TraceLevel::Info
    }

    /// Called for each event at or below [`level`](Self::level).
    fn trace(&mut self, level: TraceLevel, event: TraceEvent<'_>);
}

/// Discards every event.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn level(&self) -> TraceLevel {
        TraceLevel::Error
    }

    fn trace(&mut self, _level: TraceLevel, _event: TraceEvent<'_>) {}
}

/// Emit an event if the tracer's level permits; the event expression is
/// not evaluated otherwise.
#[macro_export]
macro_rules! trace_event {
    ($tracer:expr, $level:expr, $event:expr) => {
        if $level <= $tracer.level() {
            $tracer.trace($level, $event);
        }
    };
}
