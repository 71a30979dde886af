//! mibreg-std: filesystem-backed object registry
//!
//! Wraps a [`DefinitionTree`](mibreg_core::DefinitionTree) and a
//! [`DefinitionParser`] in a [`Registry`] that compiles MIB files, folders
//! and cached module sets, translates between textual and numeric OIDs, and
//! notifies subscribers after every refresh.
//!
//! ```no_run
//! use mibreg_std::Registry;
//!
//! let mut registry = Registry::with_defaults();
//! let report = registry.compile_folder("/usr/share/snmp/mibs", "*.txt")?;
//! println!("{} modules, {} errors", report.modules.len(), report.errors.len());
//!
//! let oid = registry.translate("IF-MIB::ifDescr.1")?;
//! assert_eq!(registry.translate_oid(&oid)?, "IF-MIB::ifDescr.1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod diagnostics;
pub mod error;
mod folder;
pub mod log;
pub mod notify;
pub mod parser;
pub mod registry;

pub use diagnostics::{CompileReport, CompilerDiagnostic, DiagnosticLog};
pub use error::{CompileError, RegistryError};
pub use log::LogTracer;
pub use notify::{ChangeNotifier, SubscriberError, SubscriptionId};
pub use parser::{DefinitionParser, MibParser};
pub use registry::Registry;

pub use mibreg_core;
