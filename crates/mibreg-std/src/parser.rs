//! The file-level parser contract and its SMI implementation.

use std::fs;
use std::path::Path;

use mibreg_core::parser::Parser;
use mibreg_core::{ModuleDefinition, Severity};

use crate::diagnostics::{CompilerDiagnostic, LineIndex};
use crate::error::CompileError;

/// Turns one definition file into modules.
///
/// Problems inside the file go to the `errors` and `warnings` sinks and do
/// not fail the call; `Err` means the file produced nothing usable.
pub trait DefinitionParser {
    /// Compile the file at `path`.
    ///
    /// # Errors
    ///
    /// [`CompileError`] when the file cannot be processed at all.
    fn compile(
        &self,
        path: &Path,
        errors: &mut Vec<CompilerDiagnostic>,
        warnings: &mut Vec<CompilerDiagnostic>,
    ) -> Result<Vec<ModuleDefinition>, CompileError>;
}

/// SMIv1/SMIv2 definition parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct MibParser;

impl MibParser {
    /// Parse in-memory source as if it were read from `path`.
    pub fn compile_source(
        &self,
        path: &Path,
        source: &[u8],
        errors: &mut Vec<CompilerDiagnostic>,
        warnings: &mut Vec<CompilerDiagnostic>,
    ) -> Vec<ModuleDefinition> {
        let (modules, diagnostics) = Parser::new(source).parse_modules();
        if !diagnostics.is_empty() {
            let lines = LineIndex::new(source);
            for diagnostic in &diagnostics {
                let located = CompilerDiagnostic::locate(path, &lines, diagnostic);
                match diagnostic.severity {
                    Severity::Error => errors.push(located),
                    Severity::Warning => warnings.push(located),
                }
            }
        }
        modules
    }
}

impl DefinitionParser for MibParser {
    fn compile(
        &self,
        path: &Path,
        errors: &mut Vec<CompilerDiagnostic>,
        warnings: &mut Vec<CompilerDiagnostic>,
    ) -> Result<Vec<ModuleDefinition>, CompileError> {
        let source = fs::read(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.compile_source(path, &source, errors, warnings))
    }
}
