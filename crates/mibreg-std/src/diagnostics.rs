//! Located compiler diagnostics, per-compile reports and the lifetime log.

use std::fmt;
use std::path::{Path, PathBuf};

use mibreg_core::{Diagnostic, Severity};

/// A diagnostic tied to a file, line and column (both 1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// File the diagnostic refers to.
    pub path: PathBuf,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in bytes.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
}

impl CompilerDiagnostic {
    /// Locate a parser diagnostic within `path`.
    #[must_use]
    pub fn locate(path: &Path, lines: &LineIndex, diagnostic: &Diagnostic) -> Self {
        let (line, column) = lines.line_col(diagnostic.span.start as usize);
        Self {
            severity: diagnostic.severity,
            path: path.to_path_buf(),
            line,
            column,
            message: diagnostic.message.clone(),
        }
    }

    /// True for errors.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}:{}: {severity}: {}",
            self.path.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Byte offsets of line starts, for offset to line/column mapping.
#[derive(Clone, Debug)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `source`.
    #[must_use]
    pub fn new(source: &[u8]) -> Self {
        let mut offsets = vec![0];
        offsets.extend(
            source
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { offsets }
    }

    /// 1-based line and column of a byte offset.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.offsets.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        (line + 1, offset - self.offsets[line] + 1)
    }
}

/// What one compile call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Files handed to the parser, in order.
    pub files: Vec<PathBuf>,
    /// Names of the modules imported.
    pub modules: Vec<String>,
    /// Errors produced by this call.
    pub errors: Vec<CompilerDiagnostic>,
    /// Warnings produced by this call.
    pub warnings: Vec<CompilerDiagnostic>,
}

impl CompileReport {
    /// True if any file produced an error diagnostic.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Append-only record of every diagnostic a registry has produced.
///
/// Entries survive across compiles until the owner calls
/// [`clear`](Self::clear).
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<CompilerDiagnostic>,
}

impl DiagnosticLog {
    /// Append diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = CompilerDiagnostic>) {
        self.entries.extend(diagnostics);
    }

    /// Every entry, in the order recorded.
    #[must_use]
    pub fn entries(&self) -> &[CompilerDiagnostic] {
        &self.entries
    }

    /// Error entries.
    pub fn errors(&self) -> impl Iterator<Item = &CompilerDiagnostic> {
        self.entries.iter().filter(|d| d.is_error())
    }

    /// Warning entries.
    pub fn warnings(&self) -> impl Iterator<Item = &CompilerDiagnostic> {
        self.entries.iter().filter(|d| !d.is_error())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
