//! The registry: compile orchestration, translation and change notification
//! over an injected tree and parser.

use std::path::{Path, PathBuf};

use mibreg_core::translate;
use mibreg_core::{
    DefinitionTree, ModuleDefinition, Namespace, Oid, TranslateError, Value, Variable,
};
use tracing::{debug, info, warn};

use crate::cache::{self, Fingerprint};
use crate::diagnostics::{CompileReport, DiagnosticLog};
use crate::error::RegistryError;
use crate::folder::matching_files;
use crate::log::LogTracer;
use crate::notify::{ChangeNotifier, SubscriberError, SubscriptionId};
use crate::parser::{DefinitionParser, MibParser};

/// Object registry over a [`DefinitionTree`] and a [`DefinitionParser`].
///
/// Each compile call parses its files, imports every module in one batch,
/// refreshes the tree once and then notifies subscribers. Lookups always
/// see the tree as of the last refresh.
#[derive(Debug)]
pub struct Registry<T = Namespace, P = MibParser> {
    tree: T,
    parser: P,
    notifier: ChangeNotifier,
    log: DiagnosticLog,
}

impl Registry {
    /// A registry over a seeded [`Namespace`] that logs refreshes through
    /// `tracing`, compiling with [`MibParser`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Namespace::new().with_tracer(LogTracer), MibParser)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<T: DefinitionTree, P: DefinitionParser> Registry<T, P> {
    /// A registry over the given collaborators.
    pub fn new(tree: T, parser: P) -> Self {
        Self {
            tree,
            parser,
            notifier: ChangeNotifier::default(),
            log: DiagnosticLog::default(),
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable access to the underlying tree. Changes made here are not
    /// announced to subscribers until the next [`refresh`](Self::refresh).
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    // === Translation ===

    /// Resolve `MODULE::name[.index]` to a numeric path.
    ///
    /// # Errors
    ///
    /// See [`translate::translate`].
    pub fn translate(&self, textual: &str) -> Result<Oid, TranslateError> {
        translate::translate(&self.tree, textual)
    }

    /// Resolve a module and a name (optionally `name.index`).
    ///
    /// # Errors
    ///
    /// See [`translate::translate_qualified`].
    pub fn translate_qualified(&self, module: &str, name: &str) -> Result<Oid, TranslateError> {
        translate::translate_qualified(&self.tree, module, name)
    }

    /// Canonical text for a numeric path.
    ///
    /// # Errors
    ///
    /// See [`translate::translate_oid`].
    pub fn translate_oid(&self, oid: &Oid) -> Result<String, TranslateError> {
        translate::translate_oid(&self.tree, oid)
    }

    /// Naming heuristic: does the canonical text of `oid` end in `Table`?
    ///
    /// # Errors
    ///
    /// See [`translate::is_table_id`].
    pub fn is_table_id(&self, oid: &Oid) -> Result<bool, TranslateError> {
        translate::is_table_id(&self.tree, oid)
    }

    /// Naming heuristic applied to a textual reference.
    ///
    /// # Errors
    ///
    /// See [`translate::validate_table`].
    pub fn validate_table(&self, textual: &str) -> Result<bool, TranslateError> {
        translate::validate_table(&self.tree, textual)
    }

    /// Translate `textual` and pair the path with `value`.
    ///
    /// # Errors
    ///
    /// Whatever [`translate`](Self::translate) fails with.
    pub fn create_variable(
        &self,
        textual: &str,
        value: Option<Value>,
    ) -> Result<Variable, TranslateError> {
        Variable::from_reference(&self.tree, textual, value)
    }

    // === Compilation ===

    /// Compile one file.
    ///
    /// # Errors
    ///
    /// Same as [`compile_files`](Self::compile_files).
    pub fn compile(&mut self, path: impl AsRef<Path>) -> Result<CompileReport, RegistryError> {
        self.compile_files([path])
    }

    /// Compile a batch of files with a single import and a single refresh.
    ///
    /// Every path is checked before the parser runs. If the parser fails
    /// hard on any file, nothing from the batch is imported and the tree is
    /// not refreshed; diagnostics gathered up to that point are still added
    /// to the lifetime log.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidArgument`] for an empty or missing path,
    /// [`RegistryError::Compile`] for a hard parser failure and
    /// [`RegistryError::Subscriber`] if a change subscriber fails.
    pub fn compile_files<I, Q>(&mut self, paths: I) -> Result<CompileReport, RegistryError>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<Path>,
    {
        let files = paths
            .into_iter()
            .map(|path| checked_file(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        info!(files = files.len(), "compiling definition files");

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut modules = Vec::new();
        for file in &files {
            debug!(path = %file.display(), "parsing definition file");
            match self.parser.compile(file, &mut errors, &mut warnings) {
                Ok(parsed) => modules.extend(parsed),
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "compile aborted");
                    self.log.extend(errors.into_iter().chain(warnings));
                    return Err(e.into());
                }
            }
        }

        if !errors.is_empty() {
            warn!(
                errors = errors.len(),
                warnings = warnings.len(),
                "definition files compiled with errors"
            );
        }
        self.log.extend(errors.iter().chain(&warnings).cloned());

        let report = CompileReport {
            files,
            modules: modules.iter().map(|m| m.name.clone()).collect(),
            errors,
            warnings,
        };

        self.tree.import(modules);
        self.refresh()?;

        info!(
            files = report.files.len(),
            modules = report.modules.len(),
            "compile finished"
        );
        Ok(report)
    }

    /// Compile the files directly inside `folder` whose names match the glob
    /// `pattern` (`*`, `?`, `[...]`), in file name order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidArgument`] for an empty argument, a missing
    /// folder or a bad pattern, [`RegistryError::Io`] if the folder cannot
    /// be listed, otherwise as [`compile_files`](Self::compile_files).
    pub fn compile_folder(
        &mut self,
        folder: impl AsRef<Path>,
        pattern: &str,
    ) -> Result<CompileReport, RegistryError> {
        let folder = folder.as_ref();
        if folder.as_os_str().is_empty() {
            return Err(RegistryError::invalid("folder", "must not be empty"));
        }
        if pattern.is_empty() {
            return Err(RegistryError::invalid("pattern", "must not be empty"));
        }

        let folder = std::path::absolute(folder).map_err(|source| RegistryError::Io {
            path: folder.to_path_buf(),
            source,
        })?;
        if !folder.is_dir() {
            return Err(RegistryError::invalid(
                "folder",
                format!("{} is not a directory", folder.display()),
            ));
        }

        let files = matching_files(&folder, pattern)?;
        debug!(
            folder = %folder.display(),
            pattern,
            matched = files.len(),
            "expanded folder"
        );
        self.compile_files(files)
    }

    /// Stage modules in the tree without refreshing.
    pub fn import(&mut self, modules: Vec<ModuleDefinition>) {
        self.tree.import(modules);
    }

    /// Refresh the tree, then run every subscriber in registration order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Subscriber`] with the first subscriber error; later
    /// subscribers are not called. The tree is refreshed regardless.
    pub fn refresh(&mut self) -> Result<(), RegistryError> {
        self.tree.refresh();
        self.notifier.notify().map_err(|e| {
            warn!(error = %e, "change subscriber failed");
            RegistryError::Subscriber(e)
        })
    }

    // === Notification ===

    /// Run `callback` after every refresh.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut() -> Result<(), SubscriberError> + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // === Diagnostics ===

    /// Every diagnostic produced since construction or the last
    /// [`clear_diagnostics`](Self::clear_diagnostics).
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Empty the lifetime diagnostic log.
    pub fn clear_diagnostics(&mut self) {
        self.log.clear();
    }

    // === Cache ===

    /// Write every module the tree holds to a cache file.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Cache`] on serialization or I/O failure.
    pub fn save_cache(
        &self,
        path: impl AsRef<Path>,
        fingerprint: Option<Fingerprint>,
    ) -> Result<(), RegistryError> {
        let modules = self.tree.modules();
        cache::save_cache(path.as_ref(), modules, fingerprint)?;
        debug!(path = %path.as_ref().display(), modules = modules.len(), "cache written");
        Ok(())
    }

    /// Import every module from a cache file and refresh once. Returns the
    /// number of modules loaded.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Cache`] for an unreadable or invalid cache, or
    /// [`RegistryError::Subscriber`].
    pub fn load_cache(&mut self, path: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let modules = cache::load_cache(path.as_ref())?;
        self.import_cached(path.as_ref(), modules)
    }

    /// Like [`load_cache`](Self::load_cache), but the cache must carry
    /// `fingerprint`.
    ///
    /// # Errors
    ///
    /// As [`load_cache`](Self::load_cache), plus a fingerprint mismatch.
    pub fn load_cache_verified(
        &mut self,
        path: impl AsRef<Path>,
        fingerprint: &Fingerprint,
    ) -> Result<usize, RegistryError> {
        let modules = cache::load_cache_verified(path.as_ref(), fingerprint)?;
        self.import_cached(path.as_ref(), modules)
    }

    fn import_cached(
        &mut self,
        path: &Path,
        modules: Vec<ModuleDefinition>,
    ) -> Result<usize, RegistryError> {
        let count = modules.len();
        info!(path = %path.display(), modules = count, "loading cached modules");
        self.tree.import(modules);
        self.refresh()?;
        Ok(count)
    }
}

fn checked_file(path: &Path) -> Result<PathBuf, RegistryError> {
    if path.as_os_str().is_empty() {
        return Err(RegistryError::invalid("path", "must not be empty"));
    }
    if !path.is_file() {
        return Err(RegistryError::invalid(
            "path",
            format!("{} does not exist or is not a file", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CompilerDiagnostic;
    use crate::error::CompileError;
    use mibreg_core::{
        Definition, LookupError, NodeKind, OidComponent, SearchResult, Severity,
    };
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::fs;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Returns one module per file, named after the file stem, plus one
    /// warning. Fails hard on files whose stem is `broken`.
    #[derive(Default)]
    struct SpyParser {
        calls: Cell<usize>,
    }

    impl DefinitionParser for SpyParser {
        fn compile(
            &self,
            path: &Path,
            _errors: &mut Vec<CompilerDiagnostic>,
            warnings: &mut Vec<CompilerDiagnostic>,
        ) -> Result<Vec<ModuleDefinition>, CompileError> {
            self.calls.set(self.calls.get() + 1);
            warnings.push(CompilerDiagnostic {
                severity: Severity::Warning,
                path: path.to_path_buf(),
                line: 1,
                column: 1,
                message: "spy warning".into(),
            });
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if stem == "broken" {
                return Err(CompileError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidData, "spy failure"),
                });
            }
            Ok(vec![ModuleDefinition::new(stem)])
        }
    }

    /// Counts imports and refreshes and keeps every module; resolves nothing.
    #[derive(Default)]
    struct SpyTree {
        batches: Vec<usize>,
        refreshes: usize,
        modules: Vec<ModuleDefinition>,
    }

    impl DefinitionTree for SpyTree {
        fn find(&self, module: &str, _name: &str) -> Result<mibreg_core::DefinitionNode, LookupError> {
            Err(LookupError::ModuleNotFound {
                module: module.into(),
            })
        }

        fn search(&self, oid: &Oid) -> Result<SearchResult, LookupError> {
            Err(LookupError::OidNotFound { oid: oid.clone() })
        }

        fn import(&mut self, modules: Vec<ModuleDefinition>) {
            self.batches.push(modules.len());
            self.modules.extend(modules);
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }

        fn modules(&self) -> &[ModuleDefinition] {
            &self.modules
        }
    }

    fn spy_registry() -> Registry<SpyTree, SpyParser> {
        Registry::new(SpyTree::default(), SpyParser::default())
    }

    fn write_files(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "").unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    fn counting(registry: &mut Registry<SpyTree, SpyParser>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        registry.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        count
    }

    #[test]
    fn test_missing_file_never_reaches_parser() {
        let mut registry = spy_registry();
        let err = registry.compile("/nonexistent/MISSING-MIB.mib").unwrap_err();
        assert!(err.is_invalid_argument());
        let err = registry.compile("").unwrap_err();
        assert!(err.is_invalid_argument());

        assert_eq!(registry.parser.calls.get(), 0);
        assert_eq!(registry.tree().refreshes, 0);
        assert!(registry.tree().batches.is_empty());
    }

    #[test]
    fn test_batch_is_one_import_and_one_refresh() {
        let (_dir, paths) = write_files(&["A-MIB.mib", "B-MIB.mib"]);
        let mut registry = spy_registry();
        let notified = counting(&mut registry);

        let report = registry.compile_files(&paths).unwrap();

        assert_eq!(registry.parser.calls.get(), 2);
        assert_eq!(registry.tree().batches, vec![2]);
        assert_eq!(registry.tree().refreshes, 1);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(report.files, paths);
        assert_eq!(report.modules, vec!["A-MIB", "B-MIB"]);
        assert_eq!(report.warnings.len(), 2);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_one_bad_path_rejects_whole_batch() {
        let (dir, mut paths) = write_files(&["A-MIB.mib"]);
        paths.push(dir.path().join("MISSING.mib"));
        let mut registry = spy_registry();

        let err = registry.compile_files(&paths).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(registry.parser.calls.get(), 0);
    }

    #[test]
    fn test_empty_batch_still_refreshes() {
        let mut registry = spy_registry();
        let notified = counting(&mut registry);

        let report = registry.compile_files(Vec::<PathBuf>::new()).unwrap();

        assert!(report.files.is_empty());
        assert_eq!(registry.tree().refreshes, 1);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hard_failure_imports_nothing() {
        let (_dir, paths) = write_files(&["A-MIB.mib", "broken.mib", "C-MIB.mib"]);
        let mut registry = spy_registry();
        let notified = counting(&mut registry);

        let err = registry.compile_files(&paths).unwrap_err();

        assert!(matches!(err, RegistryError::Compile(CompileError::Io { .. })));
        assert_eq!(registry.parser.calls.get(), 2);
        assert!(registry.tree().batches.is_empty());
        assert_eq!(registry.tree().refreshes, 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert_eq!(registry.diagnostics().len(), 2);
    }

    #[test]
    fn test_import_does_not_refresh() {
        let mut registry = spy_registry();
        let notified = counting(&mut registry);

        registry.import(vec![ModuleDefinition::new("A-MIB")]);
        assert_eq!(registry.tree().batches, vec![1]);
        assert_eq!(registry.tree().refreshes, 0);

        registry.refresh().unwrap();
        assert_eq!(registry.tree().refreshes, 1);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_error_propagates() {
        let mut registry = spy_registry();
        registry.subscribe(|| Err("listener gone".into()));
        let after = counting(&mut registry);

        let err = registry.refresh().unwrap_err();
        assert!(matches!(err, RegistryError::Subscriber(_)));
        assert_eq!(registry.tree().refreshes, 1);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut registry = spy_registry();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = registry.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        registry.refresh().unwrap();
        assert!(registry.unsubscribe(id));
        registry.refresh().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_diagnostic_log_accumulates_until_cleared() {
        let (_dir, paths) = write_files(&["A-MIB.mib", "B-MIB.mib"]);
        let mut registry = spy_registry();

        let first = registry.compile(&paths[0]).unwrap();
        let second = registry.compile(&paths[1]).unwrap();

        assert_eq!(first.warnings.len(), 1);
        assert_eq!(second.warnings.len(), 1);
        assert_eq!(registry.diagnostics().len(), 2);
        assert_eq!(registry.diagnostics().warnings().count(), 2);

        registry.clear_diagnostics();
        assert!(registry.diagnostics().is_empty());
    }

    #[test]
    fn test_compile_folder_arguments() {
        let mut registry = spy_registry();
        assert!(registry.compile_folder("", "*.mib").unwrap_err().is_invalid_argument());

        let dir = tempfile::tempdir().unwrap();
        assert!(registry.compile_folder(dir.path(), "").unwrap_err().is_invalid_argument());
        assert!(registry
            .compile_folder(dir.path().join("absent"), "*.mib")
            .unwrap_err()
            .is_invalid_argument());
        assert_eq!(registry.tree().refreshes, 0);
    }

    #[test]
    fn test_compile_folder_matches_sorted() {
        let (dir, _) = write_files(&["B-MIB.mib", "A-MIB.mib", "README"]);
        let mut registry = spy_registry();

        let report = registry.compile_folder(dir.path(), "*.mib").unwrap();

        assert_eq!(report.modules, vec!["A-MIB", "B-MIB"]);
        assert!(report.files.iter().all(|f| f.is_absolute()));
        assert_eq!(registry.tree().refreshes, 1);
    }

    #[test]
    fn test_translation_with_namespace() {
        let mut registry = Registry::new(Namespace::new(), SpyParser::default());
        registry.import(vec![ModuleDefinition::new("TEST-MIB")
            .with_import("SNMPv2-SMI", &["enterprises"])
            .with_definition(Definition::new(
                "testTable",
                NodeKind::Table,
                vec![
                    OidComponent::Name("enterprises".into()),
                    OidComponent::Number(4242),
                ],
            ))]);
        registry.refresh().unwrap();

        let oid = registry.translate("TEST-MIB::testTable").unwrap();
        assert_eq!(oid, Oid::from([1, 3, 6, 1, 4, 1, 4242]));
        assert_eq!(
            registry.translate_qualified("TEST-MIB", "testTable.5").unwrap(),
            Oid::from([1, 3, 6, 1, 4, 1, 4242, 5])
        );
        assert_eq!(registry.translate_oid(&oid).unwrap(), "TEST-MIB::testTable");
        assert!(registry.is_table_id(&oid).unwrap());
        assert!(registry.validate_table("TEST-MIB::testTable").unwrap());
        assert!(!registry.validate_table("SNMPv2-SMI::enterprises").unwrap());

        let variable = registry
            .create_variable("TEST-MIB::testTable.1", Some(Value::Integer32(7)))
            .unwrap();
        assert_eq!(variable.oid(), &Oid::from([1, 3, 6, 1, 4, 1, 4242, 1]));
        assert_eq!(variable.value(), Some(&Value::Integer32(7)));

        assert!(registry.translate("NoModule").unwrap_err().is_format());
        assert!(registry.create_variable("", None).is_err());
    }

    #[test]
    fn test_cache_round_trip_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.mreg");

        let mut source = Registry::new(Namespace::new(), SpyParser::default());
        source.import(vec![ModuleDefinition::new("TEST-MIB")
            .with_import("SNMPv2-SMI", &["enterprises"])
            .with_definition(Definition::new(
                "testRoot",
                NodeKind::Node,
                vec![
                    OidComponent::Name("enterprises".into()),
                    OidComponent::Number(4242),
                ],
            ))]);
        source.refresh().unwrap();
        source.save_cache(&path, Some([3u8; 32])).unwrap();

        let mut restored = Registry::new(Namespace::new(), SpyParser::default());
        assert_eq!(restored.load_cache_verified(&path, &[3u8; 32]).unwrap(), 1);
        assert_eq!(
            restored.translate("TEST-MIB::testRoot").unwrap(),
            Oid::from([1, 3, 6, 1, 4, 1, 4242])
        );

        let mut rejected = Registry::new(Namespace::new(), SpyParser::default());
        let err = rejected.load_cache_verified(&path, &[4u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Cache(cache::CacheError::FingerprintMismatch)
        ));
    }

    #[test]
    fn test_save_cache_writes_injected_tree_modules() {
        let (dir, paths) = write_files(&["A-MIB.mib", "B-MIB.mib"]);
        let mut registry = spy_registry();
        registry.compile_files(&paths).unwrap();

        let path = dir.path().join("modules.mreg");
        registry.save_cache(&path, None).unwrap();
        let names: Vec<_> = cache::load_cache(&path)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["A-MIB", "B-MIB"]);
    }
}
