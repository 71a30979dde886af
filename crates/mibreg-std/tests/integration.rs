//! Integration tests with fixture MIB files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mibreg_std::cache::{compute_fingerprint, fingerprint_files, CacheError};
use mibreg_std::mibreg_core::{
    DefinitionTree, LookupError, NodeKind, Oid, TranslateError, Value,
};
use mibreg_std::{Registry, RegistryError};
use pretty_assertions::assert_eq;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// IF-MIB and TEST-MIB, compiled as one folder batch.
fn compiled() -> Registry {
    let mut registry = Registry::with_defaults();
    let report = registry.compile_folder(fixtures(), "*.mib").unwrap();
    for diagnostic in &report.errors {
        eprintln!("{diagnostic}");
    }
    assert!(!report.has_errors(), "fixtures should compile cleanly");
    registry
}

#[test]
fn test_compile_folder_imports_matching_files() {
    let mut registry = Registry::with_defaults();
    let report = registry.compile_folder(fixtures(), "*.mib").unwrap();

    let names: Vec<_> = report
        .files
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["IF-MIB.mib", "TEST-MIB.mib"]);
    assert_eq!(report.modules, vec!["IF-MIB", "TEST-MIB"]);
    assert!(report.errors.is_empty());
    assert_eq!(registry.tree().module_count(), 2);
    assert!(registry.tree().unresolved().is_empty());
}

#[test]
fn test_translate_round_trip() {
    let registry = compiled();

    let cases = [
        ("IF-MIB::interfaces", vec![1, 3, 6, 1, 2, 1, 2]),
        ("IF-MIB::ifNumber", vec![1, 3, 6, 1, 2, 1, 2, 1]),
        ("IF-MIB::ifTable", vec![1, 3, 6, 1, 2, 1, 2, 2]),
        ("IF-MIB::ifDescr", vec![1, 3, 6, 1, 2, 1, 2, 2, 1, 2]),
        ("IF-MIB::ifMIB", vec![1, 3, 6, 1, 2, 1, 31]),
        ("TEST-MIB::testMIB", vec![1, 3, 6, 1, 4, 1, 99999]),
        ("TEST-MIB::portState", vec![1, 3, 6, 1, 4, 1, 99999, 1, 1, 1, 2]),
        ("TEST-MIB::portStateChange", vec![1, 3, 6, 1, 4, 1, 99999, 2, 0, 1]),
    ];
    for (text, arcs) in cases {
        let oid = registry.translate(text).unwrap();
        assert_eq!(oid, Oid::new(arcs), "{text}");
        assert_eq!(registry.translate_oid(&oid).unwrap(), text);
    }
}

#[test]
fn test_index_suffix() {
    let registry = compiled();

    let oid = registry.translate("IF-MIB::ifDescr.7").unwrap();
    assert_eq!(oid, Oid::from([1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 7]));
    assert_eq!(registry.translate_oid(&oid).unwrap(), "IF-MIB::ifDescr.7");

    let below = Oid::from([1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 7, 9]);
    assert_eq!(registry.translate_oid(&below).unwrap(), "IF-MIB::ifDescr.7.9");
}

#[test]
fn test_malformed_references() {
    let registry = compiled();
    for input in ["NoModule", "A::B::C", "IF-MIB::a.b.c", "IF-MIB::ifDescr.x"] {
        let err = registry.translate(input).unwrap_err();
        assert!(err.is_format(), "{input}: {err}");
    }
    assert!(matches!(
        registry.translate(""),
        Err(TranslateError::InvalidArgument { .. })
    ));
}

#[test]
fn test_lookup_errors_pass_through() {
    let registry = compiled();
    assert_eq!(
        registry.translate("NOPE-MIB::ifDescr").unwrap_err(),
        TranslateError::Lookup(LookupError::ModuleNotFound {
            module: "NOPE-MIB".into()
        })
    );
    assert_eq!(
        registry.translate("IF-MIB::ifSpeed").unwrap_err(),
        TranslateError::Lookup(LookupError::NameNotFound {
            module: "IF-MIB".into(),
            name: "ifSpeed".into()
        })
    );
}

#[test]
fn test_table_heuristic_and_structure() {
    let registry = compiled();

    assert!(registry.validate_table("IF-MIB::ifTable").unwrap());
    assert!(registry.validate_table("TEST-MIB::portTable").unwrap());
    assert!(!registry.validate_table("IF-MIB::ifNumber").unwrap());
    assert!(!registry.validate_table("IF-MIB::ifEntry").unwrap());
    assert!(!registry.validate_table("IF-MIB::ifDescr").unwrap());

    let tree = registry.tree();
    let kind = |text: &str| tree.node_kind(&registry.translate(text).unwrap());
    assert_eq!(kind("IF-MIB::ifTable"), Some(NodeKind::Table));
    assert_eq!(kind("IF-MIB::ifEntry"), Some(NodeKind::Row));
    assert_eq!(kind("IF-MIB::ifDescr"), Some(NodeKind::Column));
    assert_eq!(kind("IF-MIB::ifNumber"), Some(NodeKind::Scalar));
    assert_eq!(kind("TEST-MIB::testGroup"), Some(NodeKind::Group));
}

#[test]
fn test_create_variable() {
    let registry = compiled();
    let variable = registry
        .create_variable("IF-MIB::ifDescr.1", Some(Value::OctetString(b"eth0".to_vec())))
        .unwrap();
    assert_eq!(variable.oid(), &Oid::from([1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1]));
    assert_eq!(variable.value(), Some(&Value::OctetString(b"eth0".to_vec())));

    let bare = registry.create_variable("IF-MIB::ifNumber", None).unwrap();
    assert_eq!(bare.value(), None);
}

#[test]
fn test_diagnostics_are_located_and_logged() {
    let mut registry = compiled();
    let report = registry.compile(fixtures().join("BROKEN-MIB.txt")).unwrap();

    assert_eq!(report.errors.len(), 1);
    let error = &report.errors[0];
    assert_eq!((error.line, error.column), (8, 28));
    assert!(error.to_string().ends_with("BROKEN-MIB.txt:8:28: error: empty OID value"));

    // The rest of the module is still imported.
    assert_eq!(
        registry.translate("BROKEN-MIB::brokenLeaf").unwrap(),
        Oid::from([1, 3, 6, 1, 4, 1, 424242, 1])
    );
    assert!(registry.translate("BROKEN-MIB::lost").is_err());

    assert_eq!(registry.diagnostics().errors().count(), 1);
    registry.clear_diagnostics();
    assert!(registry.diagnostics().is_empty());
}

#[test]
fn test_one_notification_per_batch() {
    let mut registry = Registry::with_defaults();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    registry.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    registry.compile_folder(fixtures(), "*.mib").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    registry.refresh().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_missing_file_is_invalid_argument() {
    let mut registry = Registry::with_defaults();
    let err = registry.compile(fixtures().join("ABSENT-MIB.mib")).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidArgument { param: "path", .. }));
    assert!(registry.diagnostics().is_empty());
}

#[test]
fn test_cache_round_trip_into_fresh_registry() {
    let source = compiled();
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("mibs.mreg");

    let mib_files = vec![fixtures().join("IF-MIB.mib"), fixtures().join("TEST-MIB.mib")];
    let fingerprint = fingerprint_files(&mib_files).unwrap();
    source.save_cache(&cache_path, Some(fingerprint)).unwrap();

    let mut restored = Registry::with_defaults();
    assert_eq!(restored.load_cache_verified(&cache_path, &fingerprint).unwrap(), 2);
    assert_eq!(
        restored.translate("TEST-MIB::portState").unwrap(),
        source.translate("TEST-MIB::portState").unwrap()
    );
    assert_eq!(
        restored.tree().modules().len(),
        source.tree().modules().len()
    );
}

#[test]
fn test_cache_fingerprint_mismatch() {
    let source = compiled();
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("mibs.mreg");

    let old = compute_fingerprint(&[("IF-MIB.mib", b"old content".as_slice())]);
    let new = compute_fingerprint(&[("IF-MIB.mib", b"new content".as_slice())]);
    source.save_cache(&cache_path, Some(old)).unwrap();

    let mut restored = Registry::with_defaults();
    let err = restored.load_cache_verified(&cache_path, &new).unwrap_err();
    assert!(matches!(err, RegistryError::Cache(CacheError::FingerprintMismatch)));
    assert_eq!(restored.tree().module_count(), 0);

    assert_eq!(restored.load_cache(&cache_path).unwrap(), 2);
}
