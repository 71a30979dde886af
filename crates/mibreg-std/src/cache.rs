//! Module cache with fingerprint support.
//!
//! A cache holds parsed [`ModuleDefinition`]s so a registry can skip the
//! parser on startup. Two workflows:
//!
//! 1. **Build once, load anywhere**: compile MIB files, save the cache,
//!    and load it without verification where no MIB files exist.
//! 2. **Local MIBs**: compute a fingerprint over the MIB files, verify it
//!    on load, and recompile when it no longer matches.
//!
//! # File Format
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header (9 or 41 bytes)                 │
//! │   magic: [u8; 4]        "MREG"         │
//! │   version: u32 (LE)     Schema version │
//! │   has_fingerprint: u8   0 or 1         │
//! │   fingerprint: [u8; 32] (if present)   │
//! ├────────────────────────────────────────┤
//! │ Payload (postcard Vec<ModuleDefinition>)│
//! └────────────────────────────────────────┘
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mibreg_core::ModuleDefinition;
use sha2::{Digest, Sha256};

/// Current schema version. Bump on any change to the serialized form.
pub const SCHEMA_VERSION: u32 = 2;

const MAGIC: [u8; 4] = *b"MREG";

const HEADER_LEN: usize = 9;
const FINGERPRINT_LEN: usize = 32;

/// A SHA-256 fingerprint over cached source files.
pub type Fingerprint = [u8; FINGERPRINT_LEN];

/// Cache error.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The file does not start with `MREG`.
    #[error("invalid magic bytes (expected MREG)")]
    InvalidMagic,
    /// Written by a different schema version.
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads.
        expected: u32,
        /// Version in the file.
        found: u32,
    },
    /// Stored fingerprint differs from the expected one, or is absent.
    #[error("fingerprint mismatch")]
    FingerprintMismatch,
    /// Header is shorter than its own fields say.
    #[error("truncated header")]
    TruncatedHeader,
    /// The payload could not be encoded.
    #[error("postcard serialization failed: {0}")]
    Serialize(#[source] postcard::Error),
    /// The payload could not be decoded.
    #[error("postcard deserialization failed: {0}")]
    Deserialize(#[source] postcard::Error),
    /// Reading or writing the cache file failed.
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Fingerprint a set of `(name, content)` pairs.
///
/// Includes the schema version, so a format change invalidates old caches.
/// Files are sorted by name first; input order does not matter. Names and
/// contents are length-prefixed, so moving bytes across a field boundary
/// changes the result.
pub fn compute_fingerprint<S: AsRef<str>>(files: &[(S, &[u8])]) -> Fingerprint {
    let mut sorted: Vec<_> = files.iter().collect();
    sorted.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut hasher = Sha256::new();
    hasher.update(SCHEMA_VERSION.to_le_bytes());
    for (name, content) in sorted {
        let name = name.as_ref().as_bytes();
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name);
        hasher.update((content.len() as u64).to_le_bytes());
        hasher.update(content);
    }
    hasher.finalize().into()
}

/// Read `paths` and fingerprint them by file name and content.
///
/// # Errors
///
/// [`CacheError::Io`] if a file cannot be read.
pub fn fingerprint_files(paths: &[PathBuf]) -> Result<Fingerprint, CacheError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push((name, fs::read(path)?));
    }
    let borrowed: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_slice()))
        .collect();
    Ok(compute_fingerprint(&borrowed))
}

/// Encode modules as cache bytes.
///
/// # Errors
///
/// [`CacheError::Serialize`] if postcard rejects the payload.
pub fn serialize_modules(
    modules: &[ModuleDefinition],
    fingerprint: Option<Fingerprint>,
) -> Result<Vec<u8>, CacheError> {
    let payload = postcard::to_allocvec(modules).map_err(CacheError::Serialize)?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + FINGERPRINT_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    match fingerprint {
        Some(fp) => {
            bytes.push(1);
            bytes.extend_from_slice(&fp);
        }
        None => bytes.push(0),
    }
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode cache bytes.
///
/// With `expected_fingerprint`, the stored fingerprint must be present and
/// equal; without it, verification is skipped.
///
/// # Errors
///
/// Any header problem, a fingerprint mismatch, or a postcard failure.
pub fn deserialize_modules(
    bytes: &[u8],
    expected_fingerprint: Option<&Fingerprint>,
) -> Result<Vec<ModuleDefinition>, CacheError> {
    let (stored, payload) = split_header(bytes)?;
    if let Some(expected) = expected_fingerprint {
        if stored.as_ref() != Some(expected) {
            return Err(CacheError::FingerprintMismatch);
        }
    }
    postcard::from_bytes(payload).map_err(CacheError::Deserialize)
}

/// The fingerprint stored in cache bytes, without decoding the payload.
///
/// # Errors
///
/// Any header problem.
pub fn read_fingerprint(bytes: &[u8]) -> Result<Option<Fingerprint>, CacheError> {
    split_header(bytes).map(|(fp, _)| fp)
}

/// Validate the header; return the stored fingerprint and the payload.
fn split_header(bytes: &[u8]) -> Result<(Option<Fingerprint>, &[u8]), CacheError> {
    let Some((header, rest)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(CacheError::TruncatedHeader);
    };
    if header[0..4] != MAGIC {
        return Err(CacheError::InvalidMagic);
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: version,
        });
    }
    if header[8] == 0 {
        return Ok((None, rest));
    }
    match rest.split_first_chunk::<FINGERPRINT_LEN>() {
        Some((fp, payload)) => Ok((Some(*fp), payload)),
        None => Err(CacheError::TruncatedHeader),
    }
}

// === File-based convenience API ===

/// Write modules to a cache file.
///
/// # Errors
///
/// Serialization or I/O failure.
pub fn save_cache<P: AsRef<Path>>(
    path: P,
    modules: &[ModuleDefinition],
    fingerprint: Option<Fingerprint>,
) -> Result<(), CacheError> {
    let bytes = serialize_modules(modules, fingerprint)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a cache file without fingerprint verification.
///
/// # Errors
///
/// I/O failure or an invalid cache.
pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Vec<ModuleDefinition>, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_modules(&bytes, None)
}

/// Load a cache file, requiring `expected_fingerprint`.
///
/// # Errors
///
/// I/O failure, an invalid cache, or a fingerprint mismatch.
pub fn load_cache_verified<P: AsRef<Path>>(
    path: P,
    expected_fingerprint: &Fingerprint,
) -> Result<Vec<ModuleDefinition>, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_modules(&bytes, Some(expected_fingerprint))
}

/// True if the cache file exists and carries `expected_fingerprint`.
pub fn is_cache_valid<P: AsRef<Path>>(path: P, expected_fingerprint: &Fingerprint) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    matches!(read_fingerprint(&bytes), Ok(Some(fp)) if fp == *expected_fingerprint)
}
