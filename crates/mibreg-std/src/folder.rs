//! Folder expansion for `compile_folder`.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;

use crate::error::RegistryError;

/// Regular files directly inside `folder` whose file name matches `pattern`,
/// sorted by path. Subdirectories are not entered.
pub(crate) fn matching_files(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>, RegistryError> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| RegistryError::invalid("pattern", e.to_string()))?
        .compile_matcher();

    let io_error = |source: std::io::Error| RegistryError::Io {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if !entry.file_type().map_err(io_error)?.is_file() {
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
