//! Name and path validation
//!
//! Rejects arguments that cannot name a direct child of a folder.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Validate a leaf name used to create, rename, move or copy an item
pub fn validate_name<'a>(name: &'a str, argument: &str) -> Result<&'a str, StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidArgument(format!(
            "{argument} cannot be empty"
        )));
    }

    if name == "." || name == ".." {
        return Err(StorageError::InvalidArgument(format!(
            "{argument} cannot be a relative directory marker: {name}"
        )));
    }

    if name.contains('\0') || name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidArgument(format!(
            "{argument} must be a single path segment: {name}"
        )));
    }

    Ok(name)
}

/// Validate a path handed to a `from_path` factory, make it absolute and
/// resolve `.` and `..` segments
pub fn absolute_path(path: &Path) -> Result<PathBuf, StorageError> {
    if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
        return Err(StorageError::InvalidArgument("path cannot be empty".into()));
    }

    Ok(normalize(&std::path::absolute(path)?))
}

/// Lexical normalization; `..` at the root stays at the root
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Case-insensitive name comparison used for same-name checks
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Leaf segment of a path; a root path names itself
pub fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
