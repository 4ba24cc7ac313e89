//! File system operations
//!
//! The host filesystem contract and its backends. Every method is a blocking
//! call; handles reach it through the worker pool.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::properties::{FileAccessMode, FileAttributes, StorageItemTypes};
use crate::storage::validation::leaf_name;

/// A direct child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: StorageItemTypes,
}

/// Host-reported metadata for a single entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMetadata {
    pub kind: StorageItemTypes,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub attributes: FileAttributes,
}

/// Host filesystem contract
pub trait FileSystemHost: Send + Sync + fmt::Debug {
    /// Short backend identifier used in log lines
    fn backend_name(&self) -> &'static str;

    /// Kind of the entry at `path`, or `None` when nothing is there
    fn entry_kind(&self, path: &Path) -> Option<StorageItemTypes>;

    fn file_exists(&self, path: &Path) -> bool {
        self.entry_kind(path) == Some(StorageItemTypes::File)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.entry_kind(path) == Some(StorageItemTypes::Folder)
    }

    /// Kind of whatever holds the name at `path`. Unlike `entry_kind`, a
    /// dangling symlink counts as an occupied file name.
    fn occupant_kind(&self, path: &Path) -> Option<StorageItemTypes> {
        self.entry_kind(path)
    }

    /// Create an empty file; fails with `AlreadyExists` when anything holds the name
    fn create_file(&self, path: &Path) -> Result<(), StorageError>;

    fn create_directory(&self, path: &Path) -> Result<(), StorageError>;

    fn remove_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Remove a directory and everything below it
    fn remove_directory(&self, path: &Path) -> Result<(), StorageError>;

    /// Remove whatever is at `path`
    fn remove_entry(&self, path: &Path) -> Result<(), StorageError> {
        match self.occupant_kind(path) {
            Some(StorageItemTypes::Folder) => self.remove_directory(path),
            Some(_) => self.remove_file(path),
            None => Ok(()),
        }
    }

    /// Move an entry, replacing a file at `to`
    fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError>;

    /// Copy file content from `from` to `to`, overwriting `to`
    fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, StorageError>;

    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Replace the content of an existing file
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), StorageError>;

    /// Direct children of a directory, unordered
    fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, StorageError>;

    fn metadata(&self, path: &Path) -> Result<EntryMetadata, StorageError>;

    /// Open an existing file; the returned descriptor belongs to the caller
    fn open(&self, path: &Path, mode: FileAccessMode) -> Result<File, StorageError>;
}

/// Backend built on `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl FileSystemHost for NativeFileSystem {
    fn backend_name(&self) -> &'static str {
        "native"
    }

    fn entry_kind(&self, path: &Path) -> Option<StorageItemTypes> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Some(StorageItemTypes::Folder),
            Ok(_) => Some(StorageItemTypes::File),
            Err(_) => None,
        }
    }

    fn occupant_kind(&self, path: &Path) -> Option<StorageItemTypes> {
        self.entry_kind(path).or_else(|| match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Some(StorageItemTypes::File),
            _ => None,
        })
    }

    fn create_file(&self, path: &Path) -> Result<(), StorageError> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StorageError::already_exists(
                leaf_name(path),
                "An item with the same name already exists.",
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn create_directory(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir(path)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn remove_directory(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_dir_all(path)?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices && self.file_exists(from) => {
                info!(
                    "{} and {} are on different devices, copying instead",
                    from.display(),
                    to.display()
                );
                copy_then_remove(from, to)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, StorageError> {
        Ok(fs::copy(from, to)?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, StorageError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Follow symlinks so a link to a folder lists as a folder
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => StorageItemTypes::Folder,
                Ok(_) => StorageItemTypes::File,
                Err(e) => {
                    debug!("Skipping unreadable entry {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
            });
        }
        Ok(entries)
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata, StorageError> {
        let meta = fs::metadata(path)?;
        let modified: DateTime<Utc> = meta.modified()?.into();
        let created = meta.created().map(DateTime::<Utc>::from).unwrap_or(modified);
        let kind = if meta.is_dir() {
            StorageItemTypes::Folder
        } else {
            StorageItemTypes::File
        };

        Ok(EntryMetadata {
            kind,
            size: if meta.is_dir() { 0 } else { meta.len() },
            created,
            modified,
            attributes: native_attributes(path, &meta),
        })
    }

    fn open(&self, path: &Path, mode: FileAccessMode) -> Result<File, StorageError> {
        let file = match mode {
            FileAccessMode::Read => File::open(path)?,
            FileAccessMode::ReadWrite => OpenOptions::new().read(true).write(true).open(path)?,
        };
        Ok(file)
    }
}

/// Move a file between devices; the copy is rolled back if the source cannot be removed
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), StorageError> {
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            debug!("Could not remove partial copy {}: {}", to.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(windows)]
fn native_attributes(_path: &Path, meta: &fs::Metadata) -> FileAttributes {
    use std::os::windows::fs::MetadataExt;

    FileAttributes::from_bits_truncate(meta.file_attributes())
}

#[cfg(not(windows))]
fn native_attributes(path: &Path, meta: &fs::Metadata) -> FileAttributes {
    let mut attributes = FileAttributes::NORMAL;
    if meta.is_dir() {
        attributes |= FileAttributes::DIRECTORY;
    }
    if meta.permissions().readonly() {
        attributes |= FileAttributes::READ_ONLY;
    }
    let hidden = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);
    if hidden {
        attributes |= FileAttributes::HIDDEN;
    }
    attributes
}

/// Placeholder backend for targets without filesystem access
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedFileSystem;

impl UnsupportedFileSystem {
    fn unsupported<T>(op: &str) -> Result<T, StorageError> {
        Err(StorageError::Unsupported(format!(
            "filesystem unavailable on this platform: {op}"
        )))
    }
}

impl FileSystemHost for UnsupportedFileSystem {
    fn backend_name(&self) -> &'static str {
        "unsupported"
    }

    fn entry_kind(&self, _path: &Path) -> Option<StorageItemTypes> {
        None
    }

    fn create_file(&self, _path: &Path) -> Result<(), StorageError> {
        Self::unsupported("create_file")
    }

    fn create_directory(&self, _path: &Path) -> Result<(), StorageError> {
        Self::unsupported("create_directory")
    }

    fn remove_file(&self, _path: &Path) -> Result<(), StorageError> {
        Self::unsupported("remove_file")
    }

    fn remove_directory(&self, _path: &Path) -> Result<(), StorageError> {
        Self::unsupported("remove_directory")
    }

    fn rename(&self, _from: &Path, _to: &Path) -> Result<(), StorageError> {
        Self::unsupported("rename")
    }

    fn copy_file(&self, _from: &Path, _to: &Path) -> Result<u64, StorageError> {
        Self::unsupported("copy_file")
    }

    fn read(&self, _path: &Path) -> Result<Vec<u8>, StorageError> {
        Self::unsupported("read")
    }

    fn write(&self, _path: &Path, _data: &[u8]) -> Result<(), StorageError> {
        Self::unsupported("write")
    }

    fn list_directory(&self, _path: &Path) -> Result<Vec<DirectoryEntry>, StorageError> {
        Self::unsupported("list_directory")
    }

    fn metadata(&self, _path: &Path) -> Result<EntryMetadata, StorageError> {
        Self::unsupported("metadata")
    }

    fn open(&self, _path: &Path, _mode: FileAccessMode) -> Result<File, StorageError> {
        Self::unsupported("open")
    }
}

/// Backend for the build target
pub fn default_host() -> Arc<dyn FileSystemHost> {
    if cfg!(any(unix, windows)) {
        Arc::new(NativeFileSystem)
    } else {
        Arc::new(UnsupportedFileSystem)
    }
}
