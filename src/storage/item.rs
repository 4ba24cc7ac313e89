//! Storage items
//!
//! The contract shared by file and folder handles, and the union type returned
//! when a lookup may yield either.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::StorageError;
use crate::storage::collision::CollisionPolicy;
use crate::storage::file::StorageFile;
use crate::storage::filesystem::FileSystemHost;
use crate::storage::folder::StorageFolder;
use crate::storage::properties::{BasicProperties, FileAttributes, StorageItemTypes};
use crate::storage::validation::leaf_name;

/// Identity shared by every storage handle
pub trait StorageItemHandle {
    /// Absolute path of the item
    fn path(&self) -> &Path;

    fn item_type(&self) -> StorageItemTypes;

    /// Leaf segment of the path
    fn name(&self) -> String {
        leaf_name(self.path())
    }

    fn is_of_type(&self, item_type: StorageItemTypes) -> bool {
        self.item_type() == item_type
    }

    /// Whether both handles address the same path, ignoring case
    fn is_equal(&self, other: &dyn StorageItemHandle) -> bool {
        self.path().to_string_lossy().to_lowercase()
            == other.path().to_string_lossy().to_lowercase()
    }
}

/// A file or a folder
#[derive(Debug, Clone)]
pub enum StorageItem {
    File(StorageFile),
    Folder(StorageFolder),
}

impl StorageItem {
    pub fn as_file(&self) -> Option<&StorageFile> {
        match self {
            StorageItem::File(file) => Some(file),
            StorageItem::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&StorageFolder> {
        match self {
            StorageItem::Folder(folder) => Some(folder),
            StorageItem::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<StorageFile> {
        match self {
            StorageItem::File(file) => Some(file),
            StorageItem::Folder(_) => None,
        }
    }

    pub fn into_folder(self) -> Option<StorageFolder> {
        match self {
            StorageItem::Folder(folder) => Some(folder),
            StorageItem::File(_) => None,
        }
    }

    pub async fn exists(&self) -> bool {
        match self {
            StorageItem::File(file) => file.exists().await,
            StorageItem::Folder(folder) => folder.exists().await,
        }
    }

    pub async fn date_created(&self) -> Result<DateTime<Utc>, StorageError> {
        match self {
            StorageItem::File(file) => file.date_created().await,
            StorageItem::Folder(folder) => folder.date_created().await,
        }
    }

    pub async fn attributes(&self) -> Result<FileAttributes, StorageError> {
        match self {
            StorageItem::File(file) => file.attributes().await,
            StorageItem::Folder(folder) => folder.attributes().await,
        }
    }

    pub async fn get_basic_properties(&self) -> Result<BasicProperties, StorageError> {
        match self {
            StorageItem::File(file) => file.get_basic_properties().await,
            StorageItem::Folder(folder) => folder.get_basic_properties().await,
        }
    }

    pub async fn get_parent(&self) -> Option<StorageFolder> {
        match self {
            StorageItem::File(file) => file.get_parent().await,
            StorageItem::Folder(folder) => folder.get_parent().await,
        }
    }

    pub async fn rename(
        &mut self,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<(), StorageError> {
        match self {
            StorageItem::File(file) => file.rename(desired_name, policy).await,
            StorageItem::Folder(folder) => folder.rename(desired_name, policy).await,
        }
    }

    pub async fn delete(&self) -> Result<(), StorageError> {
        match self {
            StorageItem::File(file) => file.delete().await,
            StorageItem::Folder(folder) => folder.delete().await,
        }
    }
}

impl StorageItemHandle for StorageItem {
    fn path(&self) -> &Path {
        match self {
            StorageItem::File(file) => file.path(),
            StorageItem::Folder(folder) => folder.path(),
        }
    }

    fn item_type(&self) -> StorageItemTypes {
        match self {
            StorageItem::File(_) => StorageItemTypes::File,
            StorageItem::Folder(_) => StorageItemTypes::Folder,
        }
    }
}

impl From<StorageFile> for StorageItem {
    fn from(file: StorageFile) -> Self {
        StorageItem::File(file)
    }
}

impl From<StorageFolder> for StorageItem {
    fn from(folder: StorageFolder) -> Self {
        StorageItem::Folder(folder)
    }
}

pub(crate) fn ensure_folder(
    host: &dyn FileSystemHost,
    path: &Path,
    message: &str,
) -> Result<(), StorageError> {
    if !host.directory_exists(path) {
        return Err(StorageError::not_found(leaf_name(path), message));
    }
    Ok(())
}

pub(crate) fn ensure_file(
    host: &dyn FileSystemHost,
    path: &Path,
    message: &str,
) -> Result<(), StorageError> {
    if !host.file_exists(path) {
        return Err(StorageError::not_found(leaf_name(path), message));
    }
    Ok(())
}

pub(crate) fn basic_properties(
    host: &dyn FileSystemHost,
    path: &Path,
) -> Result<BasicProperties, StorageError> {
    let meta = host.metadata(path)?;
    Ok(BasicProperties {
        size: meta.size,
        date_modified: meta.modified,
        item_date: meta.created,
    })
}
