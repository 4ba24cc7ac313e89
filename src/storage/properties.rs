//! Item properties
//!
//! Attribute bitset, item type tags and basic properties reported for files and folders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of host file attributes (values follow the Windows attribute bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileAttributes(u32);

impl FileAttributes {
    pub const NORMAL: FileAttributes = FileAttributes(0);
    pub const READ_ONLY: FileAttributes = FileAttributes(0x1);
    pub const HIDDEN: FileAttributes = FileAttributes(0x2);
    pub const DIRECTORY: FileAttributes = FileAttributes(0x10);
    pub const ARCHIVE: FileAttributes = FileAttributes(0x20);
    pub const TEMPORARY: FileAttributes = FileAttributes(0x100);

    const ALL: u32 = 0x1 | 0x2 | 0x10 | 0x20 | 0x100;

    /// Build from raw bits, dropping any bit this type does not model
    pub fn from_bits_truncate(bits: u32) -> Self {
        FileAttributes(bits & Self::ALL)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: FileAttributes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_normal(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FileAttributes {
    type Output = FileAttributes;

    fn bitor(self, rhs: FileAttributes) -> FileAttributes {
        FileAttributes(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: FileAttributes) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            return write!(f, "Normal");
        }
        let names = [
            (FileAttributes::READ_ONLY, "ReadOnly"),
            (FileAttributes::HIDDEN, "Hidden"),
            (FileAttributes::DIRECTORY, "Directory"),
            (FileAttributes::ARCHIVE, "Archive"),
            (FileAttributes::TEMPORARY, "Temporary"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", set.join(" | "))
    }
}

/// Kind of a storage item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageItemTypes {
    None,
    File,
    Folder,
}

impl fmt::Display for StorageItemTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageItemTypes::None => write!(f, "item"),
            StorageItemTypes::File => write!(f, "file"),
            StorageItemTypes::Folder => write!(f, "folder"),
        }
    }
}

/// Snapshot of an item's size and timestamps, taken when requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicProperties {
    /// Size in bytes; always 0 for folders
    pub size: u64,
    pub date_modified: DateTime<Utc>,
    /// Creation time, or the modification time when the host cannot report creation
    pub item_date: DateTime<Utc>,
}

/// Access requested when opening a file stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAccessMode {
    Read,
    ReadWrite,
}
