//! File system storage management
//!
//! Handles to files and folders, name collision handling, and the host
//! filesystem backends they run on.

pub mod application_data;
pub mod collision;
pub mod context;
pub mod file;
pub mod filesystem;
pub mod folder;
pub mod item;
pub mod properties;
pub mod validation;

pub use application_data::ApplicationData;
pub use collision::{CollisionPolicy, Operation};
pub use context::StorageContext;
pub use file::StorageFile;
pub use filesystem::{FileSystemHost, NativeFileSystem, UnsupportedFileSystem, default_host};
pub use folder::StorageFolder;
pub use item::{StorageItem, StorageItemHandle};
pub use properties::{BasicProperties, FileAccessMode, FileAttributes, StorageItemTypes};
