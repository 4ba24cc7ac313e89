//! XPlat Storage
//!
//! One storage and device API over host-native backends: file and folder
//! handles with name collision policies, application data folders, a launcher
//! contract and geolocation events.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod launcher;
pub mod storage;
pub mod utils;
pub mod worker;

pub use config::StorageConfig;
pub use error::{ConfigError, GeolocationError, StorageError, XPlatError};
pub use storage::{
    ApplicationData, CollisionPolicy, StorageContext, StorageFile, StorageFolder, StorageItem,
    StorageItemHandle,
};
