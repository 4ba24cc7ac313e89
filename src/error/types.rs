//! Error types
//!
//! Defines domain-specific error types for each module of the library.

use std::fmt;
use std::io;

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    NotFound { name: String, message: String },
    AlreadyExists { name: String, message: String },
    InvalidArgument(String),
    Unsupported(String),
    Io(io::Error),
    Worker(String),
}

impl StorageError {
    pub fn not_found(name: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::NotFound {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn already_exists(name: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::AlreadyExists {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StorageError::AlreadyExists { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StorageError::InvalidArgument(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound { name, message } => {
                write!(f, "Item not found: {}: {}", name, message)
            }
            StorageError::AlreadyExists { name, message } => {
                write!(f, "Item already exists: {}: {}", name, message)
            }
            StorageError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            StorageError::Unsupported(op) => write!(f, "Unsupported operation: {}", op),
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Worker(msg) => write!(f, "Worker error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Io(error)
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        ConfigError::Load(error)
    }
}

/// Geolocation module errors
#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationError {
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationError::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(f, "Invalid coordinate: ({}, {})", latitude, longitude),
        }
    }
}

impl std::error::Error for GeolocationError {}

/// General error that encompasses all error types
#[derive(Debug)]
pub enum XPlatError {
    Storage(StorageError),
    Config(ConfigError),
    Geolocation(GeolocationError),
}

impl fmt::Display for XPlatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPlatError::Storage(e) => write!(f, "Storage error: {}", e),
            XPlatError::Config(e) => write!(f, "Configuration error: {}", e),
            XPlatError::Geolocation(e) => write!(f, "Geolocation error: {}", e),
        }
    }
}

impl std::error::Error for XPlatError {}

impl From<StorageError> for XPlatError {
    fn from(error: StorageError) -> Self {
        XPlatError::Storage(error)
    }
}

impl From<ConfigError> for XPlatError {
    fn from(error: ConfigError) -> Self {
        XPlatError::Config(error)
    }
}

impl From<GeolocationError> for XPlatError {
    fn from(error: GeolocationError) -> Self {
        XPlatError::Geolocation(error)
    }
}

impl From<io::Error> for XPlatError {
    fn from(error: io::Error) -> Self {
        XPlatError::Storage(StorageError::Io(error))
    }
}
