//! Error handlers
//!
//! Provides error reporting helpers.

use crate::error::types::{StorageError, XPlatError};
use log::{error, warn};

/// Log an error at a level matching its severity
pub fn handle_error(err: &XPlatError) {
    match err {
        XPlatError::Storage(e) if is_caller_error(e) => warn!("{}", err),
        _ => error!("{}", err),
    }
}

/// Whether the failure was caused by the caller's input rather than the host
pub fn is_caller_error(err: &StorageError) -> bool {
    matches!(
        err,
        StorageError::NotFound { .. }
            | StorageError::AlreadyExists { .. }
            | StorageError::InvalidArgument(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn validation_errors_are_caller_errors() {
        assert!(is_caller_error(&StorageError::not_found("a", "missing")));
        assert!(is_caller_error(&StorageError::already_exists("a", "dup")));
        assert!(is_caller_error(&StorageError::InvalidArgument("x".into())));
        assert!(!is_caller_error(&StorageError::Io(io::Error::other("disk"))));
        assert!(!is_caller_error(&StorageError::Unsupported("open".into())));
    }

    #[test]
    fn handle_error_accepts_every_kind() {
        crate::utils::logging::setup_test_logging();
        handle_error(&XPlatError::from(StorageError::not_found("a", "missing")));
        handle_error(&XPlatError::from(io::Error::other("disk")));
    }

    #[test]
    fn io_message_is_preserved() {
        let err = StorageError::from(io::Error::other("device busy"));
        assert!(err.to_string().contains("device busy"));
    }
}
