use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the location provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Ready,
    Initializing,
    NoData,
    Disabled,
    NotInitialized,
    NotAvailable,
}

impl PositionStatus {
    /// Map a Windows `PositionStatus` value
    pub fn from_windows_code(code: i32) -> Self {
        match code {
            0 => PositionStatus::Ready,
            1 => PositionStatus::Initializing,
            2 => PositionStatus::NoData,
            3 => PositionStatus::Disabled,
            4 => PositionStatus::NotInitialized,
            _ => PositionStatus::NotAvailable,
        }
    }

    /// Map an Android `LocationProvider` status (OUT_OF_SERVICE, TEMPORARILY_UNAVAILABLE, AVAILABLE)
    pub fn from_android_provider_status(code: i32) -> Self {
        match code {
            0 => PositionStatus::Disabled,
            1 => PositionStatus::NoData,
            2 => PositionStatus::Ready,
            _ => PositionStatus::NotAvailable,
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PositionStatus::Ready => "ready",
            PositionStatus::Initializing => "initializing",
            PositionStatus::NoData => "no data",
            PositionStatus::Disabled => "disabled",
            PositionStatus::NotInitialized => "not initialized",
            PositionStatus::NotAvailable => "not available",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEventArgs {
    pub status: PositionStatus,
}
