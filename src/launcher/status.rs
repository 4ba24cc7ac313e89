use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a URI can be launched on this host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchQuerySupportStatus {
    Available,
    AppNotInstalled,
    AppUnavailable,
    NotSupported,
    Unknown,
}

impl fmt::Display for LaunchQuerySupportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LaunchQuerySupportStatus::Available => "available",
            LaunchQuerySupportStatus::AppNotInstalled => "app not installed",
            LaunchQuerySupportStatus::AppUnavailable => "app unavailable",
            LaunchQuerySupportStatus::NotSupported => "not supported",
            LaunchQuerySupportStatus::Unknown => "unknown",
        };
        write!(f, "{}", text)
    }
}
