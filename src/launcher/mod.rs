//! Launcher
//!
//! Starts the default handler for a URI, file or folder through a host
//! launcher, and reports whether a URI can be handled at all.

mod host;
mod status;

pub use host::{HostLauncher, LaunchHost, LaunchRequest, Launcher, LauncherFuture, NoopLauncher};
pub use status::LaunchQuerySupportStatus;
