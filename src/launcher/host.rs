use log::{debug, info, warn};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::StorageError;
use crate::launcher::status::LaunchQuerySupportStatus;
use crate::storage::{StorageContext, StorageFile, StorageFolder};
use crate::worker::WorkerPool;

const ANY_CONTENT_TYPE: &str = "*/*";

/// Boxed future returned by [`Launcher`] methods
pub type LauncherFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Starts default handlers for URIs and storage items
pub trait Launcher: Send + Sync {
    /// Launch the default handler for `uri`; `Ok(false)` when the host could not
    fn launch_uri<'a>(&'a self, uri: &'a str) -> LauncherFuture<'a, Result<bool, StorageError>>;

    fn query_uri_support<'a>(
        &'a self,
        uri: &'a str,
    ) -> LauncherFuture<'a, Result<LaunchQuerySupportStatus, StorageError>>;

    /// Open `file` with its default app; `false` when missing or not launched
    fn launch_file<'a>(&'a self, file: &'a StorageFile) -> LauncherFuture<'a, bool>;

    /// Show `folder` in a file browser; `false` when missing or not launched
    fn launch_folder<'a>(&'a self, folder: &'a StorageFolder) -> LauncherFuture<'a, bool>;
}

/// What the host is asked to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub uri: String,
    pub content_type: Option<String>,
    /// Bring an existing handler instance to the front instead of stacking a new one
    pub clear_top: bool,
}

impl LaunchRequest {
    pub fn for_uri(uri: &str) -> Result<Self, StorageError> {
        validate_uri(uri)?;
        Ok(Self {
            uri: uri.to_string(),
            content_type: None,
            clear_top: false,
        })
    }

    pub fn for_file(file: &StorageFile) -> Self {
        // Unknown types are left for the host to match
        let content_type = match file.content_type() {
            "" | "application/octet-stream" => ANY_CONTENT_TYPE,
            known => known,
        };
        Self {
            uri: file_uri(file.path()),
            content_type: Some(content_type.to_string()),
            clear_top: true,
        }
    }

    pub fn for_folder(folder: &StorageFolder) -> Self {
        Self {
            uri: file_uri(folder.path()),
            content_type: Some(ANY_CONTENT_TYPE.to_string()),
            clear_top: true,
        }
    }
}

/// Host primitive behind [`HostLauncher`]; both calls may block
pub trait LaunchHost: Send + Sync + 'static {
    fn start(&self, request: &LaunchRequest) -> Result<(), StorageError>;

    /// Whether some installed handler accepts the request
    fn resolve(&self, request: &LaunchRequest) -> Result<bool, StorageError>;
}

/// Launcher over a [`LaunchHost`], with existence checks and status normalization
pub struct HostLauncher<H: LaunchHost> {
    host: Arc<H>,
    pool: WorkerPool,
}

impl<H: LaunchHost> HostLauncher<H> {
    pub fn new(host: H, pool: WorkerPool) -> Self {
        Self {
            host: Arc::new(host),
            pool,
        }
    }

    /// Share the storage context's worker pool
    pub fn with_context(host: H, ctx: &StorageContext) -> Self {
        Self::new(host, ctx.pool().clone())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    async fn start(&self, request: LaunchRequest) -> bool {
        let host = Arc::clone(&self.host);
        let uri = request.uri.clone();
        match self.pool.run(move || host.start(&request)).await {
            Ok(()) => {
                info!("Launched {}", uri);
                true
            }
            Err(e) => {
                warn!("Failed to launch {}: {}", uri, e);
                false
            }
        }
    }
}

impl<H: LaunchHost> Launcher for HostLauncher<H> {
    fn launch_uri<'a>(&'a self, uri: &'a str) -> LauncherFuture<'a, Result<bool, StorageError>> {
        Box::pin(async move {
            let request = LaunchRequest::for_uri(uri)?;
            Ok(self.start(request).await)
        })
    }

    fn query_uri_support<'a>(
        &'a self,
        uri: &'a str,
    ) -> LauncherFuture<'a, Result<LaunchQuerySupportStatus, StorageError>> {
        Box::pin(async move {
            let request = LaunchRequest::for_uri(uri)?;
            let host = Arc::clone(&self.host);
            let status = match self.pool.run(move || host.resolve(&request)).await {
                Ok(true) => LaunchQuerySupportStatus::Available,
                Ok(false) => LaunchQuerySupportStatus::AppNotInstalled,
                Err(StorageError::Unsupported(msg)) => {
                    debug!("Launch query for {} not supported: {}", uri, msg);
                    LaunchQuerySupportStatus::NotSupported
                }
                Err(e) => {
                    warn!("Launch query for {} failed: {}", uri, e);
                    LaunchQuerySupportStatus::Unknown
                }
            };
            Ok(status)
        })
    }

    fn launch_file<'a>(&'a self, file: &'a StorageFile) -> LauncherFuture<'a, bool> {
        Box::pin(async move {
            if !file.exists().await {
                debug!("Not launching missing file {}", file.path().display());
                return false;
            }
            self.start(LaunchRequest::for_file(file)).await
        })
    }

    fn launch_folder<'a>(&'a self, folder: &'a StorageFolder) -> LauncherFuture<'a, bool> {
        Box::pin(async move {
            if !folder.exists().await {
                debug!("Not launching missing folder {}", folder.path().display());
                return false;
            }
            self.start(LaunchRequest::for_folder(folder)).await
        })
    }
}

/// Launcher for hosts that cannot start other apps
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLauncher;

impl Launcher for NoopLauncher {
    fn launch_uri<'a>(&'a self, uri: &'a str) -> LauncherFuture<'a, Result<bool, StorageError>> {
        Box::pin(async move {
            validate_uri(uri)?;
            Ok(false)
        })
    }

    fn query_uri_support<'a>(
        &'a self,
        uri: &'a str,
    ) -> LauncherFuture<'a, Result<LaunchQuerySupportStatus, StorageError>> {
        Box::pin(async move {
            validate_uri(uri)?;
            Ok(LaunchQuerySupportStatus::NotSupported)
        })
    }

    fn launch_file<'a>(&'a self, _file: &'a StorageFile) -> LauncherFuture<'a, bool> {
        Box::pin(async { false })
    }

    fn launch_folder<'a>(&'a self, _folder: &'a StorageFolder) -> LauncherFuture<'a, bool> {
        Box::pin(async { false })
    }
}

/// A URI needs a non-empty scheme: a letter followed by letters, digits, `+`, `-` or `.`
fn validate_uri(uri: &str) -> Result<(), StorageError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(StorageError::InvalidArgument("uri cannot be empty".into()));
    }

    let valid_scheme = uri
        .split_once(':')
        .map(|(scheme, _)| {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
        .unwrap_or(false);

    if !valid_scheme {
        return Err(StorageError::InvalidArgument(format!(
            "uri has no scheme: {uri}"
        )));
    }
    Ok(())
}

fn file_uri(path: &Path) -> String {
    let path = percent_encode_path(&path.to_string_lossy().replace('\\', "/"));
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

/// Escape every byte outside the unreserved set, keeping `/` and the drive `:`
fn percent_encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
