//! File handles
//!
//! Content access and relocation for a single file.

use chrono::{DateTime, Utc};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::collision::{CollisionPolicy, Operation, Resolution, prepare_target, resolve};
use crate::storage::context::StorageContext;
use crate::storage::folder::StorageFolder;
use crate::storage::item::{StorageItemHandle, basic_properties, ensure_file, ensure_folder};
use crate::storage::properties::{
    BasicProperties, FileAccessMode, FileAttributes, StorageItemTypes,
};
use crate::storage::validation::{absolute_path, leaf_name, same_name, validate_name};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("log", "text/plain"),
    ("csv", "text/csv"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
];

/// Handle to a file identified by its absolute path
#[derive(Debug, Clone)]
pub struct StorageFile {
    path: PathBuf,
    ctx: Arc<StorageContext>,
}

impl StorageFile {
    pub(crate) fn new(ctx: Arc<StorageContext>, path: PathBuf) -> Self {
        Self { path, ctx }
    }

    /// Handle for `path` using the process-wide context. The file need not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::from_path_in(StorageContext::shared(), path)
    }

    pub fn from_path_in(
        ctx: Arc<StorageContext>,
        path: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(ctx, absolute_path(path.as_ref())?))
    }

    /// Handle for an existing file, or `None` when the path is invalid or absent
    pub async fn try_from_path_in(
        ctx: Arc<StorageContext>,
        path: impl AsRef<Path>,
    ) -> Option<Self> {
        let file = Self::from_path_in(ctx, path).ok()?;
        if file.exists().await { Some(file) } else { None }
    }

    pub fn context(&self) -> &Arc<StorageContext> {
        &self.ctx
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        leaf_name(&self.path)
    }

    pub fn display_name(&self) -> String {
        self.name()
    }

    /// Extension including the leading dot, or an empty string
    pub fn file_type(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// MIME type guessed from the extension
    pub fn content_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        CONTENT_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| *mime)
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Probes the host; never cached
    pub async fn exists(&self) -> bool {
        let path = self.path.clone();
        self.ctx
            .run(move |host| Ok(host.file_exists(&path)))
            .await
            .unwrap_or(false)
    }

    pub async fn date_created(&self) -> Result<DateTime<Utc>, StorageError> {
        Ok(self.get_basic_properties().await?.item_date)
    }

    pub async fn attributes(&self) -> Result<FileAttributes, StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot get attributes for a file that does not exist.")?;
                Ok(host.metadata(&path)?.attributes)
            })
            .await
    }

    pub async fn get_basic_properties(&self) -> Result<BasicProperties, StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot get properties for a file that does not exist.")?;
                basic_properties(host, &path)
            })
            .await
    }

    pub async fn get_parent(&self) -> Option<StorageFolder> {
        self.path
            .parent()
            .map(|parent| StorageFolder::new(Arc::clone(&self.ctx), parent.to_path_buf()))
    }

    /// Open a stream over the file. The caller owns and closes it.
    pub async fn open(&self, mode: FileAccessMode) -> Result<tokio::fs::File, StorageError> {
        let path = self.path.clone();
        let file = self
            .ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot open a file that does not exist.")?;
                host.open(&path, mode)
            })
            .await?;
        Ok(tokio::fs::File::from_std(file))
    }

    pub async fn open_read(&self) -> Result<tokio::fs::File, StorageError> {
        self.open(FileAccessMode::Read).await
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot read from a file that does not exist.")?;
                host.read(&path)
            })
            .await
    }

    pub async fn read_text(&self) -> Result<String, StorageError> {
        let bytes = self.read_bytes().await?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Replace the file's content
    pub async fn write_bytes(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path.clone();
        let data = bytes.to_vec();
        self.ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot write to a file that does not exist.")?;
                host.write(&path, &data)
            })
            .await
    }

    pub async fn write_text(&self, text: &str) -> Result<(), StorageError> {
        self.write_bytes(text.as_bytes()).await
    }

    /// Copy into `destination` as `desired_name`; returns the copy
    pub async fn copy(
        &self,
        destination: &StorageFolder,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<StorageFile, StorageError> {
        let name = validate_name(desired_name, "desired_name")?.to_string();
        let source = self.path.clone();
        let folder = destination.path().to_path_buf();

        let target = self
            .ctx
            .run(move |host| {
                ensure_file(host, &source, "Cannot copy a file that does not exist.")?;
                ensure_folder(
                    host,
                    &folder,
                    "Cannot copy a file to a folder that does not exist.",
                )?;
                let resolution = resolve(
                    host,
                    &folder,
                    &name,
                    StorageItemTypes::File,
                    policy,
                    Operation::Copy,
                )?;
                if matches!(&resolution, Resolution::Replace(p) if *p == source) {
                    return Err(StorageError::InvalidArgument(
                        "Cannot copy a file onto itself.".into(),
                    ));
                }
                let target = prepare_target(host, &resolution)?;
                host.copy_file(&source, &target)?;
                Ok(target)
            })
            .await?;

        info!("Copied file {} to {}", self.path.display(), target.display());
        Ok(StorageFile::new(Arc::clone(&self.ctx), target))
    }

    /// Copy into `destination` under the same name, failing on collision
    pub async fn copy_into(&self, destination: &StorageFolder) -> Result<StorageFile, StorageError> {
        self.copy(destination, &self.name(), Operation::Copy.default_policy())
            .await
    }

    /// Overwrite an existing file with this file's content
    pub async fn copy_and_replace(&self, file_to_replace: &StorageFile) -> Result<(), StorageError> {
        let source = self.path.clone();
        let target = file_to_replace.path().to_path_buf();

        self.ctx
            .run(move |host| {
                ensure_file(host, &source, "Cannot copy a file that does not exist.")?;
                ensure_file(
                    host,
                    &target,
                    "Cannot copy to and replace a file that does not exist.",
                )?;
                if source != target {
                    host.copy_file(&source, &target)?;
                }
                Ok(())
            })
            .await?;

        info!(
            "Copied file {} over {}",
            self.path.display(),
            file_to_replace.path().display()
        );
        Ok(())
    }

    /// Move into `destination` as `desired_name`; the handle follows the file
    pub async fn move_to(
        &mut self,
        destination: &StorageFolder,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<(), StorageError> {
        let name = validate_name(desired_name, "desired_name")?.to_string();
        let source = self.path.clone();
        let folder = destination.path().to_path_buf();

        let target = self
            .ctx
            .run(move |host| {
                ensure_file(host, &source, "Cannot move a file that does not exist.")?;
                ensure_folder(
                    host,
                    &folder,
                    "Cannot move a file to a folder that does not exist.",
                )?;
                let resolution = resolve(
                    host,
                    &folder,
                    &name,
                    StorageItemTypes::File,
                    policy,
                    Operation::Move,
                )?;
                if matches!(&resolution, Resolution::Replace(p) if *p == source) {
                    return Ok(source);
                }
                let target = prepare_target(host, &resolution)?;
                host.rename(&source, &target)?;
                Ok(target)
            })
            .await?;

        info!("Moved file {} to {}", self.path.display(), target.display());
        self.path = target;
        Ok(())
    }

    /// Move into `destination` under the same name, replacing any existing file
    pub async fn move_into(&mut self, destination: &StorageFolder) -> Result<(), StorageError> {
        let name = self.name();
        self.move_to(destination, &name, Operation::Move.default_policy())
            .await
    }

    /// Move over an existing file; the handle takes the replaced file's path
    pub async fn move_and_replace(
        &mut self,
        file_to_replace: &StorageFile,
    ) -> Result<(), StorageError> {
        let source = self.path.clone();
        let target = file_to_replace.path().to_path_buf();

        let target = self
            .ctx
            .run(move |host| {
                ensure_file(host, &source, "Cannot move a file that does not exist.")?;
                ensure_file(
                    host,
                    &target,
                    "Cannot move to and replace a file that does not exist.",
                )?;
                if source != target {
                    host.rename(&source, &target)?;
                }
                Ok(target)
            })
            .await?;

        info!("Moved file {} over {}", self.path.display(), target.display());
        self.path = target;
        Ok(())
    }

    /// Rename within the same folder; the handle follows the new path
    pub async fn rename(
        &mut self,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<(), StorageError> {
        let name = validate_name(desired_name, "desired_name")?.to_string();
        if same_name(&name, &self.name()) {
            return Err(StorageError::InvalidArgument(
                "The desired new name is the same as the current name.".into(),
            ));
        }
        let parent = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StorageError::InvalidArgument("This file cannot be renamed.".into()))?;
        let source = self.path.clone();

        let target = self
            .ctx
            .run(move |host| {
                ensure_file(host, &source, "Cannot rename a file that does not exist.")?;
                let resolution = resolve(
                    host,
                    &parent,
                    &name,
                    StorageItemTypes::File,
                    policy,
                    Operation::Rename,
                )?;
                let target = prepare_target(host, &resolution)?;
                host.rename(&source, &target)?;
                Ok(target)
            })
            .await?;

        info!("Renamed file {} to {}", self.path.display(), target.display());
        self.path = target;
        Ok(())
    }

    /// Rename using the default rename policy (replace existing)
    pub async fn rename_default(&mut self, desired_name: &str) -> Result<(), StorageError> {
        self.rename(desired_name, Operation::Rename.default_policy())
            .await
    }

    pub async fn delete(&self) -> Result<(), StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_file(host, &path, "Cannot delete a file that does not exist.")?;
                host.remove_file(&path)
            })
            .await?;

        info!("Deleted file {}", self.path.display());
        Ok(())
    }
}

impl StorageItemHandle for StorageFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn item_type(&self) -> StorageItemTypes {
        StorageItemTypes::File
    }
}
