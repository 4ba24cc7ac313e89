//! Folder handles
//!
//! Create, look up, list, rename and delete items inside a folder.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::collision::{
    CollisionPolicy, Operation, Resolution, prepare_target, resolve,
};
use crate::storage::context::StorageContext;
use crate::storage::file::StorageFile;
use crate::storage::item::{
    StorageItem, StorageItemHandle, basic_properties, ensure_folder,
};
use crate::storage::properties::{BasicProperties, FileAttributes, StorageItemTypes};
use crate::storage::validation::{absolute_path, leaf_name, same_name, validate_name};

/// Handle to a folder identified by its absolute path
#[derive(Debug, Clone)]
pub struct StorageFolder {
    path: PathBuf,
    ctx: Arc<StorageContext>,
}

impl StorageFolder {
    pub(crate) fn new(ctx: Arc<StorageContext>, path: PathBuf) -> Self {
        Self { path, ctx }
    }

    /// Handle for `path` using the process-wide context. The folder need not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::from_path_in(StorageContext::shared(), path)
    }

    pub fn from_path_in(
        ctx: Arc<StorageContext>,
        path: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(ctx, absolute_path(path.as_ref())?))
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

    /// Probes the host; never cached
    pub async fn exists(&self) -> bool {
        let path = self.path.clone();
        self.ctx
            .run(move |host| Ok(host.directory_exists(&path)))
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
                ensure_folder(
                    host,
                    &path,
                    "Cannot get attributes for a folder that does not exist.",
                )?;
                Ok(host.metadata(&path)?.attributes)
            })
            .await
    }

    pub async fn get_basic_properties(&self) -> Result<BasicProperties, StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &path,
                    "Cannot get properties for a folder that does not exist.",
                )?;
                basic_properties(host, &path)
            })
            .await
    }

    /// Containing folder, or `None` at a filesystem root
    pub async fn get_parent(&self) -> Option<StorageFolder> {
        self.path
            .parent()
            .map(|parent| StorageFolder::new(Arc::clone(&self.ctx), parent.to_path_buf()))
    }

    pub async fn create_file(
        &self,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<StorageFile, StorageError> {
        let name = validate_name(desired_name, "desired_name")?.to_string();
        let folder = self.path.clone();

        let path = self
            .ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &folder,
                    "Cannot create a file in a folder that does not exist.",
                )?;
                let resolution = resolve(
                    host,
                    &folder,
                    &name,
                    StorageItemTypes::File,
                    policy,
                    Operation::Create,
                )?;
                if let Resolution::OpenExisting(existing) = resolution {
                    return Ok(existing);
                }
                let target = prepare_target(host, &resolution)?;
                host.create_file(&target)?;
                info!("Created file {}", target.display());
                Ok(target)
            })
            .await?;

        Ok(StorageFile::new(Arc::clone(&self.ctx), path))
    }

    /// Create a file using the context's configured default policy
    pub async fn create_file_default(&self, desired_name: &str) -> Result<StorageFile, StorageError> {
        self.create_file(desired_name, self.ctx.default_policy())
            .await
    }

    pub async fn create_folder(
        &self,
        desired_name: &str,
        policy: CollisionPolicy,
    ) -> Result<StorageFolder, StorageError> {
        let name = validate_name(desired_name, "desired_name")?.to_string();
        let folder = self.path.clone();

        let path = self
            .ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &folder,
                    "Cannot create a folder in a folder that does not exist.",
                )?;
                let resolution = resolve(
                    host,
                    &folder,
                    &name,
                    StorageItemTypes::Folder,
                    policy,
                    Operation::Create,
                )?;
                if let Resolution::OpenExisting(existing) = resolution {
                    return Ok(existing);
                }
                let target = prepare_target(host, &resolution)?;
                host.create_directory(&target)?;
                info!("Created folder {}", target.display());
                Ok(target)
            })
            .await?;

        Ok(StorageFolder::new(Arc::clone(&self.ctx), path))
    }

    /// Create a folder using the context's configured default policy
    pub async fn create_folder_default(
        &self,
        desired_name: &str,
    ) -> Result<StorageFolder, StorageError> {
        self.create_folder(desired_name, self.ctx.default_policy())
            .await
    }

    pub async fn get_file(&self, name: &str) -> Result<StorageFile, StorageError> {
        let name = validate_name(name, "name")?.to_string();
        let folder = self.path.clone();

        let path = self
            .ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &folder,
                    "Cannot get a file from a folder that does not exist.",
                )?;
                let path = folder.join(&name);
                if !host.file_exists(&path) {
                    return Err(StorageError::not_found(
                        name,
                        "The file could not be found in the folder.",
                    ));
                }
                Ok(path)
            })
            .await?;

        Ok(StorageFile::new(Arc::clone(&self.ctx), path))
    }

    /// Get the named file, creating it when absent
    pub async fn get_file_or_create(&self, name: &str) -> Result<StorageFile, StorageError> {
        self.create_file(name, CollisionPolicy::OpenIfExists).await
    }

    pub async fn get_folder(&self, name: &str) -> Result<StorageFolder, StorageError> {
        let name = validate_name(name, "name")?.to_string();
        let folder = self.path.clone();

        let path = self
            .ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &folder,
                    "Cannot get a folder from a folder that does not exist.",
                )?;
                let path = folder.join(&name);
                if !host.directory_exists(&path) {
                    return Err(StorageError::not_found(
                        name,
                        "The folder could not be found in the folder.",
                    ));
                }
                Ok(path)
            })
            .await?;

        Ok(StorageFolder::new(Arc::clone(&self.ctx), path))
    }

    /// Get the named folder, creating it when absent
    pub async fn get_folder_or_create(&self, name: &str) -> Result<StorageFolder, StorageError> {
        self.create_folder(name, CollisionPolicy::OpenIfExists)
            .await
    }

    /// Look up a direct child that may be either a file or a folder
    pub async fn get_item(&self, name: &str) -> Result<StorageItem, StorageError> {
        let name = validate_name(name, "name")?.to_string();
        let folder = self.path.clone();

        let (path, kind) = self
            .ctx
            .run(move |host| {
                ensure_folder(
                    host,
                    &folder,
                    "Cannot get an item from a folder that does not exist.",
                )?;
                let path = folder.join(&name);
                // The two probes can race with a concurrent change; one must match
                let kind = match (host.file_exists(&path), host.directory_exists(&path)) {
                    (true, false) => StorageItemTypes::File,
                    (false, true) => StorageItemTypes::Folder,
                    _ => {
                        return Err(StorageError::not_found(
                            name,
                            "The item could not be found in the folder.",
                        ));
                    }
                };
                Ok((path, kind))
            })
            .await?;

        Ok(self.child(path, kind))
    }

    /// Like `get_item`, but any failure yields `None`
    pub async fn try_get_item(&self, name: &str) -> Option<StorageItem> {
        match self.get_item(name).await {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("try_get_item({}) in {}: {}", name, self.path.display(), e);
                None
            }
        }
    }

    pub async fn get_files(&self) -> Result<Vec<StorageFile>, StorageError> {
        Ok(self
            .list_children("Cannot get files from a folder that does not exist.")
            .await?
            .into_iter()
            .filter(|(_, kind)| *kind == StorageItemTypes::File)
            .map(|(path, _)| StorageFile::new(Arc::clone(&self.ctx), path))
            .collect())
    }

    pub async fn get_folders(&self) -> Result<Vec<StorageFolder>, StorageError> {
        Ok(self
            .list_children("Cannot get folders from a folder that does not exist.")
            .await?
            .into_iter()
            .filter(|(_, kind)| *kind == StorageItemTypes::Folder)
            .map(|(path, _)| StorageFolder::new(Arc::clone(&self.ctx), path))
            .collect())
    }

    /// Direct children: folders first, then files, each group ordered by name
    pub async fn get_items(&self) -> Result<Vec<StorageItem>, StorageError> {
        let children = self
            .list_children("Cannot get items from a folder that does not exist.")
            .await?;
        let (folders, files): (Vec<_>, Vec<_>) = children
            .into_iter()
            .partition(|(_, kind)| *kind == StorageItemTypes::Folder);

        Ok(folders
            .into_iter()
            .chain(files)
            .map(|(path, kind)| self.child(path, kind))
            .collect())
    }

    /// A window of `get_items`; out-of-range starts give an empty list
    pub async fn get_items_range(
        &self,
        start_index: usize,
        max_items: usize,
    ) -> Result<Vec<StorageItem>, StorageError> {
        Ok(self
            .get_items()
            .await?
            .into_iter()
            .skip(start_index)
            .take(max_items)
            .collect())
    }

    /// Rename within the same parent; the handle follows the new path
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
            .ok_or_else(|| StorageError::InvalidArgument("This folder cannot be renamed.".into()))?;
        let source = self.path.clone();

        let target = self
            .ctx
            .run(move |host| {
                ensure_folder(host, &source, "Cannot rename a folder that does not exist.")?;
                let resolution = resolve(
                    host,
                    &parent,
                    &name,
                    StorageItemTypes::Folder,
                    policy,
                    Operation::Rename,
                )?;
                let target = prepare_target(host, &resolution)?;
                host.rename(&source, &target)?;
                Ok(target)
            })
            .await?;

        info!("Renamed folder {} to {}", self.path.display(), target.display());
        self.path = target;
        Ok(())
    }

    /// Rename using the default rename policy (replace existing)
    pub async fn rename_default(&mut self, desired_name: &str) -> Result<(), StorageError> {
        self.rename(desired_name, Operation::Rename.default_policy())
            .await
    }

    /// Delete the folder and everything below it
    pub async fn delete(&self) -> Result<(), StorageError> {
        let path = self.path.clone();
        self.ctx
            .run(move |host| {
                ensure_folder(host, &path, "Cannot delete a folder that does not exist.")?;
                host.remove_directory(&path)
            })
            .await?;

        info!("Deleted folder {}", self.path.display());
        Ok(())
    }

    async fn list_children(
        &self,
        missing_message: &'static str,
    ) -> Result<Vec<(PathBuf, StorageItemTypes)>, StorageError> {
        let folder = self.path.clone();
        let children = self
            .ctx
            .run(move |host| {
                ensure_folder(host, &folder, missing_message)?;
                let mut entries = host.list_directory(&folder)?;
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(entries
                    .into_iter()
                    .map(|entry| (folder.join(entry.name), entry.kind))
                    .collect::<Vec<_>>())
            })
            .await?;

        debug!("Listed {} ({} entries)", self.path.display(), children.len());
        Ok(children)
    }

    fn child(&self, path: PathBuf, kind: StorageItemTypes) -> StorageItem {
        let ctx = Arc::clone(&self.ctx);
        match kind {
            StorageItemTypes::Folder => StorageItem::Folder(StorageFolder::new(ctx, path)),
            _ => StorageItem::File(StorageFile::new(ctx, path)),
        }
    }
}

impl StorageItemHandle for StorageFolder {
    fn path(&self) -> &Path {
        &self.path
    }

    fn item_type(&self) -> StorageItemTypes {
        StorageItemTypes::Folder
    }
}
