//! Application data folders
//!
//! Resolves the per-application local, roaming and temporary folders, either
//! under a configured root or in the platform's standard locations.

use directories::ProjectDirs;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::storage::context::StorageContext;
use crate::storage::folder::StorageFolder;

const LOCAL_DIR: &str = "Local";
const ROAMING_DIR: &str = "Roaming";
const TEMP_DIR: &str = "Temp";

/// Known folders for the running application
#[derive(Debug, Clone)]
pub struct ApplicationData {
    local_folder: StorageFolder,
    roaming_folder: StorageFolder,
    temporary_folder: StorageFolder,
}

impl ApplicationData {
    pub fn new(ctx: Arc<StorageContext>, config: &StorageConfig) -> Result<Self, StorageError> {
        let (local, roaming, temporary) = resolve_locations(config)?;
        info!(
            "Application data folders: local={}, roaming={}, temp={}",
            local.display(),
            roaming.display(),
            temporary.display()
        );

        Ok(Self {
            local_folder: StorageFolder::from_path_in(Arc::clone(&ctx), local)?,
            roaming_folder: StorageFolder::from_path_in(Arc::clone(&ctx), roaming)?,
            temporary_folder: StorageFolder::from_path_in(ctx, temporary)?,
        })
    }

    pub fn local_folder(&self) -> &StorageFolder {
        &self.local_folder
    }

    pub fn roaming_folder(&self) -> &StorageFolder {
        &self.roaming_folder
    }

    pub fn temporary_folder(&self) -> &StorageFolder {
        &self.temporary_folder
    }

    /// Create any of the three folders that does not exist yet
    pub async fn ensure_created(&self) -> Result<(), StorageError> {
        for folder in [
            &self.local_folder,
            &self.roaming_folder,
            &self.temporary_folder,
        ] {
            let path = folder.path().to_path_buf();
            folder
                .context()
                .run(move |host| {
                    let missing: Vec<_> = path
                        .ancestors()
                        .take_while(|dir| !host.directory_exists(dir))
                        .map(|dir| dir.to_path_buf())
                        .collect();
                    for dir in missing.iter().rev() {
                        host.create_directory(dir)?;
                    }
                    Ok(())
                })
                .await?;
        }
        Ok(())
    }
}

fn resolve_locations(config: &StorageConfig) -> Result<(PathBuf, PathBuf, PathBuf), StorageError> {
    if let Some(root) = &config.app_data_root {
        return Ok((
            root.join(LOCAL_DIR),
            root.join(ROAMING_DIR),
            root.join(TEMP_DIR),
        ));
    }

    let dirs = ProjectDirs::from(&config.qualifier, &config.organization, &config.application)
        .ok_or_else(|| {
            StorageError::Unsupported("no home directory to resolve application data".into())
        })?;

    let (local, roaming) =
        separate_roaming(dirs.data_local_dir().to_path_buf(), dirs.data_dir().to_path_buf());
    Ok((local, roaming, dirs.cache_dir().to_path_buf()))
}

/// Platforms without a roaming profile (Linux) report the same directory for
/// local and roaming data; roaming then gets its own subfolder
fn separate_roaming(local: PathBuf, roaming: PathBuf) -> (PathBuf, PathBuf) {
    if roaming == local {
        let roaming = local.join(ROAMING_DIR);
        (local, roaming)
    } else {
        (local, roaming)
    }
}
