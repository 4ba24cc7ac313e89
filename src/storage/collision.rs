//! Name collision resolution
//!
//! Decides what happens when the target of a create, rename, move or copy is
//! already taken, and prepares the target path accordingly.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::filesystem::FileSystemHost;
use crate::storage::properties::StorageItemTypes;

/// Outcome selected when a target name already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    #[default]
    FailIfExists,
    ReplaceExisting,
    GenerateUniqueName,
    /// Only valid for create operations
    OpenIfExists,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::FailIfExists => write!(f, "fail-if-exists"),
            CollisionPolicy::ReplaceExisting => write!(f, "replace-existing"),
            CollisionPolicy::GenerateUniqueName => write!(f, "generate-unique-name"),
            CollisionPolicy::OpenIfExists => write!(f, "open-if-exists"),
        }
    }
}

/// Operations that place an item under a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Rename,
    Move,
    Copy,
}

impl Operation {
    /// Policy used when the caller does not pick one
    pub fn default_policy(self) -> CollisionPolicy {
        match self {
            Operation::Create | Operation::Copy => CollisionPolicy::FailIfExists,
            Operation::Rename | Operation::Move => CollisionPolicy::ReplaceExisting,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Rename => "rename",
            Operation::Move => "move",
            Operation::Copy => "copy",
        }
    }
}

/// Where an operation should land and what must happen first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target is free
    Proceed(PathBuf),
    /// An item of the same kind occupies the target and must be removed first
    Replace(PathBuf),
    /// Hand back the item already at the target
    OpenExisting(PathBuf),
}

impl Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Resolution::Proceed(p) | Resolution::Replace(p) | Resolution::OpenExisting(p) => p,
        }
    }
}

/// Synthesize a leaf name that still contains `name`.
///
/// Files get the token in front so their extension survives; folders get it appended.
pub fn unique_name(name: &str, kind: StorageItemTypes) -> String {
    let token = Uuid::new_v4();
    match kind {
        StorageItemTypes::File => format!("{token}-{name}"),
        _ => format!("{name}-{token}"),
    }
}

/// Resolve `container/name` for an item of `kind` under `policy`
pub fn resolve(
    host: &dyn FileSystemHost,
    container: &Path,
    name: &str,
    kind: StorageItemTypes,
    policy: CollisionPolicy,
    operation: Operation,
) -> Result<Resolution, StorageError> {
    if policy == CollisionPolicy::OpenIfExists && operation != Operation::Create {
        return Err(StorageError::InvalidArgument(format!(
            "{policy} is only valid when creating an item, not for {}",
            operation.verb()
        )));
    }

    let target = container.join(name);
    let existing = match host.occupant_kind(&target) {
        Some(existing) => existing,
        None => return Ok(Resolution::Proceed(target)),
    };

    debug!(
        "{} target {} already exists as a {} ({})",
        operation.verb(),
        target.display(),
        existing,
        policy
    );

    match policy {
        CollisionPolicy::GenerateUniqueName => {
            let unique = unique_name(name, kind);
            info!("Generated unique name {} for {}", unique, name);
            Ok(Resolution::Proceed(container.join(unique)))
        }
        _ if existing != kind => Err(StorageError::already_exists(
            name,
            format!("A {existing} with the same name already exists."),
        )),
        CollisionPolicy::FailIfExists => Err(StorageError::already_exists(
            name,
            format!("A {kind} with the same name already exists."),
        )),
        CollisionPolicy::ReplaceExisting => Ok(Resolution::Replace(target)),
        CollisionPolicy::OpenIfExists => Ok(Resolution::OpenExisting(target)),
    }
}

/// Clear the way for a resolved target and return the path to write to
pub fn prepare_target(
    host: &dyn FileSystemHost,
    resolution: &Resolution,
) -> Result<PathBuf, StorageError> {
    if let Resolution::Replace(path) = resolution {
        info!("Replacing existing item {}", path.display());
        host.remove_entry(path)?;
    }
    Ok(resolution.path().to_path_buf())
}
