/// "Add project" flow: ask for a directory, classify it, register it.
///
/// The picker is whatever the front end has (a native dialog, a prompt on
/// stdin). Cancelling is not an error, it just means nothing happens.

use crate::core::project::{NewProject, Project};
use crate::core::registry::RegistryStore;
use crate::core::type_detector::{ProbeService, TypeDetector};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Asks the user for a directory
#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// `Ok(None)` when the user cancelled
    async fn pick_directory(&self) -> Result<Option<PathBuf>>;
}

/// What happened when importing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new project was registered
    Added(Project),
    /// That path was already registered; nothing changed
    AlreadyRegistered(Project),
    /// The picker was closed without a selection
    Cancelled,
}

/// Pick a directory and register it
///
/// The type is detected before the store is touched, and the display name is
/// taken from the last path component.
pub async fn import_project<D, P>(
    picker: &D,
    detector: &TypeDetector<P>,
    store: &mut RegistryStore,
) -> Result<ImportOutcome>
where
    D: DirectoryPicker + ?Sized,
    P: ProbeService,
{
    let Some(dir) = picker.pick_directory().await? else {
        info!("directory selection cancelled");
        return Ok(ImportOutcome::Cancelled);
    };

    let path = dir.display().to_string();
    if let Some(existing) = store.find_by_path(&path) {
        return Ok(ImportOutcome::AlreadyRegistered(existing.clone()));
    }

    let project_type = detector.detect(&dir).await;
    let data = NewProject::new(Project::name_from_path(&dir), path, project_type);

    Ok(ImportOutcome::Added(store.add(data)))
}
