/// Durable subset of the registry
///
/// Only `projects` and `activeProjectId` survive a restart. Conversion is
/// pure so it can be tested without any storage.

use crate::core::project::Project;
use crate::core::registry::RegistryState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub active_project_id: Option<String>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub fn to_snapshot(state: &RegistryState) -> Snapshot {
    Snapshot {
        projects: state.projects.clone(),
        active_project_id: state.active_project_id.clone(),
    }
}

/// Rebuild registry state from a snapshot
///
/// A hand-edited slot could repeat an id; only the first project with a
/// given id is kept.
pub fn from_snapshot(snapshot: Snapshot) -> RegistryState {
    let mut seen = HashSet::new();
    let mut projects = Vec::with_capacity(snapshot.projects.len());

    for project in snapshot.projects {
        if seen.insert(project.id.clone()) {
            projects.push(project);
        } else {
            warn!(id = %project.id, "dropping project with duplicate id from snapshot");
        }
    }

    RegistryState {
        projects,
        active_project_id: snapshot.active_project_id,
    }
}
