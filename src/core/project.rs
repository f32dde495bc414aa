/// Project entity and its category
///
/// Field names on the wire are camelCase so the stored document matches
/// what the desktop frontend reads.

use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Technology category inferred from marker files
///
/// Any unrecognised value in stored data reads as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Tauri,
    Web,
    Rust,
    #[default]
    #[serde(other)]
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Tauri => "tauri",
            ProjectType::Web => "web",
            ProjectType::Rust => "rust",
            ProjectType::Other => "other",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tauri" => Ok(ProjectType::Tauri),
            "web" => Ok(ProjectType::Web),
            "rust" => Ok(ProjectType::Rust),
            "other" => Ok(ProjectType::Other),
            other => Err(RegistryError::InvalidArgument(format!(
                "unknown project type '{}' (expected tauri, web, rust or other)",
                other
            ))),
        }
    }
}

/// A known project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub last_active: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Project {
    /// Derive a display name from a directory path
    ///
    /// Uses the last path component, or the whole path when there isn't one
    /// (e.g. `/`). Invalid UTF-8 is replaced, not rejected.
    pub fn name_from_path<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

/// Caller-supplied data for a new project
///
/// Trusted as already validated; the store only adds `id` and `lastActive`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProject {
    pub name: String,
    pub path: String,
    pub project_type: ProjectType,
    pub ai_context: Option<String>,
    pub color: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, path: impl Into<String>, project_type: ProjectType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            project_type,
            ai_context: None,
            color: None,
        }
    }

    pub fn with_ai_context(mut self, ai_context: impl Into<String>) -> Self {
        self.ai_context = Some(ai_context.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Partial update merged into an existing project
///
/// `None` leaves a field alone. For the optional fields `Some(None)` clears
/// the value. There is no way to change `id` or `lastActive` through a patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub path: Option<String>,
    pub project_type: Option<ProjectType>,
    pub ai_context: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the AI context, or clear it with `None`
    pub fn ai_context(ai_context: Option<String>) -> Self {
        Self {
            ai_context: Some(ai_context),
            ..Self::default()
        }
    }

    /// Merge the set fields into `project`
    pub(crate) fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(path) = self.path {
            project.path = path;
        }
        if let Some(project_type) = self.project_type {
            project.project_type = project_type;
        }
        if let Some(ai_context) = self.ai_context {
            project.ai_context = ai_context;
        }
        if let Some(color) = self.color {
            project.color = color;
        }
    }
}
