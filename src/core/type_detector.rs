/// Project type detection
///
/// Looks for well-known marker files inside a project directory and maps the
/// first one found to a `ProjectType`.

use crate::core::project::ProjectType;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Marker files in priority order, relative to the project directory.
///
/// Tauri apps usually also carry a package.json, so the Tauri config has to
/// be checked before it.
const TYPE_MARKERS: &[(&str, ProjectType)] = &[
    ("src-tauri/tauri.conf.json", ProjectType::Tauri),
    ("Cargo.toml", ProjectType::Rust),
    ("package.json", ProjectType::Web),
];

/// Answers "does this path exist?"
///
/// Injected so detection can run against a fake filesystem in tests or a
/// platform API other than `std::fs`.
#[async_trait]
pub trait ProbeService: Send + Sync {
    async fn exists(&self, path: &Path) -> io::Result<bool>;
}

/// Probes the local filesystem through tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

#[async_trait]
impl ProbeService for FsProbe {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }
}

/// Classifies directories by their marker files
pub struct TypeDetector<P = FsProbe> {
    probe: P,
}

impl TypeDetector<FsProbe> {
    pub fn new() -> Self {
        Self { probe: FsProbe }
    }
}

impl Default for TypeDetector<FsProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProbeService> TypeDetector<P> {
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Detect the project type of a directory
    ///
    /// Probes the markers in order and stops at the first hit. Never fails:
    /// a probe error is logged and the project is classified as `Other`.
    ///
    /// # Examples
    /// ```no_run
    /// use antigravity_projects_lib::core::TypeDetector;
    ///
    /// # async fn example() {
    /// let detector = TypeDetector::new();
    /// let project_type = detector.detect("/home/me/code/my-app").await;
    /// println!("{}", project_type);
    /// # }
    /// ```
    pub async fn detect<Q: AsRef<Path>>(&self, path: Q) -> ProjectType {
        let path = path.as_ref();

        match self.probe_markers(path).await {
            Ok(project_type) => {
                debug!(path = %path.display(), %project_type, "detected project type");
                project_type
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "type detection failed, using 'other'");
                ProjectType::Other
            }
        }
    }

    async fn probe_markers(&self, path: &Path) -> io::Result<ProjectType> {
        for (marker, project_type) in TYPE_MARKERS {
            if self.probe.exists(&path.join(marker)).await? {
                return Ok(*project_type);
            }
        }

        Ok(ProjectType::Other)
    }
}

/// Full marker paths checked for `path`, in probe order
///
/// Handy for explaining a classification to the user.
pub fn marker_paths<P: AsRef<Path>>(path: P) -> Vec<PathBuf> {
    TYPE_MARKERS
        .iter()
        .map(|(marker, _)| path.as_ref().join(marker))
        .collect()
}
