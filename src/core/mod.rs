/// Core functionality modules
///
/// The project model, the registry that owns it, id generation, type
/// detection and the "add project" flow.

pub mod id_generator;
pub mod importer;
pub mod project;
pub mod registry;
pub mod type_detector;

pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use importer::{import_project, DirectoryPicker, ImportOutcome};
pub use project::{NewProject, Project, ProjectPatch, ProjectType};
pub use registry::{RegistryState, RegistryStore, DEFAULT_ACTIVE_ID};
pub use type_detector::{FsProbe, ProbeService, TypeDetector};
