/// Project registry and active-project pointer
///
/// All operations are synchronous and run to completion. Unknown ids are
/// never an error: ids can go stale between a user action and the call
/// that acts on it, so lookups that miss are logged and ignored.
///
/// After every mutating operation the full `{projects, activeProjectId}`
/// snapshot is handed to the configured sink.

use crate::core::id_generator::IdGenerator;
use crate::core::project::{NewProject, Project, ProjectPatch, ProjectType};
use crate::persistence::{from_snapshot, to_snapshot, Snapshot, SnapshotSink};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Id of the built-in project used when nothing has been stored yet
pub const DEFAULT_ACTIVE_ID: &str = "antigravity-manager";

/// Source of "now" for `lastActive`
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send>;

/// The durable part of the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryState {
    pub projects: Vec<Project>,
    pub active_project_id: Option<String>,
}

impl RegistryState {
    /// Seed used on first run
    pub fn default_seed(now: DateTime<Utc>) -> Self {
        Self {
            projects: vec![Project {
                id: DEFAULT_ACTIVE_ID.to_string(),
                name: "Antigravity Manager".to_string(),
                path: "~/Projects/antigravity-manager".to_string(),
                project_type: ProjectType::Tauri,
                last_active: now,
                ai_context: Some("Desktop app that manages AI accounts and projects".to_string()),
                color: None,
            }],
            active_project_id: Some(DEFAULT_ACTIVE_ID.to_string()),
        }
    }
}

pub struct RegistryStore {
    state: RegistryState,
    ids: Box<dyn IdGenerator>,
    sink: Box<dyn SnapshotSink>,
    clock: Clock,
}

impl RegistryStore {
    /// Build the store from a loaded snapshot, or the default seed when
    /// there is none
    pub fn hydrate(
        snapshot: Option<Snapshot>,
        ids: impl IdGenerator + 'static,
        sink: impl SnapshotSink + 'static,
    ) -> Self {
        let state = match snapshot {
            Some(snapshot) => from_snapshot(snapshot),
            None => {
                info!("starting from the default project list");
                RegistryState::default_seed(Utc::now())
            }
        };

        Self {
            state,
            ids: Box::new(ids),
            sink: Box::new(sink),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock used for `lastActive`
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn len(&self) -> usize {
        self.state.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.id == id)
    }

    /// First project registered at exactly `path`
    pub fn find_by_path(&self, path: &str) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.path == path)
    }

    pub fn active_project_id(&self) -> Option<&str> {
        self.state.active_project_id.as_deref()
    }

    /// The active project, if the pointer is set and refers to a known project
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id().and_then(|id| self.get(id))
    }

    /// Register a new project
    ///
    /// Assigns a fresh id and stamps `lastActive` with the current time.
    pub fn add(&mut self, data: NewProject) -> Project {
        let project = Project {
            id: self.ids.next_id(),
            name: data.name,
            path: data.path,
            project_type: data.project_type,
            last_active: (self.clock)(),
            ai_context: data.ai_context,
            color: data.color,
        };

        info!(id = %project.id, path = %project.path, "added project");
        self.state.projects.push(project.clone());
        self.persist();

        project
    }

    /// Delete a project; clears the active pointer if it pointed at it
    pub fn remove(&mut self, id: &str) {
        let before = self.state.projects.len();
        self.state.projects.retain(|p| p.id != id);

        if self.state.projects.len() == before {
            debug!(id, "remove: no such project");
        } else {
            info!(id, "removed project");
        }

        if self.state.active_project_id.as_deref() == Some(id) {
            self.state.active_project_id = None;
        }

        self.persist();
    }

    /// Merge `patch` into the project with the given id
    pub fn update(&mut self, id: &str, patch: ProjectPatch) {
        match self.find_mut(id) {
            Some(project) => patch.apply(project),
            None => {
                debug!(id, "update: no such project");
            }
        }

        self.persist();
    }

    /// Point the registry at a project, or at nothing
    ///
    /// The id is not checked against the registry. For `Some(id)` the
    /// project's `lastActive` is refreshed after the pointer moves.
    pub fn set_active(&mut self, id: Option<&str>) {
        self.state.active_project_id = id.map(|s| s.to_string());

        if let Some(id) = id {
            if !self.touch(id) {
                debug!(id, "set_active: pointer set to an unknown project");
            }
        }

        self.persist();
    }

    /// Stamp `lastActive` with the current time
    pub fn refresh_active_timestamp(&mut self, id: &str) {
        if !self.touch(id) {
            debug!(id, "refresh_active_timestamp: no such project");
        }

        self.persist();
    }

    /// Hand the current snapshot to the sink
    fn persist(&self) {
        if let Err(e) = self.sink.save(to_snapshot(&self.state)) {
            warn!(error = %e, "could not persist project registry");
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.state.projects.iter_mut().find(|p| p.id == id)
    }

    /// Returns false when there is no such project
    fn touch(&mut self, id: &str) -> bool {
        let now = (self.clock)();
        match self.find_mut(id) {
            Some(project) => {
                // Never move backwards, even if the wall clock does
                if now > project.last_active {
                    project.last_active = now;
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id_generator::{SequentialIdGenerator, UuidGenerator};
    use crate::persistence::MemorySink;
    use crate::error::{RegistryError, Result};
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Default seed, random ids, snapshots kept in memory
    fn seeded_store() -> RegistryStore {
        RegistryStore::hydrate(None, UuidGenerator, MemorySink::new())
    }

    fn empty_store() -> (RegistryStore, MemorySink) {
        let sink = MemorySink::new();
        let empty = Snapshot {
            projects: vec![],
            active_project_id: None,
        };
        let store = RegistryStore::hydrate(
            Some(empty),
            SequentialIdGenerator::new("p"),
            sink.clone(),
        );
        (store, sink)
    }

    fn web(name: &str) -> NewProject {
        NewProject::new(name, format!("/work/{}", name), ProjectType::Web)
    }

    /// Clock the test can move by hand
    fn manual_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, impl Fn() -> DateTime<Utc> + Send) {
        let now = Arc::new(Mutex::new(start));
        let handle = Arc::clone(&now);
        (handle, move || *now.lock().unwrap())
    }

    struct FailingSink;

    impl SnapshotSink for FailingSink {
        fn save(&self, _snapshot: Snapshot) -> Result<()> {
            Err(RegistryError::Persistence("disk full".to_string()))
        }
    }

    #[test]
    fn test_hydrate_without_snapshot_uses_seed() {
        let store = seeded_store();

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_project_id(), Some(DEFAULT_ACTIVE_ID));
        assert_eq!(store.active_project().unwrap().project_type, ProjectType::Tauri);
    }

    #[test]
    fn test_hydrate_does_not_write() {
        let sink = MemorySink::new();
        let _store = RegistryStore::hydrate(None, UuidGenerator, sink.clone());
        assert_eq!(sink.write_count(), 0);
    }

    #[test]
    fn test_add_assigns_id_and_timestamp() {
        let start = Utc.with_ymd_and_hms(2025, 11, 25, 9, 0, 0).unwrap();
        let (_, clock) = manual_clock(start);
        let (store, _) = empty_store();
        let mut store = store.with_clock(clock);

        let project = store.add(web("site").with_color("#123456"));

        assert_eq!(project.id, "p-1");
        assert_eq!(project.last_active, start);
        assert_eq!(project.color.as_deref(), Some("#123456"));
        assert_eq!(store.get("p-1"), Some(&project));
    }

    #[test]
    fn test_add_ids_unique() {
        let mut store = seeded_store();
        let mut ids: HashSet<String> = store.projects().iter().map(|p| p.id.clone()).collect();

        for i in 0..50 {
            let project = store.add(web(&format!("app{}", i)));
            assert!(ids.insert(project.id));
        }
        assert_eq!(store.len(), 51);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let (mut store, _) = empty_store();
        store.add(web("one"));
        store.add(web("two"));
        store.add(web("three"));

        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_add_persists_snapshot() {
        let (mut store, sink) = empty_store();
        let project = store.add(web("site"));

        let last = sink.last().unwrap();
        assert_eq!(last.projects, vec![project]);
        assert!(last.active_project_id.is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut store, _) = empty_store();
        let a = store.add(web("a"));
        store.add(web("b"));

        store.remove(&a.id);
        let after_first = store.state().clone();
        store.remove(&a.id);

        assert_eq!(store.state(), &after_first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_active_clears_pointer() {
        let (mut store, sink) = empty_store();
        let a = store.add(web("a"));
        store.set_active(Some(&a.id));

        store.remove(&a.id);

        assert!(store.active_project_id().is_none());
        assert!(sink.last().unwrap().active_project_id.is_none());
    }

    #[test]
    fn test_remove_other_keeps_pointer() {
        let (mut store, _) = empty_store();
        let a = store.add(web("a"));
        let b = store.add(web("b"));
        store.set_active(Some(&a.id));

        store.remove(&b.id);
        assert_eq!(store.active_project_id(), Some(a.id.as_str()));
    }

    #[test]
    fn test_update_changes_only_name() {
        let (mut store, _) = empty_store();
        let a = store.add(web("a"));
        let b = store.add(web("b"));

        store.update(&a.id, ProjectPatch::name("X"));

        let mut expected = a.clone();
        expected.name = "X".to_string();
        assert_eq!(store.get(&a.id), Some(&expected));
        assert_eq!(store.get(&b.id), Some(&b));
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let (mut store, _) = empty_store();
        store.add(web("a"));
        let before = store.state().clone();

        store.update("missing", ProjectPatch::name("X"));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_update_does_not_touch_last_active() {
        let start = Utc.with_ymd_and_hms(2025, 11, 25, 9, 0, 0).unwrap();
        let (now, clock) = manual_clock(start);
        let (store, _) = empty_store();
        let mut store = store.with_clock(clock);
        let a = store.add(web("a"));

        *now.lock().unwrap() = start + Duration::hours(1);
        store.update(
            &a.id,
            ProjectPatch {
                project_type: Some(ProjectType::Rust),
                ai_context: Some(Some("rewrite in rust".to_string())),
                ..ProjectPatch::default()
            },
        );

        let updated = store.get(&a.id).unwrap();
        assert_eq!(updated.last_active, start);
        assert_eq!(updated.project_type, ProjectType::Rust);
        assert_eq!(updated.ai_context.as_deref(), Some("rewrite in rust"));
    }

    #[test]
    fn test_set_active_refreshes_timestamp() {
        let start = Utc.with_ymd_and_hms(2025, 11, 25, 9, 0, 0).unwrap();
        let (now, clock) = manual_clock(start);
        let (store, _) = empty_store();
        let mut store = store.with_clock(clock);
        let a = store.add(web("a"));

        *now.lock().unwrap() = start + Duration::minutes(5);
        store.set_active(Some(&a.id));

        assert_eq!(store.active_project_id(), Some(a.id.as_str()));
        assert_eq!(store.get(&a.id).unwrap().last_active, start + Duration::minutes(5));
    }

    #[test]
    fn test_set_active_never_moves_timestamp_back() {
        let start = Utc.with_ymd_and_hms(2025, 11, 25, 9, 0, 0).unwrap();
        let (now, clock) = manual_clock(start);
        let (store, _) = empty_store();
        let mut store = store.with_clock(clock);
        let a = store.add(web("a"));

        *now.lock().unwrap() = start - Duration::hours(2);
        store.set_active(Some(&a.id));

        assert_eq!(store.get(&a.id).unwrap().last_active, start);
    }

    #[test]
    fn test_set_active_with_real_clock() {
        let mut store = seeded_store();
        let a = store.add(web("a"));
        let before = a.last_active;

        store.set_active(Some(&a.id));
        assert!(store.get(&a.id).unwrap().last_active >= before);
    }

    #[test]
    fn test_set_active_unknown_id_is_accepted() {
        let (mut store, _) = empty_store();
        store.add(web("a"));
        let projects_before = store.projects().to_vec();

        store.set_active(Some("ghost"));

        assert_eq!(store.active_project_id(), Some("ghost"));
        assert!(store.active_project().is_none());
        assert_eq!(store.projects(), projects_before.as_slice());
    }

    #[test]
    fn test_set_active_none() {
        let mut store = seeded_store();
        store.set_active(None);
        assert!(store.active_project_id().is_none());
    }

    #[test]
    fn test_set_active_single_write() {
        let (mut store, sink) = empty_store();
        let a = store.add(web("a"));
        let writes = sink.write_count();

        store.set_active(Some(&a.id));
        assert_eq!(sink.write_count(), writes + 1);
        assert_eq!(sink.last().unwrap().active_project_id, Some(a.id));
    }

    #[test]
    fn test_refresh_unknown_is_noop() {
        let (mut store, _) = empty_store();
        store.add(web("a"));
        let before = store.state().clone();

        store.refresh_active_timestamp("missing");
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_every_mutation_persists_full_snapshot() {
        let (mut store, sink) = empty_store();
        let a = store.add(web("a"));
        store.update(&a.id, ProjectPatch::name("renamed"));
        store.set_active(Some(&a.id));
        store.refresh_active_timestamp(&a.id);
        store.remove("missing");

        assert_eq!(sink.write_count(), 5);
        assert_eq!(from_snapshot(sink.last().unwrap()), *store.state());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let mut store = RegistryStore::hydrate(None, SequentialIdGenerator::new("p"), FailingSink);
        let a = store.add(web("a"));
        store.set_active(Some(&a.id));

        assert_eq!(store.active_project().map(|p| p.name.as_str()), Some("a"));
    }

    #[test]
    fn test_restore_from_persisted_snapshot() {
        let (mut store, sink) = empty_store();
        let a = store.add(web("a"));
        store.add(web("b"));
        store.set_active(Some(&a.id));

        let restored = RegistryStore::hydrate(sink.last(), UuidGenerator, MemorySink::new());
        assert_eq!(restored.state(), store.state());
    }

    #[test]
    fn test_find_by_path() {
        let (mut store, _) = empty_store();
        let a = store.add(web("a"));

        assert_eq!(store.find_by_path("/work/a"), Some(&a));
        assert!(store.find_by_path("/work/zzz").is_none());
    }
}
