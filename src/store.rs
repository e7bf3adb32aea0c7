//! The task store: the single owner of the in-memory task collection.
//!
//! All mutation flows through this type; views read the collection through
//! [`TaskStore::tasks`] and derive from it with the filter module. The
//! backend is injected at construction and owns durability.
//!
//! Consistency policy: `create` appends only after the backend accepted the
//! write; `update` and `delete` mutate locally first and roll back if the
//! backend rejects the write, so local and remote state cannot silently
//! diverge.

use chrono::Utc;

use crate::backend::TaskBackend;
use crate::error::{Error, Result};
use crate::task::{Task, TaskDraft, TaskPatch};

/// Authoritative in-memory set of the current user's tasks, synchronized
/// with an injected persistence backend.
pub struct TaskStore {
    backend: Box<dyn TaskBackend>,
    user: Option<String>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl TaskStore {
    pub fn new(backend: Box<dyn TaskBackend>, user: Option<String>) -> Self {
        Self {
            backend,
            user,
            tasks: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// The current collection; never mutated outside this store
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether a load is in flight
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Store-level error surfaced to the whole list/calendar view.
    /// Only failed loads set this; mutation failures stay with the caller.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn current_user(&self) -> Result<&str> {
        self.user.as_deref().ok_or(Error::AuthenticationRequired)
    }

    /// Fetch all tasks for the authenticated user, replacing the in-memory
    /// set. On failure the collection is left as it was and the error is
    /// recorded on the store.
    pub fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.load_inner();
        self.loading = false;
        match &result {
            Ok(()) => self.error = None,
            Err(err) => {
                tracing::warn!(error = %err, "task load failed");
                self.error = Some(err.to_string());
            }
        }
        result
    }

    fn load_inner(&mut self) -> Result<()> {
        let user = self.current_user()?.to_string();
        let tasks = self
            .backend
            .list_tasks(&user)
            .map_err(Error::fetch)?;
        self.tasks = tasks;
        Ok(())
    }

    /// Re-fetch from the backend; manual reconciliation point for callers
    /// that want to resync after external writes.
    pub fn refetch(&mut self) -> Result<()> {
        self.load()
    }

    /// Create a task from a draft. The backend assigns the id; the task is
    /// appended to the in-memory set only once the write succeeded, so a
    /// failed create leaves the collection untouched.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let user = self.current_user()?.to_string();
        let created_date = Utc::now();
        let id = self
            .backend
            .create_task(&user, &draft, created_date)
            .map_err(Error::persist)?;
        let task = draft.into_task(id, created_date);
        tracing::debug!(id = %task.id, "task created");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Merge a partial update into the task matching `id`.
    ///
    /// Optimistic: the local record is patched immediately and restored if
    /// the backend rejects the write.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> Result<()> {
        let user = self.current_user()?.to_string();
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        let previous = self.tasks[index].clone();
        patch.apply(&mut self.tasks[index]);

        if let Err(err) = self.backend.update_task(&user, id, patch) {
            tracing::warn!(id, error = %err, "task update failed, rolling back");
            self.tasks[index] = previous;
            return Err(Error::persist(err));
        }
        Ok(())
    }

    /// Remove the task matching `id` from the backend and the in-memory
    /// set.
    ///
    /// Optimistic: the local record is removed immediately and reinserted
    /// at its original position if the backend rejects the delete. Unknown
    /// ids are a `TaskNotFound` error.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let user = self.current_user()?.to_string();
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        let removed = self.tasks.remove(index);

        if let Err(err) = self.backend.delete_task(&user, id) {
            tracing::warn!(id, error = %err, "task delete failed, restoring");
            self.tasks.insert(index, removed);
            return Err(Error::persist(err));
        }
        Ok(())
    }

    /// Flip `completed` on the matching task; silently does nothing when
    /// the id is absent.
    pub fn toggle_complete(&mut self, id: &str) -> Result<()> {
        let Some(task) = self.find(id) else {
            return Ok(());
        };
        let patch = TaskPatch {
            completed: Some(!task.completed),
            ..TaskPatch::default()
        };
        self.update(id, &patch)
    }

    /// Flip `importance` on the matching task; silently does nothing when
    /// the id is absent.
    pub fn toggle_importance(&mut self, id: &str) -> Result<()> {
        let Some(task) = self.find(id) else {
            return Ok(());
        };
        let patch = TaskPatch {
            importance: Some(!task.importance),
            ..TaskPatch::default()
        };
        self.update(id, &patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::sync::Arc;

    struct SharedBackend(Arc<MemoryBackend>);

    impl TaskBackend for SharedBackend {
        fn list_tasks(&self, user: &str) -> Result<Vec<Task>> {
            self.0.list_tasks(user)
        }
        fn create_task(
            &self,
            user: &str,
            draft: &TaskDraft,
            created_date: chrono::DateTime<Utc>,
        ) -> Result<String> {
            self.0.create_task(user, draft, created_date)
        }
        fn update_task(&self, user: &str, id: &str, patch: &TaskPatch) -> Result<()> {
            self.0.update_task(user, id, patch)
        }
        fn delete_task(&self, user: &str, id: &str) -> Result<()> {
            self.0.delete_task(user, id)
        }
    }

    fn store_with_backend() -> (TaskStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = TaskStore::new(
            Box::new(SharedBackend(Arc::clone(&backend))),
            Some("alice".to_string()),
        );
        (store, backend)
    }

    fn draft(description: &str, due: &str) -> TaskDraft {
        TaskDraft {
            description: description.to_string(),
            due_date: due.to_string(),
            ..TaskDraft::new(description)
        }
    }

    #[test]
    fn load_requires_a_user() {
        let mut store = TaskStore::new(Box::new(MemoryBackend::new()), None);
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::AuthenticationRequired));
        assert!(store.error().is_some());
        assert!(!store.loading());
    }

    #[test]
    fn create_then_list_contains_the_new_task() {
        let (mut store, _) = store_with_backend();
        store.load().unwrap();

        let task = store
            .create(draft("Write report", "2025-03-10"))
            .unwrap();

        assert_eq!(store.tasks().len(), 1);
        let stored = &store.tasks()[0];
        assert_eq!(stored.id, task.id);
        assert_eq!(stored.description, "Write report");
        assert!(!stored.completed);
        assert!(!stored.importance);
    }

    #[test]
    fn failed_create_leaves_collection_untouched() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();

        backend.set_fail_writes(true);
        let err = store.create(draft("Doomed", "")).unwrap_err();
        assert!(matches!(err, Error::PersistFailed(_)));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn load_replaces_local_state_and_clears_error() {
        let (mut store, backend) = store_with_backend();

        backend.set_fail_reads(true);
        assert!(store.load().is_err());
        assert!(store.error().is_some());

        backend.set_fail_reads(false);
        store.load().unwrap();
        assert!(store.error().is_none());
    }

    #[test]
    fn update_merges_and_persists() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();
        let task = store.create(draft("Read", "2025-04-01")).unwrap();

        store
            .update(
                &task.id,
                &TaskPatch {
                    description: Some("Read chapter 5".to_string()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        assert_eq!(store.tasks()[0].description, "Read chapter 5");
        assert_eq!(
            backend.list_tasks("alice").unwrap()[0].description,
            "Read chapter 5"
        );
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (mut store, _) = store_with_backend();
        store.load().unwrap();
        let err = store.update("missing", &TaskPatch::default()).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn failed_update_rolls_back_local_state() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();
        let task = store.create(draft("Stable", "")).unwrap();

        backend.set_fail_writes(true);
        let err = store
            .update(
                &task.id,
                &TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, Error::PersistFailed(_)));
        assert!(!store.tasks()[0].completed, "local state rolled back");
        // Mutation failures never set the store-level error
        assert!(store.error().is_none());
    }

    #[test]
    fn delete_removes_from_store_and_backend() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();
        let task = store.create(draft("Gone soon", "")).unwrap();

        store.delete(&task.id).unwrap();
        assert!(store.tasks().is_empty());
        assert!(backend.list_tasks("alice").unwrap().is_empty());
    }

    #[test]
    fn failed_delete_restores_the_task_in_place() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();
        let first = store.create(draft("first", "")).unwrap();
        let second = store.create(draft("second", "")).unwrap();

        backend.set_fail_writes(true);
        assert!(store.delete(&first.id).is_err());

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, [first.id.as_str(), second.id.as_str()]);
    }

    #[test]
    fn toggle_complete_twice_returns_to_original() {
        let (mut store, _) = store_with_backend();
        store.load().unwrap();
        let task = store.create(draft("Flip me", "")).unwrap();

        store.toggle_complete(&task.id).unwrap();
        assert!(store.tasks()[0].completed);
        store.toggle_complete(&task.id).unwrap();
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn toggles_are_silent_no_ops_for_unknown_ids() {
        let (mut store, _) = store_with_backend();
        store.load().unwrap();
        store.toggle_complete("missing").unwrap();
        store.toggle_importance("missing").unwrap();
    }

    #[test]
    fn toggle_importance_is_independent_of_completion() {
        let (mut store, _) = store_with_backend();
        store.load().unwrap();
        let task = store.create(draft("Star me", "")).unwrap();

        store.toggle_complete(&task.id).unwrap();
        store.toggle_importance(&task.id).unwrap();

        let stored = &store.tasks()[0];
        assert!(stored.completed && stored.importance);
    }

    #[test]
    fn refetch_reconciles_external_writes() {
        let (mut store, backend) = store_with_backend();
        store.load().unwrap();
        assert!(store.tasks().is_empty());

        backend
            .create_task("alice", &draft("Added elsewhere", ""), Utc::now())
            .unwrap();
        store.refetch().unwrap();
        assert_eq!(store.tasks().len(), 1);
    }
}
