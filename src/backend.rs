//! Persistence backends for tasks.
//!
//! The store talks to a [`TaskBackend`] it is handed at construction; no
//! backend is ever reached through a global. Documents are keyed per user
//! with no cross-user visibility.
//!
//! # On-disk layout (JsonBackend)
//!
//! ```text
//! <data-dir>/
//!   users/
//!     <user>/
//!       tasks.json        # per-user task document
//!       tasks.json.lock   # cross-process write lock
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::{Task, TaskDraft, TaskPatch};

const USERS_DIR: &str = "users";
const TASKS_FILE: &str = "tasks.json";
const TASKS_SCHEMA_VERSION: &str = "studyplan.tasks.v1";

/// Document-store contract the task store depends on.
///
/// `create_task` assigns and returns the new task's id; `delete_task` is
/// idempotent (deleting an absent id is not an error, matching the
/// document-store it stands in for).
pub trait TaskBackend {
    fn list_tasks(&self, user: &str) -> Result<Vec<Task>>;
    fn create_task(
        &self,
        user: &str,
        draft: &TaskDraft,
        created_date: DateTime<Utc>,
    ) -> Result<String>;
    fn update_task(&self, user: &str, id: &str, patch: &TaskPatch) -> Result<()>;
    fn delete_task(&self, user: &str, id: &str) -> Result<()>;
}

/// Persisted per-user task document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TasksDocument {
    schema_version: String,
    tasks: Vec<Task>,
}

impl TasksDocument {
    fn empty() -> Self {
        Self {
            schema_version: TASKS_SCHEMA_VERSION.to_string(),
            tasks: Vec::new(),
        }
    }
}

/// File-backed task storage with per-user JSON documents.
///
/// Writes take an exclusive file lock and go through atomic temp+rename,
/// so concurrent processes sharing a data dir see whole documents only.
#[derive(Debug, Clone)]
pub struct JsonBackend {
    data_dir: PathBuf,
}

impl JsonBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.data_dir.join(USERS_DIR).join(user_key(user))
    }

    fn tasks_file(&self, user: &str) -> PathBuf {
        self.user_dir(user).join(TASKS_FILE)
    }

    fn lock_file(&self, user: &str) -> PathBuf {
        self.user_dir(user).join(format!("{TASKS_FILE}.lock"))
    }

    fn read_document(&self, user: &str) -> Result<TasksDocument> {
        let path = self.tasks_file(user);
        if !path.exists() {
            return Ok(TasksDocument::empty());
        }
        let content = fs::read_to_string(&path)?;
        let document: TasksDocument = serde_json::from_str(&content)?;
        Ok(document)
    }

    fn write_document(&self, user: &str, document: &TasksDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        lock::write_atomic(&self.tasks_file(user), json.as_bytes())
    }

    /// Locked read-modify-write over the user's document
    fn update_document<T, F>(&self, user: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut TasksDocument) -> Result<T>,
    {
        let _lock = FileLock::acquire(self.lock_file(user), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut document = self.read_document(user)?;
        let result = f(&mut document)?;
        self.write_document(user, &document)?;
        Ok(result)
    }
}

impl TaskBackend for JsonBackend {
    fn list_tasks(&self, user: &str) -> Result<Vec<Task>> {
        Ok(self.read_document(user)?.tasks)
    }

    fn create_task(
        &self,
        user: &str,
        draft: &TaskDraft,
        created_date: DateTime<Utc>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let task = draft.clone().into_task(id.clone(), created_date);
        self.update_document(user, |document| {
            document.tasks.push(task);
            Ok(())
        })?;
        tracing::debug!(user, id = %id, "created task document entry");
        Ok(id)
    }

    fn update_task(&self, user: &str, id: &str, patch: &TaskPatch) -> Result<()> {
        self.update_document(user, |document| {
            let task = document
                .tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
            patch.apply(task);
            Ok(())
        })
    }

    fn delete_task(&self, user: &str, id: &str) -> Result<()> {
        self.update_document(user, |document| {
            document.tasks.retain(|task| task.id != id);
            Ok(())
        })
    }
}

/// Map an arbitrary user id onto a safe directory name. Names made
/// entirely of dots would resolve to the users dir or its parent, so
/// their dots are rewritten too.
fn user_key(user: &str) -> String {
    let dots_only = !user.is_empty() && user.chars().all(|ch| ch == '.');
    let mut key = String::new();
    for ch in user.chars() {
        let keep_dot = ch == '.' && !dots_only;
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || keep_dot {
            key.push(ch);
        } else {
            key.push('_');
        }
    }
    if key.is_empty() {
        "_".to_string()
    } else {
        key
    }
}

/// In-memory backend for tests and embedders.
///
/// `fail_writes`/`fail_reads` poison the corresponding operations so
/// callers can exercise `FetchFailed`/`PersistFailed` paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tasks: Mutex<HashMap<String, Vec<Task>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a user's collection
    pub fn seed(&self, user: &str, tasks: Vec<Task>) {
        self.tasks
            .lock()
            .expect("memory backend poisoned")
            .insert(user.to_string(), tasks);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::Io(std::io::Error::other("memory backend write poisoned")))
        } else {
            Ok(())
        }
    }
}

impl TaskBackend for MemoryBackend {
    fn list_tasks(&self, user: &str) -> Result<Vec<Task>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other(
                "memory backend read poisoned",
            )));
        }
        Ok(self
            .tasks
            .lock()
            .expect("memory backend poisoned")
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    fn create_task(
        &self,
        user: &str,
        draft: &TaskDraft,
        created_date: DateTime<Utc>,
    ) -> Result<String> {
        self.check_write()?;
        let id = Uuid::new_v4().to_string();
        let task = draft.clone().into_task(id.clone(), created_date);
        self.tasks
            .lock()
            .expect("memory backend poisoned")
            .entry(user.to_string())
            .or_default()
            .push(task);
        Ok(id)
    }

    fn update_task(&self, user: &str, id: &str, patch: &TaskPatch) -> Result<()> {
        self.check_write()?;
        let mut tasks = self.tasks.lock().expect("memory backend poisoned");
        let task = tasks
            .get_mut(user)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == id))
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        patch.apply(task);
        Ok(())
    }

    fn delete_task(&self, user: &str, id: &str) -> Result<()> {
        self.check_write()?;
        if let Some(tasks) = self
            .tasks
            .lock()
            .expect("memory backend poisoned")
            .get_mut(user)
        {
            tasks.retain(|task| task.id != id);
        }
        Ok(())
    }
}
