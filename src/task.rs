//! Task entity and its create/update payloads.
//!
//! Tasks serialize with camelCase field names (`dueDate`, `subTasks`,
//! `createdDate`) so the persisted per-user document keeps the layout the
//! rest of the product writes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default list label for new tasks
pub const DEFAULT_LIST: &str = "Personal";

/// Lists the product ships with; users may add their own labels
pub const WELL_KNOWN_LISTS: [&str; 3] = ["Personal", "Work", "Study"];

/// Task priority, independent of the starred `importance` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

/// A user-owned to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque id assigned by the backend on creation; stable for the
    /// task's lifetime
    pub id: String,
    pub description: String,
    #[serde(default = "default_list")]
    pub list: String,
    /// `YYYY-MM-DD` in local time; empty when the task has no due date
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub due_date: String,
    /// Free-text secondary description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub_tasks: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Starred flag, independent of priority
    #[serde(default)]
    pub importance: bool,
    pub created_date: DateTime<Utc>,
}

fn default_list() -> String {
    DEFAULT_LIST.to_string()
}

impl Task {
    /// Whether this task carries a due date at all
    pub fn has_due_date(&self) -> bool {
        !self.due_date.is_empty()
    }
}

/// Fields accepted when creating a task.
///
/// `description` is the only required field; the form layer is responsible
/// for rejecting empty descriptions before a draft reaches the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub description: String,
    #[serde(default = "default_list")]
    pub list: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub sub_tasks: String,
    #[serde(default)]
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            list: default_list(),
            ..Self::default()
        }
    }

    /// Materialize the draft into a full task with a backend-assigned id
    pub fn into_task(self, id: String, created_date: DateTime<Utc>) -> Task {
        Task {
            id,
            description: self.description,
            list: if self.list.is_empty() {
                default_list()
            } else {
                self.list
            },
            due_date: self.due_date,
            sub_tasks: self.sub_tasks,
            priority: self.priority,
            completed: false,
            importance: false,
            created_date,
        }
    }
}

/// Partial update merged into an existing task; absent fields are left
/// untouched, never cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.list.is_none()
            && self.due_date.is_none()
            && self.sub_tasks.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.importance.is_none()
    }

    /// Merge this patch into a task, field by field
    pub fn apply(&self, task: &mut Task) {
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(list) = &self.list {
            task.list = list.clone();
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(sub_tasks) = &self.sub_tasks {
            task.sub_tasks = sub_tasks.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(importance) = self.importance {
            task.importance = importance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        TaskDraft {
            description: "Write report".to_string(),
            list: "Work".to_string(),
            due_date: "2025-03-10".to_string(),
            sub_tasks: String::new(),
            priority: Priority::Medium,
        }
        .into_task("t1".to_string(), Utc::now())
    }

    #[test]
    fn draft_materializes_with_defaults() {
        let task = sample();
        assert_eq!(task.id, "t1");
        assert!(!task.completed);
        assert!(!task.importance);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn draft_with_empty_list_falls_back_to_personal() {
        let task = TaskDraft {
            description: "x".to_string(),
            ..TaskDraft::default()
        }
        .into_task("t2".to_string(), Utc::now());
        assert_eq!(task.list, DEFAULT_LIST);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut task = sample();
        let patch = TaskPatch {
            completed: Some(true),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);

        assert!(task.completed);
        assert_eq!(task.priority, Priority::High);
        // Untouched fields survive
        assert_eq!(task.description, "Write report");
        assert_eq!(task.due_date, "2025-03-10");
    }

    #[test]
    fn empty_patch_is_detectable() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            importance: Some(true),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn serialized_field_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdDate").is_some());
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn deserializes_documents_missing_optional_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":"a","description":"Read","createdDate":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.list, DEFAULT_LIST);
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.has_due_date());
    }
}
