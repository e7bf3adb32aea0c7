//! Pure task filtering and derived counts.
//!
//! Every view (list, sidebar, calendar cell) goes through these functions;
//! nothing here holds state or touches the backend.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date;
use crate::error::Error;
use crate::task::Task;

/// A named predicate selecting a subset of tasks.
///
/// The date-based variants (`Today`, `Upcoming`, `Overdue`) exclude
/// completed tasks and never match a task without a due date. Any string
/// that is not a keyword names a list, so invalid filters are
/// unrepresentable rather than silently meaning "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Today,
    Upcoming,
    Overdue,
    Completed,
    Important,
    List(String),
}

impl Filter {
    /// Whether a task matches this filter, relative to `today`
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Filter::All => true,
            Filter::Today => !task.completed && date::is_today(&task.due_date, today),
            Filter::Upcoming => {
                !task.completed
                    && matches!(date::parse_date(&task.due_date), Ok(due) if due > today)
            }
            Filter::Overdue => !task.completed && date::is_past(&task.due_date, today),
            Filter::Completed => task.completed,
            Filter::Important => task.importance,
            Filter::List(name) => task.list == *name,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Today => f.write_str("today"),
            Filter::Upcoming => f.write_str("upcoming"),
            Filter::Overdue => f.write_str("overdue"),
            Filter::Completed => f.write_str("completed"),
            Filter::Important => f.write_str("important"),
            Filter::List(name) => f.write_str(name),
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("empty filter".to_string()));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "all" => Filter::All,
            "today" => Filter::Today,
            "upcoming" => Filter::Upcoming,
            "overdue" => Filter::Overdue,
            "completed" => Filter::Completed,
            "important" => Filter::Important,
            _ => Filter::List(trimmed.to_string()),
        })
    }
}

/// Tasks matching `filter`, in collection order
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &Filter, today: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task, today)).collect()
}

/// Tasks due on the given local date, regardless of completion
pub fn tasks_for_date(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    let day_string = date::format_date(day);
    tasks.iter().filter(|task| task.due_date == day_string).collect()
}

/// Aggregate counts for the sidebar, computed over the full collection in
/// one pass and independent of any active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub today: usize,
    pub upcoming: usize,
    pub overdue: usize,
    pub important: usize,
}

impl TaskCounts {
    pub fn tally(tasks: &[Task], today: NaiveDate) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            counts.total += 1;
            if task.completed {
                counts.completed += 1;
            } else {
                counts.pending += 1;
                match date::parse_date(&task.due_date) {
                    Ok(due) if due == today => counts.today += 1,
                    Ok(due) if due > today => counts.upcoming += 1,
                    Ok(_) => counts.overdue += 1,
                    Err(_) => {}
                }
            }
            if task.importance {
                counts.important += 1;
            }
        }
        counts
    }
}
