//! studyplan task command implementations.

use serde::Serialize;

use crate::cli::Context;
use crate::date;
use crate::error::{Error, Result};
use crate::filter::{Filter, TaskCounts};
use crate::output::{emit_success, HumanOutput};
use crate::task::{Priority, Task, TaskDraft, TaskPatch};

pub struct AddOptions {
    pub description: String,
    pub list: Option<String>,
    pub due: Option<String>,
    pub notes: Option<String>,
    pub priority: String,
    pub context: Context,
}

pub struct ListOptions {
    pub filter: String,
    pub context: Context,
}

pub struct EditOptions {
    pub id: String,
    pub description: Option<String>,
    pub list: Option<String>,
    pub due: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<String>,
    pub context: Context,
}

pub struct ToggleOptions {
    pub id: String,
    pub context: Context,
}

pub fn add(options: AddOptions) -> Result<()> {
    let description = options.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::InvalidArgument(
            "task description must not be empty".to_string(),
        ));
    }

    let due_date = match options.due.as_deref() {
        Some(due) if !due.trim().is_empty() => date::format_date(date::parse_date(due)?),
        _ => String::new(),
    };
    let priority: Priority = options.priority.parse()?;

    let (mut store, _config) = options.context.open_store()?;
    let draft = TaskDraft {
        description,
        list: options.list.unwrap_or_default(),
        due_date,
        sub_tasks: options.notes.unwrap_or_default(),
        priority,
    };
    let task = store.create(draft)?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("id", &task.id);
    human.push_summary("description", &task.description);
    human.push_summary("list", &task.list);
    if task.has_due_date() {
        human.push_summary("due", &task.due_date);
    }
    human.push_summary("priority", task.priority.as_str());

    emit_success(options.context.output, "add", &task, Some(&human))
}

#[derive(Serialize)]
struct ListData<'a> {
    filter: String,
    count: usize,
    tasks: Vec<&'a Task>,
}

pub fn list(options: ListOptions) -> Result<()> {
    let filter: Filter = options.filter.parse()?;
    let (store, _config) = options.context.open_store()?;

    let today = date::today();
    let tasks = crate::filter::filter_tasks(store.tasks(), &filter, today);

    let mut human = HumanOutput::new(format!(
        "{} task(s) matching '{filter}'",
        tasks.len()
    ));
    for task in &tasks {
        human.push_detail(describe(task));
    }

    let data = ListData {
        filter: filter.to_string(),
        count: tasks.len(),
        tasks,
    };
    emit_success(options.context.output, "list", &data, Some(&human))
}

pub fn edit(options: EditOptions) -> Result<()> {
    let due_date = match options.due.as_deref() {
        Some("") => Some(String::new()),
        Some(due) => Some(date::format_date(date::parse_date(due)?)),
        None => None,
    };
    let priority = options
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;

    if let Some(description) = options.description.as_deref() {
        if description.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "task description must not be empty".to_string(),
            ));
        }
    }

    let patch = TaskPatch {
        description: options.description,
        list: options.list,
        due_date,
        sub_tasks: options.notes,
        priority,
        completed: None,
        importance: None,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass at least one field".to_string(),
        ));
    }

    let (mut store, _config) = options.context.open_store()?;
    store.update(&options.id, &patch)?;
    let task = store
        .find(&options.id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("id", &task.id);
    human.push_detail(describe(&task));
    emit_success(options.context.output, "edit", &task, Some(&human))
}

pub fn done(options: ToggleOptions) -> Result<()> {
    let (mut store, _config) = options.context.open_store()?;
    if store.find(&options.id).is_none() {
        return Err(Error::TaskNotFound(options.id));
    }
    store.toggle_complete(&options.id)?;
    let task = store
        .find(&options.id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;

    let header = if task.completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_detail(describe(&task));
    emit_success(options.context.output, "done", &task, Some(&human))
}

pub fn star(options: ToggleOptions) -> Result<()> {
    let (mut store, _config) = options.context.open_store()?;
    if store.find(&options.id).is_none() {
        return Err(Error::TaskNotFound(options.id));
    }
    store.toggle_importance(&options.id)?;
    let task = store
        .find(&options.id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;

    let header = if task.importance {
        "Task starred"
    } else {
        "Task unstarred"
    };
    let mut human = HumanOutput::new(header);
    human.push_detail(describe(&task));
    emit_success(options.context.output, "star", &task, Some(&human))
}

#[derive(Serialize)]
struct RemoveData {
    id: String,
    removed: bool,
}

pub fn remove(options: ToggleOptions) -> Result<()> {
    let (mut store, _config) = options.context.open_store()?;
    store.delete(&options.id)?;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("id", &options.id);
    let data = RemoveData {
        id: options.id,
        removed: true,
    };
    emit_success(options.context.output, "rm", &data, Some(&human))
}

pub fn counts(context: Context) -> Result<()> {
    let (store, _config) = context.open_store()?;
    let counts = TaskCounts::tally(store.tasks(), date::today());

    let mut human = HumanOutput::new("Task counts");
    human.push_summary("total", counts.total.to_string());
    human.push_summary("pending", counts.pending.to_string());
    human.push_summary("completed", counts.completed.to_string());
    human.push_summary("today", counts.today.to_string());
    human.push_summary("upcoming", counts.upcoming.to_string());
    human.push_summary("overdue", counts.overdue.to_string());
    human.push_summary("important", counts.important.to_string());

    emit_success(context.output, "counts", &counts, Some(&human))
}

#[derive(Serialize)]
struct ListTally {
    list: String,
    total: usize,
    pending: usize,
}

pub fn lists(context: Context) -> Result<()> {
    let (store, config) = context.open_store()?;

    // Known lists first, then any custom labels found on tasks
    let mut names: Vec<String> = config.lists.known.clone();
    for task in store.tasks() {
        if !names.contains(&task.list) {
            names.push(task.list.clone());
        }
    }

    let tallies: Vec<ListTally> = names
        .into_iter()
        .map(|list| {
            let total = store.tasks().iter().filter(|t| t.list == list).count();
            let pending = store
                .tasks()
                .iter()
                .filter(|t| t.list == list && !t.completed)
                .count();
            ListTally {
                list,
                total,
                pending,
            }
        })
        .collect();

    let mut human = HumanOutput::new("Lists");
    for tally in &tallies {
        human.push_summary(
            &tally.list,
            format!("{} task(s), {} pending", tally.total, tally.pending),
        );
    }
    emit_success(context.output, "lists", &tallies, Some(&human))
}

fn describe(task: &Task) -> String {
    let mut parts = vec![format!(
        "[{}] {}",
        if task.completed { "x" } else { " " },
        task.description
    )];
    parts.push(format!("({})", task.list));
    if task.has_due_date() {
        parts.push(format!("due {}", task.due_date));
    }
    if task.priority != Priority::Low {
        parts.push(task.priority.to_string());
    }
    if task.importance {
        parts.push("*".to_string());
    }
    parts.push(format!("id={}", task.id));
    parts.join(" ")
}
