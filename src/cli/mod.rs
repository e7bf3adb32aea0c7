//! Command-line interface for studyplan
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, calendar commands in `cal`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::backend::JsonBackend;
use crate::config::{self, Config};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::store::TaskStore;

mod cal;
mod task;

/// studyplan - study planner task and calendar CLI
///
/// Tasks live in per-user JSON documents under the data directory and are
/// viewed through filters, counts and a month/week/day calendar.
#[derive(Parser, Debug)]
#[command(name = "studyplan")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform per-user data dir)
    #[arg(long, global = true, env = "STUDYPLAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// User whose tasks to operate on
    #[arg(long, global = true, env = "STUDYPLAN_USER")]
    pub user: Option<String>,

    /// Config file (defaults to studyplan.toml in the data directory)
    #[arg(long, global = true, env = "STUDYPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task description
        description: String,

        /// List label (Personal, Work, Study or any custom label)
        #[arg(long)]
        list: Option<String>,

        /// Due date in YYYY-MM-DD (local time)
        #[arg(long)]
        due: Option<String>,

        /// Free-text sub-tasks / notes
        #[arg(long)]
        notes: Option<String>,

        /// Priority: low, medium or high
        #[arg(long, default_value = "low")]
        priority: String,
    },

    /// List tasks matching a filter
    List {
        /// Filter: all, today, upcoming, overdue, completed, important,
        /// or a list name
        #[arg(default_value = "all")]
        filter: String,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        list: Option<String>,

        /// Due date in YYYY-MM-DD; pass an empty string to clear
        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Priority: low, medium or high
        #[arg(long)]
        priority: Option<String>,
    },

    /// Toggle a task's completed flag
    Done {
        /// Task id
        id: String,
    },

    /// Toggle a task's starred (importance) flag
    Star {
        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Show sidebar counts (total, pending, today, upcoming, overdue, ...)
    Counts,

    /// Show known lists with their task tallies
    Lists,

    /// Render the calendar
    Cal {
        /// View mode: month, week or day
        #[arg(long, default_value = "month")]
        view: String,

        /// Pivot date in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Highlight a selected date and echo it as a due-date string
        #[arg(long)]
        select: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        let context = Context {
            data_dir: self.data_dir,
            user: self.user,
            config_path: self.config,
            output,
        };

        match self.command {
            Commands::Add {
                description,
                list,
                due,
                notes,
                priority,
            } => task::add(task::AddOptions {
                description,
                list,
                due,
                notes,
                priority,
                context,
            }),
            Commands::List { filter } => task::list(task::ListOptions { filter, context }),
            Commands::Edit {
                id,
                description,
                list,
                due,
                notes,
                priority,
            } => task::edit(task::EditOptions {
                id,
                description,
                list,
                due,
                notes,
                priority,
                context,
            }),
            Commands::Done { id } => task::done(task::ToggleOptions { id, context }),
            Commands::Star { id } => task::star(task::ToggleOptions { id, context }),
            Commands::Rm { id } => task::remove(task::ToggleOptions { id, context }),
            Commands::Counts => task::counts(context),
            Commands::Lists => task::lists(context),
            Commands::Cal { view, date, select } => cal::render(cal::CalOptions {
                view,
                date,
                select,
                context,
            }),
        }
    }
}

/// Shared per-invocation context: where the data lives, who the user is,
/// how to emit output.
pub struct Context {
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub config_path: Option<PathBuf>,
    pub output: OutputOptions,
}

impl Context {
    /// Resolve config and open a loaded task store for the current user.
    pub fn open_store(&self) -> Result<(TaskStore, Config)> {
        let data_dir = config::resolve_data_dir(self.data_dir.as_deref())?;
        let config = match &self.config_path {
            Some(path) => Config::load_file(path)?,
            None => Config::load(&data_dir)?,
        };

        let user = self
            .user
            .clone()
            .or_else(|| config.user.default.clone());

        let backend = JsonBackend::new(&data_dir);
        let mut store = TaskStore::new(Box::new(backend), user);
        store.load()?;
        Ok((store, config))
    }
}
