//! studyplan - task and calendar planning core
//!
//! This library provides the core of a study-productivity planner: a task
//! store synchronized with a pluggable per-user persistence backend, pure
//! filtering and derived counts, and a month/week/day calendar coordinator.
//!
//! # Core Concepts
//!
//! - **Tasks**: user-owned to-do items with description, list, due date,
//!   priority, completion and importance flags
//! - **Filters**: named predicates (all/today/upcoming/overdue/completed/
//!   important/list-name) selecting task subsets for display
//! - **Calendar**: a pivot date + view mode producing annotated layout
//!   cells for month, week and day views
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `studyplan.toml`
//! - `error`: error types and result aliases
//! - `task`: the task entity and its create/update payloads
//! - `date`: local-date parsing, formatting and calendar math
//! - `filter`: pure filtering and derived counts
//! - `backend`: persistence backend contract and implementations
//! - `store`: the task store owning the in-memory collection
//! - `calendar`: the calendar/view coordinator
//! - `lock`: file locking and atomic writes for the JSON backend
//! - `output`: shared human/JSON output formatting

pub mod backend;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod filter;
pub mod lock;
pub mod output;
pub mod store;
pub mod task;

pub use error::{Error, Result};
