//! Calendar/View coordinator.
//!
//! A state machine over two independent axes: the pivot date and the view
//! mode (month/week/day). Layouts are computed purely from the in-memory
//! task collection; no I/O happens here, and an empty collection simply
//! yields zero-task cells.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::date::{self, MonthData, BUSINESS_HOURS};
use crate::error::Error;
use crate::filter;
use crate::task::Task;

/// Calendar layout granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Month,
    Week,
    Day,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Month => "month",
            View::Week => "week",
            View::Day => "day",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(View::Month),
            "week" => Ok(View::Week),
            "day" => Ok(View::Day),
            other => Err(Error::InvalidArgument(format!(
                "unknown view '{other}' (expected month, week or day)"
            ))),
        }
    }
}

/// Status classification of a calendar cell, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Overdue,
    Pending,
    Completed,
    None,
}

/// One calendar cell with its derived annotations
#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub status: DayStatus,
    pub tasks: Vec<Task>,
}

/// The month layout: a uniform 6x7 grid including leading/trailing days
/// from adjacent months.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month_name: &'static str,
    pub cells: Vec<DayCell>,
}

/// One hour row of the day view
#[derive(Debug, Clone, Serialize)]
pub struct HourSlot {
    pub hour: u32,
    pub label_12: String,
    pub label_24: String,
    pub tasks: Vec<Task>,
}

/// The day layout: the pivot date's tasks spread across business hours.
#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_today: bool,
    pub hours: Vec<HourSlot>,
}

/// Calendar state: pivot date + view mode + optional selection.
#[derive(Debug, Clone)]
pub struct Calendar {
    current: NaiveDate,
    view: View,
    selected: Option<NaiveDate>,
}

impl Calendar {
    pub fn new(pivot: NaiveDate) -> Self {
        Self {
            current: pivot,
            view: View::default(),
            selected: None,
        }
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Move the pivot back by one unit of the current view
    pub fn previous(&mut self) {
        self.current = match self.view {
            View::Month => date::add_months(self.current, -1),
            View::Week => self.current - Days::new(7),
            View::Day => self.current - Days::new(1),
        };
    }

    /// Move the pivot forward by one unit of the current view
    pub fn next(&mut self) {
        self.current = match self.view {
            View::Month => date::add_months(self.current, 1),
            View::Week => self.current + Days::new(7),
            View::Day => self.current + Days::new(1),
        };
    }

    /// Reset the pivot to today, independent of the view
    pub fn today(&mut self, today: NaiveDate) {
        self.current = today;
    }

    /// Change the view; the pivot is left alone
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Record a date selection and hand back its due-date string, used by
    /// hosts to pre-fill a new task's due date or scope the day view.
    pub fn select_date(&mut self, day: NaiveDate) -> String {
        self.selected = Some(day);
        date::format_date(day)
    }

    /// Month layout for the pivot's month: always 42 annotated cells.
    pub fn month_grid(&self, tasks: &[Task], today: NaiveDate) -> MonthGrid {
        let data = MonthData::containing(self.current);
        let cells = data
            .days
            .iter()
            .map(|&day| self.cell(tasks, day, day.month() == self.current.month(), today))
            .collect();

        MonthGrid {
            year: data.year,
            month_name: data.month_name,
            cells,
        }
    }

    /// Week layout: 7 annotated cells from the Sunday on/before the pivot.
    pub fn week_row(&self, tasks: &[Task], today: NaiveDate) -> Vec<DayCell> {
        date::week_days(self.current)
            .into_iter()
            .map(|day| self.cell(tasks, day, true, today))
            .collect()
    }

    /// Day layout: the pivot's tasks distributed evenly across business
    /// hours (9:00-17:00 by default). Tasks carry no time of day, so this
    /// is a display heuristic, not a schedule.
    pub fn day_schedule(&self, tasks: &[Task], today: NaiveDate) -> DaySchedule {
        self.day_schedule_with(tasks, today, BUSINESS_HOURS)
    }

    /// Day layout over an explicit business-hours window.
    pub fn day_schedule_with(
        &self,
        tasks: &[Task],
        today: NaiveDate,
        hours: RangeInclusive<u32>,
    ) -> DaySchedule {
        let day_tasks = filter::tasks_for_date(tasks, self.current);
        let slots: Vec<u32> = hours.collect();
        let per_slot = day_tasks.len().div_ceil(slots.len());

        let hours = slots
            .iter()
            .enumerate()
            .map(|(index, &hour)| {
                let bucket = if per_slot == 0 {
                    Vec::new()
                } else {
                    day_tasks
                        .iter()
                        .skip(index * per_slot)
                        .take(per_slot)
                        .map(|&task| task.clone())
                        .collect()
                };
                HourSlot {
                    hour,
                    label_12: date::hour_label_12(hour),
                    label_24: date::hour_label_24(hour),
                    tasks: bucket,
                }
            })
            .collect();

        DaySchedule {
            date: self.current,
            is_today: self.current == today,
            hours,
        }
    }

    fn cell(
        &self,
        tasks: &[Task],
        day: NaiveDate,
        in_current_month: bool,
        today: NaiveDate,
    ) -> DayCell {
        let day_tasks: Vec<Task> = filter::tasks_for_date(tasks, day)
            .into_iter()
            .cloned()
            .collect();

        DayCell {
            date: day,
            in_current_month,
            is_today: day == today,
            is_selected: self.selected == Some(day),
            status: day_status(&day_tasks, today),
            tasks: day_tasks,
        }
    }
}

/// Classify a cell from its tasks: overdue wins over pending, pending over
/// completed, and a taskless cell is `None`.
fn day_status(day_tasks: &[Task], today: NaiveDate) -> DayStatus {
    let has_overdue = day_tasks
        .iter()
        .any(|task| !task.completed && date::is_past(&task.due_date, today));
    let has_pending = day_tasks.iter().any(|task| !task.completed);
    let has_completed = day_tasks.iter().any(|task| task.completed);

    if has_overdue {
        DayStatus::Overdue
    } else if has_pending {
        DayStatus::Pending
    } else if has_completed {
        DayStatus::Completed
    } else {
        DayStatus::None
    }
}
