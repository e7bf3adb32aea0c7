//! studyplan calendar command implementation.

use serde::Serialize;

use crate::calendar::{Calendar, DayCell, DaySchedule, MonthGrid, View};
use crate::cli::Context;
use crate::date;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub struct CalOptions {
    pub view: String,
    pub date: Option<String>,
    pub select: Option<String>,
    pub context: Context,
}

#[derive(Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
enum CalData {
    Month {
        pivot: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<String>,
        grid: MonthGrid,
    },
    Week {
        pivot: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<String>,
        days: Vec<DayCell>,
    },
    Day {
        pivot: String,
        schedule: DaySchedule,
    },
}

pub fn render(options: CalOptions) -> Result<()> {
    let view: View = options.view.parse()?;
    let today = date::today();
    let pivot = match options.date.as_deref() {
        Some(value) => date::parse_date(value)?,
        None => today,
    };

    let (store, config) = options.context.open_store()?;

    let mut calendar = Calendar::new(pivot);
    calendar.set_view(view);
    let selected = options
        .select
        .as_deref()
        .map(date::parse_date)
        .transpose()?
        .map(|day| calendar.select_date(day));

    let (data, human) = match view {
        View::Month => {
            let grid = calendar.month_grid(store.tasks(), today);
            let human = render_month(&grid, &calendar);
            (
                CalData::Month {
                    pivot: date::format_date(pivot),
                    selected,
                    grid,
                },
                human,
            )
        }
        View::Week => {
            let days = calendar.week_row(store.tasks(), today);
            let human = render_week(&days);
            (
                CalData::Week {
                    pivot: date::format_date(pivot),
                    selected,
                    days,
                },
                human,
            )
        }
        View::Day => {
            let schedule =
                calendar.day_schedule_with(store.tasks(), today, config.calendar.business_hours());
            let human = render_day(&schedule);
            (
                CalData::Day {
                    pivot: date::format_date(pivot),
                    schedule,
                },
                human,
            )
        }
    };

    emit_success(options.context.output, "cal", &data, Some(&human))
}

fn render_month(grid: &MonthGrid, calendar: &Calendar) -> HumanOutput {
    let mut human = HumanOutput::new(format!("{} {} (month view)", grid.month_name, grid.year));
    human.push_detail(" Sun    Mon    Tue    Wed    Thu    Fri    Sat");

    for week in grid.cells.chunks(7) {
        let row: String = week.iter().map(format_month_cell).collect();
        human.push_detail(row.trim_end().to_string());
    }
    if let Some(selected) = calendar.selected() {
        human.push_detail(format!("selected: {}", date::format_date(selected)));
    }
    human
}

// Cells render as "15*[2]": day number, today marker, task count
fn format_month_cell(cell: &DayCell) -> String {
    use chrono::Datelike;

    let mut text = format!("{:>2}", cell.date.day());
    if cell.is_today {
        text.push('*');
    } else if cell.is_selected {
        text.push('+');
    }
    if !cell.tasks.is_empty() {
        text.push_str(&format!("[{}]", cell.tasks.len()));
    }
    format!("{text:<7}")
}

fn render_week(days: &[DayCell]) -> HumanOutput {
    let first = days.first().map(|c| date::format_date(c.date)).unwrap_or_default();
    let last = days.last().map(|c| date::format_date(c.date)).unwrap_or_default();
    let mut human = HumanOutput::new(format!("Week of {first} to {last}"));

    for cell in days {
        let marker = if cell.is_today { " (today)" } else { "" };
        human.push_detail(format!(
            "{}{marker}: {} task(s)",
            date::format_date(cell.date),
            cell.tasks.len()
        ));
        for task in &cell.tasks {
            let state = if task.completed { "x" } else { " " };
            human.push_detail(format!("  [{state}] {} ({})", task.description, task.list));
        }
    }
    human
}

fn render_day(schedule: &DaySchedule) -> HumanOutput {
    let marker = if schedule.is_today { " (today)" } else { "" };
    let mut human = HumanOutput::new(format!(
        "{}{marker} (day view)",
        date::format_date(schedule.date)
    ));

    for slot in &schedule.hours {
        if slot.tasks.is_empty() {
            human.push_detail(format!("{}  -", slot.label_24));
        } else {
            for task in &slot.tasks {
                let state = if task.completed { "x" } else { " " };
                human.push_detail(format!(
                    "{}  [{state}] {} ({})",
                    slot.label_24, task.description, task.list
                ));
            }
        }
    }
    human
}
