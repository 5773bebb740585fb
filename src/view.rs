//! What the single screen of the board shows, independently of how it is drawn

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::board::TaskBoard;
use crate::task::TaskId;
use crate::traits::TaskGateway;
use crate::views;

/// How far (in pixels) a row has to be dragged sideways before releasing it deletes the task
pub const SWIPE_DELETE_THRESHOLD: f32 = 100.0;

/// A quick-jump button to one of the dates that have tasks
#[derive(Clone, Debug, PartialEq)]
pub struct DayChip {
    pub date: String,
    /// `today`, or the localized date
    pub label: String,
    pub unfinished: usize,
    /// A past day that still has unfinished tasks
    pub overdue: bool,
    pub selected: bool,
}

/// One task of the selected day
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub time: String,
    pub completed: bool,
    pub overdue: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardView {
    pub chips: Vec<DayChip>,
    pub selected_date: String,
    pub show_delete_day: bool,
    pub draft_text: String,
    pub draft_time: String,
    pub submit_label: String,
    pub rows: Vec<TaskRow>,
    /// Nothing is planned for the selected day
    pub empty: bool,
}

fn day_label(date: &str, today: &str) -> String {
    if date == today {
        "today".to_string()
    } else {
        views::localized_date(date)
    }
}

impl BoardView {
    /// Snapshot what `board` should look like, `today` being the current `YYYY-MM-DD` date and `now` the current time
    pub fn build<G: TaskGateway>(board: &TaskBoard<G>, today: &str, now: NaiveDateTime) -> Self {
        let selected = board.selected_date();

        let chips = board.active_dates().into_iter()
            .map(|date| {
                let unfinished = board.unfinished_count(&date);
                DayChip {
                    label: day_label(&date, today),
                    overdue: unfinished > 0 && date.as_str() < today,
                    selected: date == selected,
                    unfinished,
                    date,
                }
            })
            .collect();

        let rows: Vec<TaskRow> = board.visible_tasks().into_iter()
            .map(|task| TaskRow {
                id: task.id().clone(),
                text: task.text().to_string(),
                time: task.deadline().time_part().to_string(),
                completed: task.completed(),
                overdue: views::is_overdue(task.due(), task.completed(), now),
            })
            .collect();

        let submit_label = match day_label(selected, today).as_str() {
            "today" => "Add to today".to_string(),
            other => format!("Add to {}", other),
        };

        Self {
            chips,
            selected_date: selected.to_string(),
            show_delete_day: rows.is_empty() == false,
            draft_text: board.draft_text().to_string(),
            draft_time: board.draft_time().to_string(),
            submit_label,
            empty: rows.is_empty(),
            rows,
        }
    }
}

/// Draw a view as plain text, one element per line.
///
/// Chips and rows are numbered from 1, so that a terminal user can refer to them.
pub fn render_text(view: &BoardView) -> String {
    let mut out = String::new();

    if view.chips.is_empty() == false {
        let chips: Vec<String> = view.chips.iter().enumerate()
            .map(|(i, chip)| {
                let mut s = format!("{}:{}", i + 1, chip.label);
                if chip.unfinished > 0 {
                    let _ = write!(s, " ({})", chip.unfinished);
                }
                if chip.overdue {
                    s.push('!');
                }
                if chip.selected {
                    format!("[{}]", s)
                } else {
                    format!(" {} ", s)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", chips.join(" "));
    }

    let _ = writeln!(out, "Date: {}", view.selected_date);

    if view.empty {
        let _ = writeln!(out, "  Nothing planned for this day");
    }
    for (i, row) in view.rows.iter().enumerate() {
        let check = if row.completed { "x" } else { " " };
        let late = if row.overdue { "  (overdue)" } else { "" };
        let _ = writeln!(out, "  {:>2}. [{}] {:<5}  {}{}", i + 1, check, row.time, row.text, late);
    }

    let _ = writeln!(out, "{} at {}: {}", view.submit_label, view.draft_time, view.draft_text);
    if view.show_delete_day {
        let _ = writeln!(out, "(clear: delete this day)");
    }
    out
}



/// What happens when a dragged row is released
#[derive(Clone, Debug, PartialEq)]
pub enum SwipeOutcome {
    /// The row goes back to its place
    SnapBack,
    /// The drag went far enough: delete this task
    Delete(TaskId),
}

/// Tracks a sideways drag on a task row
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    id: TaskId,
    start_x: f32,
    offset: f32,
}

impl SwipeTracker {
    pub fn start(id: TaskId, x: f32) -> Self {
        Self { id, start_x: x, offset: 0.0 }
    }

    /// The pointer moved. Returns how far the row should be displayed from its place
    pub fn move_to(&mut self, x: f32) -> f32 {
        self.offset = x - self.start_x;
        self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn release(self) -> SwipeOutcome {
        if self.offset.abs() > SWIPE_DELETE_THRESHOLD {
            SwipeOutcome::Delete(self.id)
        } else {
            SwipeOutcome::SnapBack
        }
    }
}
