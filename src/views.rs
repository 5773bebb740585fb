//! Values derived from the task list.
//!
//! These are recomputed on every call, nothing is cached.

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::task::{Deadline, Task};

/// Every distinct date that has at least one task, sorted ascending.
///
/// Dates are `YYYY-MM-DD` strings, so the lexicographic order is the chronological one.
/// Tasks without a deadline belong to no date.
pub fn active_dates(tasks: &[Task]) -> Vec<String> {
    tasks.iter()
        .map(|task| task.date())
        .filter(|date| date.is_empty() == false)
        .unique()
        .sorted()
        .map(String::from)
        .collect()
}

/// How many tasks of `date` are not completed yet
pub fn unfinished_count(tasks: &[Task], date: &str) -> usize {
    tasks.iter()
        .filter(|task| task.date() == date && task.completed() == false)
        .count()
}

/// Whether a task is late at `now`.
///
/// A deadline that is missing or cannot be parsed never makes a task overdue.
pub fn is_overdue(deadline: Option<&Deadline>, completed: bool, now: NaiveDateTime) -> bool {
    if completed {
        return false;
    }
    match deadline.and_then(|d| d.to_naive()) {
        None => false,
        Some(due) => due < now,
    }
}

/// Show a `YYYY-MM-DD` date as `DD/MM/YYYY`, or as-is if it is not a valid date
pub fn localized_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// The tasks of `date`, in the same order as in `tasks`
pub fn visible_tasks<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks.iter()
        .filter(|task| task.date() == date)
        .collect()
}
