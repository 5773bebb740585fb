//! The task board: the local mirror of the task store, and everything a user can do with it
//!
//! Updates are pessimistic: the local task list only changes once the store has accepted a change.
//! When a store call fails, the failure is reported (see [`feedback`](crate::feedback)) and the board is left exactly as it was.

use chrono::{Local, NaiveDateTime};

use crate::config::DEFAULT_DRAFT_TIME;
use crate::error::StoreError;
use crate::feedback::{BoardEvent, FeedbackSender, Reporter};
use crate::task::{Deadline, NewTask, Task, TaskId};
use crate::traits::TaskGateway;
use crate::views;

/// A change the store has confirmed, that still has to be applied to the local task list.
///
/// The board builds these itself after each successful call. Front ends that run store calls on their own
/// (e.g. concurrently) can feed them to [`TaskBoard::apply`] in the order the responses arrive.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// The whole list, as returned by the store
    Loaded(Vec<Task>),
    Added(Task),
    CompletionSet{ id: TaskId, completed: bool },
    Removed(TaskId),
    /// Every task of this date has been removed
    RemovedDay(String),
}

/// A pending "delete the whole day" request, waiting for the user to confirm.
///
/// Dropping it (or calling [`DayDeletion::cancel`]) cancels the request without touching anything.
#[derive(Clone, Debug, PartialEq)]
#[must_use = "a day deletion does nothing until it is confirmed"]
pub struct DayDeletion {
    date: String,
    ids: Vec<TaskId>,
}

impl DayDeletion {
    pub fn date(&self) -> &str { &self.date }
    pub fn ids(&self) -> &[TaskId] { &self.ids }
    pub fn count(&self) -> usize { self.ids.len() }

    /// The question to ask the user before going on
    pub fn prompt(&self) -> String {
        format!("Delete all {} tasks of {}?", self.count(), views::localized_date(&self.date))
    }

    pub fn cancel(self) {
        log::debug!("Deletion of {} cancelled", self.date);
    }
}

/// See the [module-level documentation](self)
pub struct TaskBoard<G: TaskGateway> {
    gateway: G,
    tasks: Vec<Task>,
    selected_date: String,
    draft_text: String,
    draft_time: String,
    reporter: Reporter,
}

/// Today's local date, as `YYYY-MM-DD`
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The current local time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<G: TaskGateway> TaskBoard<G> {
    /// Create an empty board, showing today. Call [`Self::load`] to fetch the tasks
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            tasks: Vec::new(),
            selected_date: today(),
            draft_text: String::new(),
            draft_time: DEFAULT_DRAFT_TIME.to_string(),
            reporter: Reporter::new(),
        }
    }

    /// Also publish what happens on a feedback channel
    pub fn with_feedback(mut self, sender: FeedbackSender) -> Self {
        self.reporter = Reporter::new_with_feedback_channel(sender);
        self
    }

    pub fn tasks(&self) -> &[Task]              { &self.tasks           }
    pub fn selected_date(&self) -> &str         { &self.selected_date   }
    pub fn draft_text(&self) -> &str            { &self.draft_text      }
    pub fn draft_time(&self) -> &str            { &self.draft_time      }
    /// How many store calls have failed since this board was created.
    /// Operations refused before calling the store (e.g. on an unknown task) are not counted
    pub fn n_failures(&self) -> u32             { self.reporter.n_failures() }

    pub fn set_draft_text<S: Into<String>>(&mut self, text: S) {
        self.draft_text = text.into();
    }
    pub fn set_draft_time<S: Into<String>>(&mut self, time: S) {
        self.draft_time = time.into();
    }

    /// Show another day. Whatever the date picker produced is accepted
    pub fn select_date<S: Into<String>>(&mut self, date: S) {
        self.selected_date = date.into();
    }

    /// Show the `index`-th active date. Returns false if there is no such date
    pub fn jump_to(&mut self, index: usize) -> bool {
        match self.active_dates().into_iter().nth(index) {
            None => false,
            Some(date) => {
                self.selected_date = date;
                true
            }
        }
    }


    //
    // Derived views
    //

    pub fn active_dates(&self) -> Vec<String> {
        views::active_dates(&self.tasks)
    }

    pub fn unfinished_count(&self, date: &str) -> usize {
        views::unfinished_count(&self.tasks, date)
    }

    /// The tasks of the selected date
    pub fn visible_tasks(&self) -> Vec<&Task> {
        views::visible_tasks(&self.tasks, &self.selected_date)
    }

    /// Whether this task is late right now
    pub fn is_overdue(&self, task: &Task) -> bool {
        views::is_overdue(task.due(), task.completed(), now())
    }

    fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }


    //
    // Operations
    //

    /// Replace the local list with what the store currently has
    pub async fn load(&mut self) -> Result<usize, StoreError> {
        match self.gateway.list_all().await {
            Err(err) => {
                self.reporter.failure("load tasks", err.message());
                Err(err)
            },
            Ok(tasks) => {
                let count = tasks.len();
                self.apply(Mutation::Loaded(tasks));
                self.reporter.success(BoardEvent::Loaded{ count });
                Ok(count)
            }
        }
    }

    /// Create a task from the draft fields, on the selected date.
    ///
    /// Returns `Ok(None)` without calling the store when the draft text is blank.
    /// On success, the draft text is cleared but the draft time and the selected date are kept.
    pub async fn add_task(&mut self) -> Result<Option<TaskId>, StoreError> {
        let text = self.draft_text.trim();
        if text.is_empty() {
            log::debug!("Not adding a task with an empty text");
            return Ok(None);
        }

        let deadline = Deadline::from_parts(&self.selected_date, &self.draft_time);
        let new_task = NewTask::new(text, deadline);
        match self.gateway.insert(new_task).await {
            Err(err) => {
                self.reporter.failure("add a task", err.message());
                Err(err)
            },
            Ok(created) => {
                let id = created.id().clone();
                self.apply(Mutation::Added(created));
                self.draft_text.clear();
                self.reporter.success(BoardEvent::Added{ id: id.clone() });
                Ok(Some(id))
            }
        }
    }

    /// Flip the completion status of a task. Returns its new status
    pub async fn toggle(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let completed = match self.find(id).map(|task| task.completed()) {
            None => return Err(self.unknown_task("toggle a task", id)),
            Some(current) => current == false,
        };

        match self.gateway.set_completed(id, completed).await {
            Err(err) => {
                self.reporter.failure("toggle a task", err.message());
                Err(err)
            },
            Ok(()) => {
                self.apply(Mutation::CompletionSet{ id: id.clone(), completed });
                self.reporter.success(BoardEvent::Toggled{ id: id.clone(), completed });
                Ok(completed)
            }
        }
    }

    /// Delete a single task
    pub async fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        if self.find(id).is_none() {
            return Err(self.unknown_task("delete a task", id));
        }

        match self.gateway.delete_by_id(id).await {
            Err(err) => {
                self.reporter.failure("delete a task", err.message());
                Err(err)
            },
            Ok(()) => {
                self.apply(Mutation::Removed(id.clone()));
                self.reporter.success(BoardEvent::Deleted{ id: id.clone() });
                Ok(())
            }
        }
    }

    /// First step of deleting every task of the selected date.
    ///
    /// Returns `None` when there is nothing to delete. Otherwise, ask the user with [`DayDeletion::prompt`],
    /// then either [`Self::confirm_day_deletion`] or cancel.
    pub fn request_day_deletion(&self) -> Option<DayDeletion> {
        let ids: Vec<TaskId> = self.visible_tasks().iter()
            .map(|t| t.id().clone())
            .collect();
        if ids.is_empty() {
            return None;
        }
        Some(DayDeletion { date: self.selected_date.clone(), ids })
    }

    /// Second step of deleting a day: delete every listed task in a single store call.
    /// Returns how many tasks were deleted
    pub async fn confirm_day_deletion(&mut self, deletion: DayDeletion) -> Result<usize, StoreError> {
        match self.gateway.delete_by_ids(&deletion.ids).await {
            Err(err) => {
                self.reporter.failure("delete a day", err.message());
                Err(err)
            },
            Ok(()) => {
                let count = deletion.count();
                self.apply(Mutation::RemovedDay(deletion.date.clone()));
                self.reporter.success(BoardEvent::DayDeleted{ date: deletion.date, count });
                Ok(count)
            }
        }
    }

    fn unknown_task(&self, action: &str, id: &TaskId) -> StoreError {
        let err = StoreError::new(format!("No task with id {}", id));
        self.reporter.rejection(action, err.message());
        err
    }

    /// Apply a change the store has confirmed to the local list.
    ///
    /// Changes about tasks that are not (or no longer) here are ignored. Returns whether something changed
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::Loaded(tasks) => {
                self.tasks = tasks;
                true
            },
            Mutation::Added(task) => {
                if self.find(task.id()).is_some() {
                    log::warn!("Task {} is already known, not adding it twice", task.id());
                    return false;
                }
                self.tasks.push(task);
                true
            },
            Mutation::CompletionSet{ id, completed } => {
                match self.tasks.iter_mut().find(|t| t.id() == &id) {
                    None => {
                        log::debug!("Task {} is gone, ignoring its completion change", id);
                        false
                    },
                    Some(task) => {
                        task.set_completed(completed);
                        true
                    }
                }
            },
            Mutation::Removed(id) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id() != &id);
                before != self.tasks.len()
            },
            Mutation::RemovedDay(date) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.date() != date);
                before != self.tasks.len()
            },
        }
    }
}
