//! Utilities to report what the board did, including the failures that are not shown in the main view

use std::fmt::{Display, Error, Formatter};

use crate::task::TaskId;

/// Something that happened to the board
#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    /// Nothing has happened yet
    Idle,
    /// The task list has been (re)loaded
    Loaded{ count: usize },
    Added{ id: TaskId },
    Toggled{ id: TaskId, completed: bool },
    Deleted{ id: TaskId },
    DayDeleted{ date: String, count: usize },
    /// A store call failed. Local state has been left untouched
    Failed{ action: String, message: String },
}

impl Display for BoardEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            BoardEvent::Idle => write!(f, "Idle"),
            BoardEvent::Loaded{count} => write!(f, "Loaded {} tasks", count),
            BoardEvent::Added{id} => write!(f, "Added task {}", id),
            BoardEvent::Toggled{id, completed} => match completed {
                true => write!(f, "Task {} done", id),
                false => write!(f, "Task {} not done", id),
            },
            BoardEvent::Deleted{id} => write!(f, "Deleted task {}", id),
            BoardEvent::DayDeleted{date, count} => write!(f, "Deleted {} tasks of {}", count, date),
            BoardEvent::Failed{action, message} => write!(f, "Unable to {}: {}", action, message),
        }
    }
}

impl Default for BoardEvent {
    fn default() -> Self {
        Self::Idle
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<BoardEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<BoardEvent>;

/// Create a feeback channel, that can be used to retrieve the latest thing the board did
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(BoardEvent::default())
}



/// Logs board events, and forwards them to a feedback channel if there is one
#[derive(Debug, Default)]
pub struct Reporter {
    n_failures: u32,
    feedback_channel: Option<FeedbackSender>,
}

impl Reporter {
    pub fn new() -> Self {
        Self { n_failures: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_failures: 0, feedback_channel: Some(channel) }
    }

    /// How many store calls have failed so far
    pub fn n_failures(&self) -> u32 {
        self.n_failures
    }

    /// Report a successful operation
    pub fn success(&self, event: BoardEvent) {
        log::info!("{}", event);
        self.feedback(event);
    }

    /// Report a failed store call
    pub fn failure(&mut self, action: &str, message: &str) {
        self.n_failures += 1;
        let event = BoardEvent::Failed{ action: action.to_string(), message: message.to_string() };
        log::warn!("{}", event);
        self.feedback(event);
    }

    /// Report an operation refused before reaching the store. It is shown like a failure, but not counted as one
    pub fn rejection(&self, action: &str, message: &str) {
        let event = BoardEvent::Failed{ action: action.to_string(), message: message.to_string() };
        log::warn!("{}", event);
        self.feedback(event);
    }

    fn feedback(&self, event: BoardEvent) {
        if let Some(sender) = self.feedback_channel.as_ref() {
            if let Err(err) = sender.send(event) {
                log::debug!("Nobody listens to board feedback anymore ({})", err);
            }
        }
    }
}
