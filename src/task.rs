//! To-do tasks, as stored in the `tasks` collection

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Formats accepted for a deadline. Stores may append seconds to what we sent.
const DEADLINE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// The identifier assigned by the store when a task is created.
///
/// It is opaque to this crate: stores may send it as a JSON string or as a JSON integer, it is kept as a string either way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self { content: n.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}

struct TaskIdVisitor;

impl<'de> Visitor<'de> for TaskIdVisitor {
    type Value = TaskId;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a string or an integer task id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
        Ok(TaskId::from(v))
    }
    fn visit_string<E: de::Error>(self, v: String) -> Result<TaskId, E> {
        Ok(TaskId::from(v))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
        Ok(TaskId::from(v))
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
        Ok(TaskId::from(v.to_string()))
    }
}

/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TaskIdVisitor)
    }
}



/// A combined date and time of day, such as `2024-06-01T23:59`.
///
/// The date portion is the key tasks are grouped by. The time portion is only displayed.
///
/// Rows stored without a deadline get an empty one, see [`Task::due`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline {
    content: String,
}

impl Deadline {
    /// Build a deadline from a date (`YYYY-MM-DD`) and a time of day (`HH:MM`)
    pub fn from_parts(date: &str, time: &str) -> Self {
        Self { content: format!("{}T{}", date, time) }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// The calendar-date portion, i.e. everything before the `T`
    pub fn date_part(&self) -> &str {
        match self.content.split_once('T') {
            Some((date, _)) => date,
            None => &self.content,
        }
    }

    /// The time-of-day portion (`HH:MM`), or an empty string if there is none
    pub fn time_part(&self) -> &str {
        match self.content.split_once('T') {
            Some((_, time)) => time.get(..5).unwrap_or(time),
            None => "",
        }
    }

    /// Parse this deadline, or `None` if it is not a valid date and time
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        DEADLINE_FORMATS.iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&self.content, fmt).ok())
    }

    /// Parse the date portion, or `None` if it is not a valid date
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_part(), "%Y-%m-%d").ok()
    }
}

/// `null` and missing deadlines both become an empty one
fn deadline_or_empty<'de, D>(deserializer: D) -> Result<Deadline, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Deadline>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&str> for Deadline {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<String> for Deadline {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl Display for Deadline {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// A task that has not been sent to the store yet. The store will assign its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    pub deadline: Deadline,
    pub completed: bool,
}

impl NewTask {
    /// A new, uncompleted task
    pub fn new<S: Into<String>>(text: S, deadline: Deadline) -> Self {
        Self { text: text.into(), deadline, completed: false }
    }

    /// Attach the id the store has assigned
    pub fn into_task(self, id: TaskId) -> Task {
        Task::new_with_parameters(id, self.text, self.deadline, self.completed)
    }
}

/// A to-do task, as persisted by the store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the store, never changes
    id: TaskId,
    /// What has to be done
    text: String,
    /// When it has to be done
    #[serde(default, deserialize_with = "deadline_or_empty")]
    deadline: Deadline,
    /// Whether it is done
    #[serde(default)]
    completed: bool,
}

impl Task {
    pub fn new_with_parameters(id: TaskId, text: String, deadline: Deadline, completed: bool) -> Self {
        Self { id, text, deadline, completed }
    }

    pub fn id(&self) -> &TaskId             { &self.id           }
    pub fn text(&self) -> &str              { &self.text         }
    pub fn deadline(&self) -> &Deadline     { &self.deadline     }
    pub fn completed(&self) -> bool         { self.completed     }

    /// The deadline, unless the store has none for this task
    pub fn due(&self) -> Option<&Deadline> {
        if self.deadline.content.is_empty() {
            None
        } else {
            Some(&self.deadline)
        }
    }

    /// The day group this task belongs to. Empty for a task without a deadline
    pub fn date(&self) -> &str {
        self.deadline.date_part()
    }

    /// Set the completion status.
    /// This only changes the local copy, it is up to the caller to have the store agree first.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deadline_parts() {
        let deadline = Deadline::from_parts("2024-06-01", "23:59");
        assert_eq!(deadline.as_str(), "2024-06-01T23:59");
        assert_eq!(deadline.date_part(), "2024-06-01");
        assert_eq!(deadline.time_part(), "23:59");
        assert!(deadline.to_naive().is_some());

        let with_seconds = Deadline::from("2024-06-01T09:30:00");
        assert_eq!(with_seconds.date_part(), "2024-06-01");
        assert_eq!(with_seconds.time_part(), "09:30");
        assert!(with_seconds.to_naive().is_some());

        let garbage = Deadline::from("someday");
        assert_eq!(garbage.date_part(), "someday");
        assert_eq!(garbage.time_part(), "");
        assert_eq!(garbage.to_naive(), None);
        assert_eq!(garbage.date(), None);
    }

    #[test]
    fn task_ids_can_be_numbers_or_strings() {
        let from_number: Task = serde_json::from_str(
            r#"{"id": 42, "text": "Buy milk", "deadline": "2024-06-01T23:59", "completed": false}"#
        ).unwrap();
        let from_string: Task = serde_json::from_str(
            r#"{"id": "42", "text": "Buy milk", "deadline": "2024-06-01T23:59", "completed": false}"#
        ).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.id().as_str(), "42");
        assert_eq!(from_number.date(), "2024-06-01");
    }

    #[test]
    fn tasks_without_deadline_still_deserialize() {
        let tasks: Vec<Task> = serde_json::from_str(r#"[
            {"id": 1, "text": "null deadline", "deadline": null, "completed": false},
            {"id": 2, "text": "no deadline at all", "completed": true}
        ]"#).unwrap();
        assert_eq!(tasks.len(), 2);
        for task in &tasks {
            assert_eq!(task.due(), None);
            assert_eq!(task.date(), "");
            assert_eq!(task.deadline().time_part(), "");
        }

        let dated: Task = serde_json::from_str(
            r#"{"id": 3, "text": "dated", "deadline": "2024-06-01T09:00"}"#
        ).unwrap();
        assert_eq!(dated.due(), Some(&Deadline::from("2024-06-01T09:00")));
    }

    #[test]
    fn new_task_has_no_id_on_the_wire() {
        let new_task = NewTask::new("Buy milk", Deadline::from("2024-06-01T23:59"));
        let value = serde_json::to_value(&new_task).unwrap();
        assert_eq!(value, serde_json::json!({
            "text": "Buy milk",
            "deadline": "2024-06-01T23:59",
            "completed": false,
        }));
    }
}
