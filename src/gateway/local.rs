//! This module provides a task store that lives in this process, optionally saved to a local file

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::mock_behaviour::MockBehaviour;
use crate::task::{NewTask, Task, TaskId};
use crate::traits::TaskGateway;

/// How many times each gateway operation has been called (including the calls that failed)
#[derive(Default, Clone, Debug, PartialEq)]
pub struct CallCounts {
    pub list_all: u32,
    pub insert: u32,
    pub set_completed: u32,
    pub delete_by_id: u32,
    pub delete_by_ids: u32,
}

impl CallCounts {
    pub fn total(&self) -> u32 {
        self.list_all + self.insert + self.set_completed + self.delete_by_id + self.delete_by_ids
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
struct StoredData {
    tasks: Vec<Task>,
}

/// A [`TaskGateway`] that keeps its rows in memory, and mirrors them to a backing file if it has one
#[derive(Debug)]
pub struct LocalStore {
    backing_file: Option<PathBuf>,
    data: Mutex<StoredData>,
    behaviour: Mutex<MockBehaviour>,
    calls: Mutex<CallCounts>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|_| StoreError::new("local store lock is poisoned"))
}

impl LocalStore {
    /// An empty store that only lives in memory
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// A memory-only store that already contains some tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            backing_file: None,
            data: Mutex::new(StoredData { tasks }),
            behaviour: Mutex::new(MockBehaviour::new()),
            calls: Mutex::new(CallCounts::default()),
        }
    }

    /// Initialize a store from the content of a valid backing file if it exists, or an empty one otherwise.
    /// Returns an error if the file exists but cannot be read
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let data = match std::fs::File::open(path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No store file at {:?} yet, starting empty", path);
                StoredData::default()
            },
            Err(err) => {
                return Err(StoreError::new(format!("Unable to open file {:?}: {}", path, err)));
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        let mut store = Self::with_tasks(data.tasks);
        store.backing_file = Some(PathBuf::from(path));
        Ok(store)
    }

    /// Use a scripted behaviour, so that some next calls will fail
    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) -> Result<(), StoreError> {
        *lock(&self.behaviour)? = behaviour;
        Ok(())
    }

    pub fn call_counts(&self) -> CallCounts {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// A snapshot of the stored rows, in storage order
    pub fn snapshot(&self) -> Vec<Task> {
        match self.data.lock() {
            Ok(data) => data.tasks.clone(),
            Err(poisoned) => poisoned.into_inner().tasks.clone(),
        }
    }

    /// Count the call and check the mock behaviour allows it
    fn admit<F>(&self, count: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut CallCounts, &mut MockBehaviour) -> Result<(), StoreError>,
    {
        let mut calls = lock(&self.calls)?;
        let mut behaviour = lock(&self.behaviour)?;
        count(&mut calls, &mut behaviour)
    }

    /// Apply a change to a copy of the rows, persist it, and only then keep it
    fn commit<F, R>(&self, change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut StoredData) -> Result<R, StoreError>,
    {
        let mut data = lock(&self.data)?;
        let mut updated = data.clone();
        let result = change(&mut updated)?;
        self.save_to_file(&updated)?;
        *data = updated;
        Ok(result)
    }

    /// Store the given data to the backing file, if any
    fn save_to_file(&self, data: &StoredData) -> Result<(), StoreError> {
        let path = match &self.backing_file {
            None => return Ok(()),
            Some(path) => path,
        };
        let file = std::fs::File::create(path)
            .map_err(|err| StoreError::new(format!("Unable to save file {:?}: {}", path, err)))?;
        serde_json::to_writer_pretty(file, data)?;
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskGateway for LocalStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.admit(|calls, behaviour| { calls.list_all += 1; behaviour.can_list_all() })?;

        let mut tasks = lock(&self.data)?.tasks.clone();
        // Stable, so that tasks with the same deadline keep their insertion order
        tasks.sort_by(|a, b| a.deadline().cmp(b.deadline()));
        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        self.admit(|calls, behaviour| { calls.insert += 1; behaviour.can_insert() })?;

        let id = TaskId::from(uuid::Uuid::new_v4().to_hyphenated().to_string());
        let created = task.into_task(id);
        let stored = created.clone();
        self.commit(move |data| {
            data.tasks.push(stored);
            Ok(())
        })?;
        log::debug!("Local store: created task {}", created.id());
        Ok(created)
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        self.admit(|calls, behaviour| { calls.set_completed += 1; behaviour.can_set_completed() })?;

        self.commit(|data| {
            match data.tasks.iter_mut().find(|t| t.id() == id) {
                None => log::debug!("Local store: no task {} to update", id),
                Some(task) => task.set_completed(completed),
            }
            Ok(())
        })
    }

    async fn delete_by_id(&self, id: &TaskId) -> Result<(), StoreError> {
        self.admit(|calls, behaviour| { calls.delete_by_id += 1; behaviour.can_delete_by_id() })?;

        self.commit(|data| {
            let before = data.tasks.len();
            data.tasks.retain(|t| t.id() != id);
            if before == data.tasks.len() {
                log::debug!("Local store: no task {} to delete", id);
            }
            Ok(())
        })
    }

    async fn delete_by_ids(&self, ids: &[TaskId]) -> Result<(), StoreError> {
        self.admit(|calls, behaviour| { calls.delete_by_ids += 1; behaviour.can_delete_by_ids() })?;

        self.commit(|data| {
            let before = data.tasks.len();
            data.tasks.retain(|t| ids.contains(t.id()) == false);
            log::debug!("Local store: deleted {} tasks", before - data.tasks.len());
            Ok(())
        })
    }
}
