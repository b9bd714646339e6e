//! JSON file storage for tasks
//!
//! The whole task list lives in one JSON file as an ordered array of
//! records. Every mutation is a full load-mutate-save cycle; saves go
//! through a temp file + rename so a reader never sees a partial
//! write. Task ids are 1-based positions in the array and are never
//! persisted.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use fs2::FileExt;
use thiserror::Error;

use crate::domain::{Priority, Task};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access task file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task file {path} is not a valid task list")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("no task with id {0}")]
    InvalidId(usize),
}

/// Unvalidated input for a new task, as collected from the command line
///
/// Dates stay raw strings here; [`TaskStore::add`] owns their
/// validation so that nothing is written when a date is rejected.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub priority: Priority,
    pub done: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Result of a done/cancel flag flip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The flag was set and the sequence rewritten
    Applied(Task),
    /// The flag was already set; nothing was written
    AlreadySet(Task),
}

impl Transition {
    /// The task the transition was applied to (or found already in state)
    pub fn task(&self) -> &Task {
        match self {
            Transition::Applied(task) | Transition::AlreadySet(task) => task,
        }
    }
}

/// Counts over the full task sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
    pub canceled: usize,
    pub high: usize,
    pub low: usize,
    pub pending: usize,
}

/// Store for the persisted task sequence
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full ordered sequence
    ///
    /// A missing or empty file is an empty sequence; a file that exists
    /// but does not parse is fatal.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        file.lock_shared().map_err(|e| self.io_err(e))?;

        let mut contents = String::new();
        (&file)
            .read_to_string(&mut contents)
            .map_err(|e| self.io_err(e))?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Persists the full ordered sequence, replacing prior content
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.io_err(e))?;

            file.lock_exclusive().map_err(|e| self.io_err(e))?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, tasks)
                .map_err(|e| self.io_err(e.into()))?;
            writeln!(writer).map_err(|e| self.io_err(e))?;
            writer.flush().map_err(|e| self.io_err(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_err(e))
    }

    /// Validates the draft, appends the task, and saves
    ///
    /// Returns the new task's 1-based id together with the task. A bad
    /// date aborts before anything is read or written.
    pub fn add(&self, draft: TaskDraft) -> Result<(usize, Task), StoreError> {
        let start_date = match draft.start_date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => Local::now().date_naive(),
        };
        let end_date = draft.end_date.as_deref().map(parse_date).transpose()?;

        let task = Task {
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            start_date,
            end_date,
            done: draft.done,
            priority: draft.priority,
            canceled: false,
        };

        let mut tasks = self.load()?;
        tasks.push(task.clone());
        self.save(&tasks)?;

        Ok((tasks.len(), task))
    }

    /// The full sequence, each task paired with its 1-based id
    pub fn all(&self) -> Result<Vec<(usize, Task)>, StoreError> {
        Ok(number(self.load()?))
    }

    /// Tasks that are neither done nor canceled, in stored order
    pub fn pending(&self) -> Result<Vec<(usize, Task)>, StoreError> {
        let mut tasks = number(self.load()?);
        tasks.retain(|(_, task)| task.is_pending());
        Ok(tasks)
    }

    /// Tasks with the given priority, in stored order
    pub fn by_priority(&self, priority: Priority) -> Result<Vec<(usize, Task)>, StoreError> {
        let mut tasks = number(self.load()?);
        tasks.retain(|(_, task)| task.priority == priority);
        Ok(tasks)
    }

    /// Marks task `id` as done; the canceled flag is left alone
    pub fn mark_done(&self, id: usize) -> Result<Transition, StoreError> {
        let mut tasks = self.load()?;
        let index = locate(id, tasks.len())?;

        if !tasks[index].mark_done() {
            return Ok(Transition::AlreadySet(tasks[index].clone()));
        }

        self.save(&tasks)?;
        Ok(Transition::Applied(tasks[index].clone()))
    }

    /// Cancels task `id`; the done flag is left alone
    pub fn cancel(&self, id: usize) -> Result<Transition, StoreError> {
        let mut tasks = self.load()?;
        let index = locate(id, tasks.len())?;

        if !tasks[index].cancel() {
            return Ok(Transition::AlreadySet(tasks[index].clone()));
        }

        self.save(&tasks)?;
        Ok(Transition::Applied(tasks[index].clone()))
    }

    /// Counts over the full sequence
    pub fn stats(&self) -> Result<Stats, StoreError> {
        let tasks = self.load()?;

        let total = tasks.len();
        let done = tasks.iter().filter(|t| t.done).count();
        let canceled = tasks.iter().filter(|t| t.canceled).count();
        let high = tasks.iter().filter(|t| t.priority == Priority::High).count();
        let low = tasks.iter().filter(|t| t.priority == Priority::Low).count();

        Ok(Stats {
            total,
            done,
            canceled,
            high,
            low,
            pending: total.saturating_sub(done).saturating_sub(canceled),
        })
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    raw.parse()
        .map_err(|_| StoreError::InvalidDate(raw.to_string()))
}

fn number(tasks: Vec<Task>) -> Vec<(usize, Task)> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| (index + 1, task))
        .collect()
}

// Ids are 1-based; 0 and anything past the end are rejected.
fn locate(id: usize, len: usize) -> Result<usize, StoreError> {
    id.checked_sub(1)
        .filter(|&index| index < len)
        .ok_or(StoreError::InvalidId(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::new(dir.path().join("tasks.json"))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title)
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load().unwrap(), vec![]);
    }

    #[test]
    fn load_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();

        assert_eq!(store.load().unwrap(), vec![]);
    }

    #[test]
    fn load_garbage_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json]").unwrap();

        assert!(matches!(
            store.load(),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let tasks = vec![Task::new("first"), Task::new("second"), Task::new("third")];
        store.save(&tasks).unwrap();

        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&[Task::new("x")]).unwrap();

        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nested").join("dir").join("tasks.json"));

        store.save(&[Task::new("x")]).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn add_appends_at_next_position() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let (first_id, _) = store.add(draft("one")).unwrap();
        let (second_id, task) = store.add(draft("two")).unwrap();

        assert_eq!(first_id, 1);
        assert_eq!(second_id, 2);
        assert_eq!(task.title, "two");
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn add_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let (_, task) = store.add(draft("defaults")).unwrap();

        assert_eq!(task.description, "");
        assert_eq!(task.start_date, Local::now().date_naive());
        assert_eq!(task.end_date, None);
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.done);
        assert!(!task.canceled);
    }

    #[test]
    fn add_with_explicit_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let (_, task) = store
            .add(TaskDraft {
                title: "release".into(),
                description: Some("ship it".into()),
                start_date: Some("2024-05-01".into()),
                end_date: Some("2024-05-20".into()),
                priority: Priority::High,
                done: true,
            })
            .unwrap();

        assert_eq!(task.description, "ship it");
        assert_eq!(task.start_date.to_string(), "2024-05-01");
        assert_eq!(task.end_date.unwrap().to_string(), "2024-05-20");
        assert_eq!(task.priority, Priority::High);
        assert!(task.done);
    }

    #[test]
    fn add_rejects_bad_end_date_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("existing")).unwrap();
        let before = store.load().unwrap();

        let result = store.add(TaskDraft {
            title: "X".into(),
            end_date: Some("not-a-date".into()),
            ..TaskDraft::default()
        });

        match result {
            Err(StoreError::InvalidDate(value)) => assert_eq!(value, "not-a-date"),
            other => panic!("expected InvalidDate, got {other:?}"),
        }
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn add_rejects_bad_start_date() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let result = store.add(TaskDraft {
            title: "X".into(),
            start_date: Some("2024-13-40".into()),
            ..TaskDraft::default()
        });

        assert!(matches!(result, Err(StoreError::InvalidDate(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn mark_done_flips_exactly_one_task() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("one")).unwrap();
        store.add(draft("two")).unwrap();
        store.add(draft("three")).unwrap();

        let transition = store.mark_done(2).unwrap();

        assert!(matches!(transition, Transition::Applied(_)));
        let tasks = store.load().unwrap();
        assert!(!tasks[0].done);
        assert!(tasks[1].done);
        assert!(!tasks[1].canceled);
        assert!(!tasks[2].done);
    }

    #[test]
    fn mark_done_twice_reports_already_set() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("one")).unwrap();

        assert!(matches!(store.mark_done(1).unwrap(), Transition::Applied(_)));
        let second = store.mark_done(1).unwrap();

        assert!(matches!(second, Transition::AlreadySet(_)));
        assert!(second.task().done);
    }

    #[test]
    fn mark_done_out_of_range_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("one")).unwrap();
        store.add(draft("two")).unwrap();
        let before = store.load().unwrap();

        assert!(matches!(store.mark_done(5), Err(StoreError::InvalidId(5))));
        assert!(matches!(store.mark_done(0), Err(StoreError::InvalidId(0))));
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn cancel_leaves_done_alone() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("one")).unwrap();
        store.mark_done(1).unwrap();

        let transition = store.cancel(1).unwrap();

        assert!(matches!(transition, Transition::Applied(_)));
        let task = &store.load().unwrap()[0];
        assert!(task.done);
        assert!(task.canceled);
    }

    #[test]
    fn cancel_twice_reports_already_set() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("one")).unwrap();

        store.cancel(1).unwrap();
        assert!(matches!(store.cancel(1).unwrap(), Transition::AlreadySet(_)));
    }

    #[test]
    fn pending_is_all_minus_flagged_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("a")).unwrap();
        store.add(draft("b")).unwrap();
        store.add(draft("c")).unwrap();
        store.add(draft("d")).unwrap();
        store.mark_done(2).unwrap();
        store.cancel(3).unwrap();

        let pending = store.pending().unwrap();
        let all = store.all().unwrap();

        let expected: Vec<_> = all
            .iter()
            .filter(|(_, t)| !t.done && !t.canceled)
            .cloned()
            .collect();
        assert_eq!(pending, expected);

        let ids: Vec<_> = pending.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn by_priority_keeps_order_and_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(draft("low one")).unwrap();
        store
            .add(TaskDraft {
                title: "high one".into(),
                priority: Priority::High,
                ..TaskDraft::default()
            })
            .unwrap();

        let high = store.by_priority(Priority::High).unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].0, 2);
        assert_eq!(high[0].1.title, "high one");

        let low = store.by_priority(Priority::Low).unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].0, 1);
    }

    #[test]
    fn stats_counts_hold_together() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for i in 0..5 {
            store
                .add(TaskDraft {
                    title: format!("task {i}"),
                    priority: if i < 2 { Priority::High } else { Priority::Low },
                    ..TaskDraft::default()
                })
                .unwrap();
        }
        store.mark_done(1).unwrap();
        store.mark_done(2).unwrap();
        store.cancel(3).unwrap();

        let stats = store.stats().unwrap();

        assert_eq!(stats.total, 5);
        assert_eq!(stats.done, 2);
        assert_eq!(stats.canceled, 1);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.low, 3);
        assert_eq!(stats.pending, stats.total - stats.done - stats.canceled);
        assert_eq!(stats.pending, 2);
    }

    #[test]
    fn stats_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let stats = store.stats().unwrap();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.pending, 0);
    }
}
