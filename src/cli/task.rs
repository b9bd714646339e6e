//! Task command handlers
//!
//! Each handler calls one store operation and renders its return
//! value; no task state is computed here.

use anyhow::Result;

use super::output::Output;
use super::table;
use crate::domain::{Priority, Task};
use crate::storage::{TaskDraft, TaskStore, Transition};

pub fn add(output: &Output, store: &TaskStore, draft: TaskDraft) -> Result<()> {
    let (id, task) = store.add(draft)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "title": task.title,
            "priority": task.priority,
            "start_date": task.start_date,
            "end_date": task.end_date,
            "done": task.done,
        }));
    } else {
        output.success(&format!("Added task {}: {}", id, task.title));
    }

    Ok(())
}

pub fn list(output: &Output, store: &TaskStore, all: bool) -> Result<()> {
    let tasks = if all { store.all()? } else { store.pending()? };
    output.verbose(&format!("Loaded {} task(s)", tasks.len()));

    if output.is_json() {
        output.data(&json_tasks(&tasks));
    } else if tasks.is_empty() {
        if all {
            println!("No tasks");
        } else {
            println!("No pending tasks");
        }
    } else {
        print!("{}", table::render_tasks(&tasks));
    }

    Ok(())
}

pub fn complete(output: &Output, store: &TaskStore, id: usize) -> Result<()> {
    match store.mark_done(id)? {
        Transition::Applied(task) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "title": task.title,
                    "done": true,
                    "changed": true,
                }));
            } else {
                output.success(&format!("Task {} marked as done: {}", id, task.title));
            }
        }
        Transition::AlreadySet(task) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "title": task.title,
                    "done": true,
                    "changed": false,
                }));
            } else {
                output.info(&format!("Task {} is already done: {}", id, task.title));
            }
        }
    }

    Ok(())
}

pub fn cancel(output: &Output, store: &TaskStore, id: usize) -> Result<()> {
    match store.cancel(id)? {
        Transition::Applied(task) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "title": task.title,
                    "canceled": true,
                    "changed": true,
                }));
            } else {
                output.success(&format!("Task {} canceled: {}", id, task.title));
            }
        }
        Transition::AlreadySet(task) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "title": task.title,
                    "canceled": true,
                    "changed": false,
                }));
            } else {
                output.info(&format!("Task {} is already canceled: {}", id, task.title));
            }
        }
    }

    Ok(())
}

pub fn filter(output: &Output, store: &TaskStore, priority: Priority) -> Result<()> {
    let tasks = store.by_priority(priority)?;

    if output.is_json() {
        output.data(&json_tasks(&tasks));
    } else if tasks.is_empty() {
        println!("No {} priority tasks", priority);
    } else {
        print!("{}", table::render_tasks(&tasks));
    }

    Ok(())
}

pub fn stats(output: &Output, store: &TaskStore) -> Result<()> {
    let stats = store.stats()?;

    if output.is_json() {
        output.data(&stats);
    } else {
        print!("{}", table::render_stats(&stats));
    }

    Ok(())
}

fn json_tasks(tasks: &[(usize, Task)]) -> Vec<serde_json::Value> {
    tasks
        .iter()
        .map(|(id, task)| {
            serde_json::json!({
                "id": id,
                "title": task.title,
                "description": task.description,
                "start_date": task.start_date,
                "end_date": task.end_date,
                "priority": task.priority,
                "done": task.done,
                "canceled": task.canceled,
            })
        })
        .collect()
}
