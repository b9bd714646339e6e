//! Tally - a local-first personal task tracker
//!
//! Tasks live as an ordered JSON array in a single local file; a
//! task's id is its 1-based position in that file. The store layer
//! owns every read and mutation, the CLI layer parses arguments and
//! renders the store's return values.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Priority, Task};
pub use storage::{Stats, StoreError, TaskDraft, TaskStore, Transition};
