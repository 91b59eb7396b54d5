use crate::domain::{SubtaskId, TaskId};
use std::path::PathBuf;

/// Error type for key-value storage access
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error type for task documents (import files and stored state)
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid task document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("task {0} has blank text")]
    BlankText(TaskId),
    #[error("task id {0} appears more than once")]
    DuplicateId(TaskId),
    #[error("task {task_id} has blank text in subtask {subtask_id}")]
    BlankSubtaskText { task_id: TaskId, subtask_id: SubtaskId },
    #[error("task {task_id} repeats subtask id {subtask_id}")]
    DuplicateSubtaskId { task_id: TaskId, subtask_id: SubtaskId },
    #[error("task {0} has an invalid time spent")]
    InvalidTimeSpent(TaskId),
    #[error("task {0} has a completion timestamp that does not match its completed flag")]
    CompletionMismatch(TaskId),
}
