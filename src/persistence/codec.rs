use super::error::ImportError;
use crate::domain::Task;
use std::collections::HashSet;

/// Parse and validate a task document
pub fn decode_tasks(content: &str) -> Result<Vec<Task>, ImportError> {
    let tasks: Vec<Task> = serde_json::from_str(content)?;
    validate_tasks(&tasks)?;
    Ok(tasks)
}

/// Compact JSON for the storage key
pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

/// Pretty-printed JSON for export documents
pub fn encode_tasks_pretty(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tasks)
}

/// Check the invariants a parsed document must hold before it may replace
/// the in-memory collection
pub fn validate_tasks(tasks: &[Task]) -> Result<(), ImportError> {
    let mut seen = HashSet::new();

    for task in tasks {
        if !seen.insert(task.id) {
            return Err(ImportError::DuplicateId(task.id));
        }
        if task.text.trim().is_empty() {
            return Err(ImportError::BlankText(task.id));
        }
        if !task.time_spent.is_finite() || task.time_spent < 0.0 {
            return Err(ImportError::InvalidTimeSpent(task.id));
        }
        if task.completed != task.completed_at.is_some() {
            return Err(ImportError::CompletionMismatch(task.id));
        }

        let mut subtask_ids = HashSet::new();
        for subtask in &task.subtasks {
            if !subtask_ids.insert(subtask.id) {
                return Err(ImportError::DuplicateSubtaskId {
                    task_id: task.id,
                    subtask_id: subtask.id,
                });
            }
            if subtask.text.trim().is_empty() {
                return Err(ImportError::BlankSubtaskText {
                    task_id: task.id,
                    subtask_id: subtask.id,
                });
            }
        }
    }

    Ok(())
}
