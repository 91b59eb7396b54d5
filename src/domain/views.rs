use super::enums::{Priority, SortKey, StatusFilter};
use super::task::{SubtaskId, Task, TaskId};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Filter / search / sort configuration for the visible list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewConfig {
    pub filter: StatusFilter,
    pub sort: SortKey,
    pub search: String,
}

/// Whether a task belongs to a status partition
pub fn matches_status(task: &Task, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => !task.archived,
        StatusFilter::Active => !task.archived && !task.completed,
        StatusFilter::Completed => !task.archived && task.completed,
        StatusFilter::Archived => task.archived,
    }
}

/// Compare two tasks by a sort key
pub fn compare_tasks(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => match (a.due_date, b.due_date) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        SortKey::Created => b.created_at.cmp(&a.created_at),
    }
}

/// Compute the visible projection: status filter, then search, then a stable sort.
/// The input slice is never reordered.
pub fn derive_view<'a>(tasks: &'a [Task], config: &ViewConfig) -> Vec<&'a Task> {
    let needle = config.search.trim().to_lowercase();

    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches_status(t, config.filter))
        .filter(|t| needle.is_empty() || t.matches_search(&needle))
        .collect();

    view.sort_by(|a, b| compare_tasks(a, b, config.sort));
    view
}

/// Aggregate counts over non-archived tasks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub high_priority_open: usize,
    /// Percentage 0..=100
    pub completion_rate: f64,
}

pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let live: Vec<&Task> = tasks.iter().filter(|t| !t.archived).collect();

    let total = live.len();
    let completed = live.iter().filter(|t| t.completed).count();
    let overdue = live.iter().filter(|t| t.is_overdue(today)).count();
    let high_priority_open = live
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count();

    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    TaskStats {
        total,
        completed,
        overdue,
        high_priority_open,
        completion_rate,
    }
}

/// A flattened row for rendering the task list
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    pub task_id: TaskId,
    /// Subtask id (None for parent tasks)
    pub subtask_id: Option<SubtaskId>,
    /// Depth in the tree (0 = task, 1 = subtask)
    pub depth: usize,
    /// Whether this is the last subtask of its parent
    pub is_last: bool,
}

/// Flatten the derived view into rows, listing subtasks of expanded tasks
pub fn flatten_tasks(view: &[&Task], expanded: &HashSet<TaskId>) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for task in view {
        rows.push(FlatRow {
            task_id: task.id,
            subtask_id: None,
            depth: 0,
            is_last: false,
        });

        if expanded.contains(&task.id) && !task.subtasks.is_empty() {
            let subtask_count = task.subtasks.len();
            for (st_idx, subtask) in task.subtasks.iter().enumerate() {
                rows.push(FlatRow {
                    task_id: task.id,
                    subtask_id: Some(subtask.id),
                    depth: 1,
                    is_last: st_idx == subtask_count - 1,
                });
            }
        }
    }

    rows
}

/// Get tree connector for subtasks
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}
