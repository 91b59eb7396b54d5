use crate::domain::Task;
use std::collections::BTreeMap;

/// Per-category statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStats {
    pub task_count: usize,
    pub done_count: usize,
    pub active_count: usize,
    /// Minutes tracked across the category
    pub time_spent: f64,
}

impl CategoryStats {
    pub fn completion_percent(&self) -> f64 {
        if self.task_count == 0 {
            0.0
        } else {
            self.done_count as f64 / self.task_count as f64 * 100.0
        }
    }
}

/// Time tracking summary
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    pub total_minutes: f64,
    pub tracked_tasks: usize,
    /// Task with the most tracked time
    pub longest_task: Option<(String, f64)>,
}

/// Per-category statistics over non-archived tasks, keyed by category
pub fn calculate_category_stats(tasks: &[Task]) -> BTreeMap<String, CategoryStats> {
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();

    for task in tasks.iter().filter(|t| !t.archived) {
        let entry = categories.entry(task.category.clone()).or_default();

        entry.task_count += 1;
        entry.time_spent += task.time_spent;
        if task.completed {
            entry.done_count += 1;
        } else {
            entry.active_count += 1;
        }
    }

    categories
}

/// Time tracked across all tasks, archived included
pub fn calculate_time_stats(tasks: &[Task]) -> TimeStats {
    let total_minutes = tasks.iter().map(|t| t.time_spent).sum();
    let tracked_tasks = tasks.iter().filter(|t| t.time_spent > 0.0).count();

    let mut longest: Option<(String, f64)> = None;
    for task in tasks.iter().filter(|t| t.time_spent > 0.0) {
        match &longest {
            Some((_, best)) if task.time_spent <= *best => {}
            _ => longest = Some((task.text.clone(), task.time_spent)),
        }
    }

    TimeStats {
        total_minutes,
        tracked_tasks,
        longest_task: longest,
    }
}
