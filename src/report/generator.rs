use crate::domain::{compute_stats, format_minutes, Task};
use crate::persistence::atomic_write;
use crate::report::stats::{calculate_category_stats, calculate_time_stats};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Default report path inside the data directory
pub fn default_report_path(data_dir: &Path, date: NaiveDate) -> PathBuf {
    data_dir.join(format!("report-{}.md", date.format("%Y-%m-%d")))
}

/// Build a markdown summary of the task collection as of `today`
pub fn build_report(tasks: &[Task], today: NaiveDate) -> String {
    let stats = compute_stats(tasks, today);
    let categories = calculate_category_stats(tasks);
    let time = calculate_time_stats(tasks);
    let archived = tasks.iter().filter(|t| t.archived).count();

    let mut report = String::new();

    report.push_str(&format!("# Task Report - {}\n\n", today));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Tasks:** {} (Completed: {}, Archived: {})\n",
        stats.total, stats.completed, archived
    ));
    report.push_str(&format!(
        "- **Completion Rate:** {}\n",
        format_percent(stats.completion_rate)
    ));
    report.push_str(&format!("- **Overdue:** {}\n", stats.overdue));
    report.push_str(&format!(
        "- **High Priority Open:** {}\n\n",
        stats.high_priority_open
    ));

    // Time Section
    report.push_str("## Time Tracked\n\n");
    report.push_str(&format!(
        "- **Total:** {} across {} tasks\n",
        format_minutes(time.total_minutes),
        time.tracked_tasks
    ));
    if let Some((text, minutes)) = &time.longest_task {
        report.push_str(&format!(
            "- **Longest Task:** \"{}\" ({})\n",
            text,
            format_minutes(*minutes)
        ));
    }
    report.push('\n');

    // Category Section
    if !categories.is_empty() {
        report.push_str("## Categories\n\n");

        let mut rows: Vec<_> = categories.iter().collect();
        rows.sort_by(|a, b| b.1.time_spent.total_cmp(&a.1.time_spent));

        for (category, cat) in rows {
            report.push_str(&format!("### {}\n\n", category));
            report.push_str(&format!(
                "- **Tasks:** {} (Done: {}, Active: {})\n",
                cat.task_count, cat.done_count, cat.active_count
            ));
            report.push_str(&format!(
                "- **Completion:** {}\n",
                format_percent(cat.completion_percent())
            ));
            report.push_str(&format!("- **Time:** {}\n\n", format_minutes(cat.time_spent)));
        }
    }

    // Open tasks by due date
    let mut open: Vec<&Task> = tasks.iter().filter(|t| !t.archived && !t.completed).collect();
    if !open.is_empty() {
        open.sort_by(|a, b| crate::domain::views::compare_tasks(a, b, crate::domain::SortKey::Date));

        report.push_str("## Open Tasks\n\n");
        for task in open {
            let due = match task.due_date {
                Some(due) if task.is_overdue(today) => format!(" (due {}, overdue)", due),
                Some(due) => format!(" (due {})", due),
                None => String::new(),
            };
            report.push_str(&format!(
                "- [ ] **{}** [{} / {}]{}\n",
                task.text,
                task.priority.to_tag(),
                task.category,
                due
            ));
            for subtask in &task.subtasks {
                let mark = if subtask.completed { "x" } else { " " };
                report.push_str(&format!("    - [{}] {}\n", mark, subtask.text));
            }
        }
        report.push('\n');
    }

    report
}

/// Build the report and write it to `output`
pub fn generate_report(tasks: &[Task], today: NaiveDate, output: &Path) -> Result<()> {
    let report = build_report(tasks, today);
    atomic_write(output, &report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskStore};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn test_build_report_sections() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut store = TaskStore::new();
        let a = store
            .add("Pay rent", NaiveDate::from_ymd_opt(2024, 1, 31), Priority::High, "personal", now)
            .unwrap();
        store.add_subtask(a, "Transfer", now);
        let b = store.add("Ship", None, Priority::Medium, "work", now).unwrap();
        store.toggle_complete(b, now);
        store.add_time(b, 90.0);

        let report = build_report(store.tasks(), today());

        assert!(report.starts_with("# Task Report - 2024-02-01"));
        assert!(report.contains("- **Tasks:** 2 (Completed: 1, Archived: 0)"));
        assert!(report.contains("- **Completion Rate:** 50.0%"));
        assert!(report.contains("- **Overdue:** 1"));
        assert!(report.contains("- **Longest Task:** \"Ship\" (1h 30m)"));
        assert!(report.contains("### work"));
        assert!(report.contains("- [ ] **Pay rent** [high / personal] (due 2024-01-31, overdue)"));
        assert!(report.contains("    - [ ] Transfer"));
        assert!(!report.contains("**Ship** ["));
    }

    #[test]
    fn test_build_report_empty() {
        let report = build_report(&[], today());
        assert!(report.contains("- **Completion Rate:** 0.0%"));
        assert!(!report.contains("## Categories"));
        assert!(!report.contains("## Open Tasks"));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = default_report_path(temp_dir.path(), today());
        generate_report(&[], today(), &path).unwrap();

        assert!(path.ends_with("report-2024-02-01.md"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("# Task Report"));
    }
}
