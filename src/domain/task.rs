use super::enums::{Priority, DEFAULT_CATEGORY};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier, derived from the creation time in milliseconds
pub type TaskId = i64;

/// Subtask identifier, unique within its parent task
pub type SubtaskId = i64;

/// Pick an id derived from `now` that is strictly greater than `last` and
/// not in `used`.
///
/// Two creations inside the same millisecond would otherwise collide. When
/// `last` is already `i64::MAX` the search starts from `now` instead.
pub fn fresh_id(now: DateTime<Utc>, last: Option<i64>, used: &[i64]) -> i64 {
    let candidate = now.timestamp_millis();
    let start = match last {
        Some(last) if candidate <= last => last.checked_add(1).unwrap_or(candidate),
        _ => candidate,
    };
    (start..=i64::MAX)
        .chain(i64::MIN..start)
        .find(|id| !used.contains(id))
        .unwrap_or(start)
}

/// A nested, independently completable unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A user-defined unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique ID (creation time in ms)
    pub id: TaskId,
    /// Display text, never blank
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Set iff `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Calendar due date; an empty string in a document means "none"
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "due_date_format::deserialize"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Accumulated minutes (fractional)
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub archived: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

impl Task {
    pub fn new(
        id: TaskId,
        text: String,
        due_date: Option<NaiveDate>,
        priority: Priority,
        category: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            completed: false,
            completed_at: None,
            due_date,
            priority,
            category,
            subtasks: Vec::new(),
            created_at,
            time_spent: 0.0,
            archived: false,
        }
    }

    /// Flip completion, keeping `completed_at` in step
    pub fn toggle_complete(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }

    /// Overdue means due strictly before `today` and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Case-insensitive match against text, category and subtask text.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self
                .subtasks
                .iter()
                .any(|st| st.text.to_lowercase().contains(needle))
    }

    /// Append a subtask with an id unique within this task
    pub fn add_subtask(&mut self, text: String, now: DateTime<Utc>) -> SubtaskId {
        let used: Vec<SubtaskId> = self.subtasks.iter().map(|st| st.id).collect();
        let id = fresh_id(now, used.iter().copied().max(), &used);
        self.subtasks.push(Subtask {
            id,
            text,
            completed: false,
        });
        id
    }

    pub fn subtask_mut(&mut self, subtask_id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|st| st.id == subtask_id)
    }

    /// Number of completed subtasks and total
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|st| st.completed).count();
        (done, self.subtasks.len())
    }

    /// Format time spent as "Xh Ym" (e.g., "1h 30m", "45m", "2h")
    pub fn time_spent_formatted(&self) -> String {
        format_minutes(self.time_spent)
    }
}

/// Format fractional minutes as "Xh Ym" (omits 0 values)
pub fn format_minutes(minutes: f64) -> String {
    let total_minutes = minutes.max(0.0).floor() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a running timer as "MM:SS" or "H:MM:SS"
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample_task() -> Task {
        Task::new(
            1_000,
            "Write report".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 10),
            Priority::High,
            "work".to_string(),
            at(1_000),
        )
    }

    #[test]
    fn test_fresh_id_is_monotonic() {
        assert_eq!(fresh_id(at(5_000), None, &[]), 5_000);
        assert_eq!(fresh_id(at(5_000), Some(4_000), &[4_000]), 5_000);
        assert_eq!(fresh_id(at(5_000), Some(5_000), &[5_000]), 5_001);
        assert_eq!(fresh_id(at(5_000), Some(9_000), &[9_000]), 9_001);
    }

    #[test]
    fn test_fresh_id_at_max_takes_smallest_unused() {
        assert_eq!(fresh_id(at(5_000), Some(i64::MAX), &[i64::MAX]), 5_000);
        assert_eq!(
            fresh_id(at(5_000), Some(i64::MAX), &[5_000, 5_001, i64::MAX]),
            5_002
        );
    }

    #[test]
    fn test_task_new_defaults() {
        let task = sample_task();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.time_spent, 0.0);
        assert!(!task.archived);
    }

    #[test]
    fn test_toggle_complete_sets_and_clears_timestamp() {
        let mut task = sample_task();
        task.toggle_complete(at(2_000));
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(at(2_000)));

        task.toggle_complete(at(3_000));
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_is_overdue() {
        let mut task = sample_task();
        let due = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert!(!task.is_overdue(due));
        assert!(task.is_overdue(due.succ_opt().unwrap()));

        task.toggle_complete(at(2_000));
        assert!(!task.is_overdue(due.succ_opt().unwrap()));

        task.due_date = None;
        assert!(!task.is_overdue(due));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let task = sample_task();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(task.due_date, Some(today));
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_matches_search_checks_subtasks_and_category() {
        let mut task = sample_task();
        task.add_subtask("Collect Figures".to_string(), at(1_500));

        assert!(task.matches_search("report"));
        assert!(task.matches_search("work"));
        assert!(task.matches_search("figures"));
        assert!(!task.matches_search("groceries"));
    }

    #[test]
    fn test_subtask_ids_unique_within_task() {
        let mut task = sample_task();
        let a = task.add_subtask("one".to_string(), at(7_000));
        let b = task.add_subtask("two".to_string(), at(7_000));
        assert_ne!(a, b);
        assert_eq!(task.subtask_progress(), (0, 2));
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(90.0), "1h 30m");
        assert_eq!(format_minutes(120.5), "2h");
        assert_eq!(format_minutes(45.9), "45m");
        assert_eq!(format_minutes(0.2), "0m");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3_725), "1:02:05");
    }

    #[test]
    fn test_serde_shape_is_camel_case() {
        let task = sample_task();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2024-03-10");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["timeSpent"], 0.0);
        assert!(json.get("completedAt").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_empty_due_date_string_means_none() {
        let json = r#"{
            "id": 1,
            "text": "Buy milk",
            "completed": false,
            "dueDate": "",
            "priority": "low",
            "category": "shopping",
            "createdAt": "2024-01-01T00:00:00Z",
            "isExpanded": true
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.due_date.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.time_spent, 0.0);
    }
}
