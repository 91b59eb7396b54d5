use crate::domain::{
    compute_stats, derive_view, flatten_tasks, templates, FlatRow, Priority, SubtaskId, Task, TaskId,
    TaskStats, TaskStore, UiMode, ViewConfig, DEFAULT_CATEGORY, SUGGESTED_CATEGORIES,
};
use crate::persistence::{export_file_name, ImportError, PersistenceBridge};
use crate::timer::{TimerTracker, TimerTransition};
use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the input form will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    NewTask,
    EditTask(TaskId),
    NewSubtask(TaskId),
}

/// Input form fields, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    DueDate,
    Priority,
    Category,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Text => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Category,
            Self::Category => Self::Text,
        }
    }
}

/// Input form state for adding and editing tasks
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub target: FormTarget,
    pub text: String,
    pub due_date: String, // YYYY-MM-DD or empty
    pub priority: Priority,
    pub category: String,
    pub field: FormField,
    pub error: Option<String>,
}

impl InputFormState {
    fn new(target: FormTarget) -> Self {
        Self {
            target,
            text: String::new(),
            due_date: String::new(),
            priority: Priority::default(),
            category: DEFAULT_CATEGORY.to_string(),
            field: FormField::Text,
            error: None,
        }
    }

    fn for_task(task: &Task) -> Self {
        Self {
            target: FormTarget::EditTask(task.id),
            text: task.text.clone(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            category: task.category.clone(),
            field: FormField::Text,
            error: None,
        }
    }

    /// Subtask forms only have a text field
    pub fn is_subtask(&self) -> bool {
        matches!(self.target, FormTarget::NewSubtask(_))
    }

    pub fn next_field(&mut self) {
        if !self.is_subtask() {
            self.field = self.field.next();
        }
    }

    /// Text buffer of the focused field, if it takes typed input
    pub fn active_buffer(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Text => Some(&mut self.text),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Category => Some(&mut self.category),
            FormField::Priority => None,
        }
    }

    /// Cycle the priority, or the suggested categories
    pub fn cycle_choice(&mut self) {
        match self.field {
            FormField::Priority => self.priority = self.priority.next(),
            FormField::Category => {
                let current = SUGGESTED_CATEGORIES
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(self.category.trim()));
                let next = current.map_or(0, |i| (i + 1) % SUGGESTED_CATEGORIES.len());
                self.category = SUGGESTED_CATEGORIES[next].to_string();
            }
            _ => {}
        }
    }

    fn parsed_due_date(&self) -> Result<Option<NaiveDate>, String> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid due date \"{}\" (use YYYY-MM-DD)", raw))
    }
}

/// Blocking notification shown until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub timer: TimerTracker,
    pub view: ViewConfig,
    /// Tasks whose subtasks are listed (UI only, not persisted)
    pub expanded: HashSet<TaskId>,
    pub dark_mode: bool,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub path_input: String,
    pub notice: Option<Notice>,
    pub status_message: Option<String>,
    pub needs_save: bool,
    /// Last write failed; the exit flush retries it
    save_failed: bool,
    /// Timer started or switched since the loop last measured wall time
    timer_restarted: bool,
    bridge: PersistenceBridge,
    export_dir: PathBuf,
}

impl AppState {
    /// Build state from whatever the bridge has stored
    pub fn new(bridge: PersistenceBridge, export_dir: PathBuf) -> Self {
        let loaded = bridge.load();

        Self {
            store: TaskStore::from_tasks(loaded.tasks),
            timer: TimerTracker::new(),
            view: ViewConfig::default(),
            expanded: HashSet::new(),
            dark_mode: loaded.dark_mode,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            path_input: String::new(),
            notice: None,
            status_message: None,
            needs_save: false,
            save_failed: false,
            timer_restarted: false,
            bridge,
            export_dir,
        }
    }

    // ----- derived views -----

    pub fn visible_tasks(&self) -> Vec<&Task> {
        derive_view(self.store.tasks(), &self.view)
    }

    pub fn visible_rows(&self) -> Vec<FlatRow> {
        flatten_tasks(&self.visible_tasks(), &self.expanded)
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(self.store.tasks(), Local::now().date_naive())
    }

    pub fn selected_row(&self) -> Option<FlatRow> {
        self.visible_rows().into_iter().nth(self.selected_index)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let row = self.selected_row()?;
        self.store.get(row.task_id)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_rows().len() {
            self.selected_index += 1;
        }
    }

    // ----- task operations -----

    fn mark_dirty(&mut self, changed: bool) -> bool {
        if changed {
            self.needs_save = true;
        }
        changed
    }

    pub fn add_task(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
        category: &str,
    ) -> Option<TaskId> {
        let id = self.store.add(text, due_date, priority, category, Utc::now());
        self.mark_dirty(id.is_some());
        id
    }

    pub fn add_from_template(&mut self, index: usize) -> Option<TaskId> {
        let template = templates::get(index)?;
        let id = self.store.add_from_template(template, None, Utc::now());
        if let Some(id) = id {
            self.expanded.insert(id);
            self.needs_save = true;
        }
        id
    }

    /// Flip completion; completing or reopening the timed task stops the timer
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let changed = self.store.toggle_complete(id, Utc::now());
        if changed {
            self.timer.stop_if_target(id);
        }
        self.clamp_selection();
        self.mark_dirty(changed)
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let changed = self.store.delete(id);
        if changed {
            self.timer.stop_if_target(id);
            self.expanded.remove(&id);
        }
        self.clamp_selection();
        self.mark_dirty(changed)
    }

    pub fn archive_task(&mut self, id: TaskId) -> bool {
        let changed = self.store.archive(id);
        self.clamp_selection();
        self.mark_dirty(changed)
    }

    pub fn edit_task(&mut self, id: TaskId, text: &str) -> bool {
        let changed = self.store.edit(id, text);
        self.mark_dirty(changed)
    }

    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> Option<SubtaskId> {
        let id = self.store.add_subtask(task_id, text, Utc::now());
        if id.is_some() {
            self.expanded.insert(task_id);
            self.needs_save = true;
        }
        id
    }

    pub fn toggle_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> bool {
        let changed = self.store.toggle_subtask(task_id, subtask_id);
        self.mark_dirty(changed)
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> bool {
        let changed = self.store.delete_subtask(task_id, subtask_id);
        self.clamp_selection();
        self.mark_dirty(changed)
    }

    /// UI-only; does not mark the store dirty
    pub fn toggle_expanded(&mut self, id: TaskId) {
        if !self.expanded.remove(&id) && self.store.contains(id) {
            self.expanded.insert(id);
        }
        self.clamp_selection();
    }

    /// Start/stop/switch the timer; unknown ids are ignored
    pub fn toggle_timer(&mut self, id: TaskId) -> Option<TimerTransition> {
        if !self.store.contains(id) {
            return None;
        }
        let transition = self.timer.start(id);
        if matches!(
            transition,
            TimerTransition::Started | TimerTransition::Switched { .. }
        ) {
            self.timer_restarted = true;
        }
        Some(transition)
    }

    /// True once after a timer start or switch. The caller drops the wall time
    /// measured before that point so the new run does not inherit it.
    pub fn take_timer_restart(&mut self) -> bool {
        std::mem::take(&mut self.timer_restarted)
    }

    /// Feed wall time to the timer
    pub fn tick(&mut self, delta: Duration) {
        let ticks = self.timer.advance(delta, &mut self.store);
        self.mark_dirty(ticks > 0);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.needs_save = true;
    }

    // ----- view configuration -----

    pub fn cycle_filter(&mut self) {
        self.view.filter = self.view.filter.next();
        self.selected_index = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.view.sort = self.view.sort.next();
        self.selected_index = 0;
    }

    pub fn set_search(&mut self, term: String) {
        self.view.search = term;
        self.selected_index = 0;
    }

    // ----- persistence -----

    /// Write state if anything changed since the last save
    pub fn save(&mut self) -> Result<()> {
        if !self.needs_save {
            return Ok(());
        }
        // Cleared first so a failing store is retried on the next change, not every loop
        self.needs_save = false;
        match self.bridge.save(self.store.tasks(), self.dark_mode) {
            Ok(()) => {
                self.save_failed = false;
                Ok(())
            }
            Err(e) => {
                self.save_failed = true;
                Err(e.into())
            }
        }
    }

    /// Final write on exit, including state whose last save failed
    pub fn flush(&mut self) -> Result<()> {
        if self.save_failed {
            self.needs_save = true;
        }
        self.save()
    }

    /// Export to `path`, or `tasks-YYYY-MM-DD.json` in the export directory
    pub fn export(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self
                .export_dir
                .join(export_file_name(Local::now().date_naive())),
        };
        self.bridge.export(self.store.tasks(), &path)?;
        Ok(path)
    }

    /// Replace the collection from a document; on failure nothing changes
    pub fn import(&mut self, path: &Path) -> Result<usize, ImportError> {
        let tasks = self.bridge.import(path)?;
        let count = tasks.len();

        self.store.replace_all(tasks);
        if let Some(active) = self.timer.active() {
            if !self.store.contains(active) {
                self.timer.stop();
            }
        }
        let store = &self.store;
        self.expanded.retain(|id| store.contains(*id));
        self.selected_index = 0;
        self.needs_save = true;
        Ok(count)
    }

    // ----- selection-driven actions (key handler) -----

    pub fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else { return };
        match row.subtask_id {
            Some(st) => {
                self.toggle_subtask(row.task_id, st);
            }
            None => {
                self.toggle_complete(row.task_id);
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(row) = self.selected_row() else { return };
        match row.subtask_id {
            Some(st) => {
                self.delete_subtask(row.task_id, st);
            }
            None => {
                self.delete_task(row.task_id);
            }
        }
    }

    pub fn archive_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            self.archive_task(row.task_id);
        }
    }

    pub fn toggle_timer_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            self.toggle_timer(row.task_id);
        }
    }

    pub fn toggle_expand_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            let before = self.visible_rows().iter().position(|r| r.task_id == row.task_id);
            self.toggle_expanded(row.task_id);
            // Keep the cursor on the parent when collapsing from a subtask row
            if let Some(index) = before {
                self.selected_index = index;
            }
        }
    }

    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::new(FormTarget::NewTask));
        self.ui_mode = UiMode::AddingTask;
    }

    pub fn start_add_subtask(&mut self) {
        if let Some(row) = self.selected_row() {
            self.input_form = Some(InputFormState::new(FormTarget::NewSubtask(row.task_id)));
            self.ui_mode = UiMode::AddingSubtask;
        }
    }

    pub fn start_edit_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.input_form = Some(InputFormState::for_task(task));
            self.ui_mode = UiMode::EditingTask;
        }
    }

    pub fn cancel_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Apply the form. A bad due date keeps the form open with an error.
    pub fn submit_form(&mut self) {
        let Some(mut form) = self.input_form.take() else {
            self.ui_mode = UiMode::Normal;
            return;
        };

        let due_date = match form.parsed_due_date() {
            Ok(due) => due,
            Err(msg) => {
                form.error = Some(msg);
                self.input_form = Some(form);
                return;
            }
        };

        match form.target {
            FormTarget::NewTask => {
                if let Some(id) = self.add_task(&form.text, due_date, form.priority, &form.category) {
                    self.select_task(id);
                }
            }
            FormTarget::EditTask(id) => {
                let text_changed = self.store.edit(id, &form.text);
                let details_changed =
                    self.store
                        .update_details(id, due_date, form.priority, &form.category);
                self.mark_dirty(text_changed || details_changed);
            }
            FormTarget::NewSubtask(task_id) => {
                self.add_subtask(task_id, &form.text);
            }
        }

        self.ui_mode = UiMode::Normal;
    }

    /// Move the cursor to a task if it is visible
    fn select_task(&mut self, id: TaskId) {
        if let Some(index) = self
            .visible_rows()
            .iter()
            .position(|r| r.task_id == id && r.subtask_id.is_none())
        {
            self.selected_index = index;
        }
    }

    pub fn open_template_picker(&mut self) {
        self.ui_mode = UiMode::TemplatePicker;
    }

    pub fn pick_template(&mut self, index: usize) {
        if let Some(id) = self.add_from_template(index) {
            self.select_task(id);
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn start_search(&mut self) {
        self.ui_mode = UiMode::Searching;
    }

    pub fn start_import(&mut self) {
        self.path_input.clear();
        self.ui_mode = UiMode::ImportPath;
    }

    /// Import from the typed path; errors become a blocking notice
    pub fn submit_import(&mut self) {
        let path = PathBuf::from(self.path_input.trim());
        self.ui_mode = UiMode::Normal;
        match self.import(&path) {
            Ok(count) => {
                self.status_message = Some(format!("Imported {} tasks from {}", count, path.display()));
            }
            Err(e) => self.show_notice("Import failed", e.to_string()),
        }
    }

    pub fn export_now(&mut self) {
        match self.export(None) {
            Ok(path) => {
                self.status_message = Some(format!(
                    "Exported {} tasks to {}",
                    self.store.len(),
                    path.display()
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.show_notice("Export failed", format!("{:#}", e));
            }
        }
    }

    pub fn show_notice(&mut self, title: &str, message: String) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message,
        });
        self.ui_mode = UiMode::Notice;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.ui_mode = UiMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusFilter;
    use crate::persistence::bridge::{DARK_MODE_KEY, TASKS_KEY};
    use crate::persistence::error::PersistenceError;
    use crate::persistence::storage::KeyValueStore;
    use crate::persistence::{FileStore, MemoryStore};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn memory_app() -> AppState {
        let bridge = PersistenceBridge::new(Box::new(MemoryStore::new()));
        AppState::new(bridge, std::env::temp_dir())
    }

    fn visible_ids(app: &AppState) -> Vec<TaskId> {
        app.visible_tasks().iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut app = memory_app();
        let due = NaiveDate::from_ymd_opt(2024, 1, 1);
        let id = app.add_task("Buy milk", due, Priority::Low, "shopping").unwrap();

        assert_eq!(app.store.len(), 1);
        let task = app.store.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.category, "shopping");
        assert_eq!(task.due_date, due);
        assert!(!task.completed);

        app.toggle_complete(id);
        let task = app.store.get(id).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        app.archive_task(id);
        app.view.filter = StatusFilter::Active;
        assert!(visible_ids(&app).is_empty());
        app.view.filter = StatusFilter::Archived;
        assert_eq!(visible_ids(&app), vec![id]);
    }

    #[test]
    fn test_blank_add_does_not_dirty() {
        let mut app = memory_app();
        assert!(app.add_task("   ", None, Priority::High, "work").is_none());
        assert!(!app.needs_save);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_completing_timed_task_stops_timer() {
        let mut app = memory_app();
        let id = app.add_task("Focus", None, Priority::High, "work").unwrap();

        app.toggle_timer(id);
        app.tick(Duration::from_secs(3));
        assert_eq!(app.timer.elapsed_secs(), 3);

        app.toggle_complete(id);
        assert_eq!(app.timer.active(), None);
        assert_eq!(app.timer.elapsed_secs(), 0);
        assert!((app.store.get(id).unwrap().time_spent - 3.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_deleting_timed_task_stops_accumulation() {
        let mut app = memory_app();
        let a = app.add_task("A", None, Priority::Low, "work").unwrap();
        let b = app.add_task("B", None, Priority::Low, "work").unwrap();

        app.toggle_timer(a);
        app.tick(Duration::from_secs(2));
        app.delete_task(a);
        assert_eq!(app.timer.active(), None);

        app.tick(Duration::from_secs(10));
        assert_eq!(app.store.get(b).unwrap().time_spent, 0.0);
    }

    #[test]
    fn test_timer_restart_is_reported_once() {
        let mut app = memory_app();
        let a = app.add_task("A", None, Priority::Low, "work").unwrap();
        let b = app.add_task("B", None, Priority::Low, "work").unwrap();
        assert!(!app.take_timer_restart());

        app.toggle_timer(a);
        assert!(app.take_timer_restart());
        assert!(!app.take_timer_restart());

        app.toggle_timer(b);
        assert!(app.take_timer_restart());

        // Stopping is not a restart
        app.toggle_timer(b);
        assert_eq!(app.timer.active(), None);
        assert!(!app.take_timer_restart());
    }

    #[test]
    fn test_toggle_timer_unknown_id_is_ignored() {
        let mut app = memory_app();
        assert!(app.toggle_timer(42).is_none());
        assert_eq!(app.timer.active(), None);
    }

    #[test]
    fn test_expanded_is_ui_only() {
        let mut app = memory_app();
        let id = app.add_task("Parent", None, Priority::Low, "work").unwrap();
        app.add_subtask(id, "Child");
        app.needs_save = false;

        assert_eq!(app.visible_rows().len(), 2);
        app.toggle_expanded(id);
        assert_eq!(app.visible_rows().len(), 1);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_selection_actions_on_subtask_rows() {
        let mut app = memory_app();
        let id = app.add_task("Parent", None, Priority::Low, "work").unwrap();
        app.add_subtask(id, "Child");

        app.selected_index = 1;
        app.toggle_selected();
        let task = app.store.get(id).unwrap();
        assert!(task.subtasks[0].completed);
        assert!(!task.completed);

        app.delete_selected();
        assert!(app.store.get(id).unwrap().subtasks.is_empty());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_submit_form_rejects_bad_due_date() {
        let mut app = memory_app();
        app.start_add_task();
        if let Some(form) = app.input_form.as_mut() {
            form.text = "Dentist".to_string();
            form.due_date = "next tuesday".to_string();
        }
        app.submit_form();

        assert!(app.store.is_empty());
        assert!(app.input_form.as_ref().unwrap().error.is_some());
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        if let Some(form) = app.input_form.as_mut() {
            form.due_date = "2025-03-04".to_string();
        }
        app.submit_form();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_edit_form_updates_fields() {
        let mut app = memory_app();
        let id = app.add_task("Draft", None, Priority::Low, "work").unwrap();
        app.start_edit_task();
        if let Some(form) = app.input_form.as_mut() {
            form.text = "Final draft".to_string();
            form.field = FormField::Priority;
            form.cycle_choice();
        }
        app.submit_form();

        let task = app.store.get(id).unwrap();
        assert_eq!(task.text, "Final draft");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_category_choice_cycles_suggestions() {
        let mut form = InputFormState::new(FormTarget::NewTask);
        form.field = FormField::Category;
        form.cycle_choice();
        assert_eq!(form.category, "work");
        form.category = "custom".to_string();
        form.cycle_choice();
        assert_eq!(form.category, "personal");
    }

    #[test]
    fn test_template_adds_expanded_task() {
        let mut app = memory_app();
        app.open_template_picker();
        app.pick_template(0);

        assert_eq!(app.store.len(), 1);
        let template = templates::get(0).unwrap();
        assert_eq!(app.visible_rows().len(), 1 + template.subtasks.len());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_import_failure_leaves_state_untouched() {
        let temp_dir = tempdir().unwrap();
        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, "{\"not\": \"a list\"}").unwrap();

        let mut app = memory_app();
        app.add_task("Keep me", None, Priority::Low, "work");
        let before = app.store.clone();

        app.path_input = bad.display().to_string();
        app.submit_import();

        assert_eq!(app.store, before);
        assert_eq!(app.ui_mode, UiMode::Notice);
        assert!(app.notice.is_some());

        app.dismiss_notice();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_export_import_round_trip_and_timer_reset() {
        let temp_dir = tempdir().unwrap();
        let mut app = memory_app();
        let a = app.add_task("Alpha", NaiveDate::from_ymd_opt(2024, 4, 1), Priority::High, "work").unwrap();
        app.add_subtask(a, "step");
        app.toggle_timer(a);
        app.tick(Duration::from_secs(7));

        let path = app.export(Some(temp_dir.path().join("out.json").as_path())).unwrap();
        let exported = app.store.tasks().to_vec();

        let mut other = memory_app();
        other.add_task("Replaced", None, Priority::Low, "home");
        other.import(&path).unwrap();
        assert_eq!(other.store.tasks(), exported.as_slice());

        // Importing an empty document removes the timed task
        let empty = temp_dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        app.import(&empty).unwrap();
        assert!(app.store.is_empty());
        assert_eq!(app.timer.active(), None);
        assert!(app.expanded.is_empty());
    }

    /// Shared map whose first `set` fails
    struct FailOnceStore {
        values: Rc<RefCell<HashMap<String, String>>>,
        failed: bool,
    }

    impl KeyValueStore for FailOnceStore {
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
            if !self.failed {
                self.failed = true;
                return Err(PersistenceError::Write {
                    path: PathBuf::from(key),
                    source: anyhow::anyhow!("disk full"),
                });
            }
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_flush_retries_failed_save() {
        let values = Rc::new(RefCell::new(HashMap::new()));
        let store = FailOnceStore {
            values: Rc::clone(&values),
            failed: false,
        };
        let mut app = AppState::new(PersistenceBridge::new(Box::new(store)), std::env::temp_dir());

        app.add_task("Survive", None, Priority::Low, "work");
        assert!(app.save().is_err());
        assert!(!app.needs_save);
        assert!(values.borrow().get(TASKS_KEY).is_none());

        // Nothing changed since, but the exit flush still writes
        app.timer.stop();
        app.flush().unwrap();
        let stored = values.borrow().get(TASKS_KEY).cloned().unwrap();
        assert!(stored.contains("Survive"));

        // A clean flush with nothing pending writes nothing new
        values.borrow_mut().clear();
        app.flush().unwrap();
        assert!(values.borrow().is_empty());
    }

    #[test]
    fn test_add_after_importing_max_id() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("max.json");
        std::fs::write(
            &path,
            r#"[{"id": 9223372036854775807, "text": "Top", "createdAt": "2024-01-01T00:00:00Z",
                "subtasks": [{"id": 9223372036854775807, "text": "Last"}]}]"#,
        )
        .unwrap();

        let mut app = memory_app();
        assert_eq!(app.import(&path).unwrap(), 1);

        let id = app.add_task("Next", None, Priority::Low, "work").unwrap();
        assert_ne!(id, i64::MAX);
        assert!(app.add_subtask(i64::MAX, "Another").is_some());
        assert!(app.add_subtask(id, "Child").is_some());
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.get(i64::MAX).unwrap().subtasks.len(), 2);
    }

    #[test]
    fn test_save_persists_tasks_and_preference() {
        let temp_dir = tempdir().unwrap();
        let bridge = PersistenceBridge::new(Box::new(FileStore::new(temp_dir.path())));
        let mut app = AppState::new(bridge, temp_dir.path().to_path_buf());

        app.add_task("Persist me", None, Priority::Medium, "work");
        app.toggle_dark_mode();
        app.save().unwrap();
        assert!(!app.needs_save);
        assert!(temp_dir.path().join(format!("{}.json", DARK_MODE_KEY)).exists());

        let reopened = AppState::new(
            PersistenceBridge::new(Box::new(FileStore::new(temp_dir.path()))),
            temp_dir.path().to_path_buf(),
        );
        assert_eq!(reopened.store.tasks(), app.store.tasks());
        assert!(reopened.dark_mode);
    }
}
