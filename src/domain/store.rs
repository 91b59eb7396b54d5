use super::enums::{Priority, DEFAULT_CATEGORY};
use super::task::{fresh_id, SubtaskId, Task, TaskId};
use super::templates::TaskTemplate;
use chrono::{DateTime, NaiveDate, Utc};

/// Ordered collection of tasks.
///
/// Every mutation is total: blank text and unknown ids are ignored rather
/// than reported. Mutations return whether anything changed so the caller
/// knows when the collection needs to be persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing collection (loaded or imported)
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter().map(|t| t.id).max();
        Self { tasks, last_id }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> TaskId {
        let used: Vec<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        let id = fresh_id(now, self.last_id, &used);
        self.last_id = Some(id);
        id
    }

    /// Append a new task. Returns `None` when `text` is blank.
    pub fn add(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
        category: &str,
        now: DateTime<Utc>,
    ) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };

        let id = self.next_id(now);
        self.tasks.push(Task::new(
            id,
            text.to_string(),
            due_date,
            priority,
            category.to_string(),
            now,
        ));
        Some(id)
    }

    /// Append a task shaped by `template`, including its subtasks
    pub fn add_from_template(
        &mut self,
        template: &TaskTemplate,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Option<TaskId> {
        let id = self.add(template.text, due_date, template.priority, template.category, now)?;
        for subtask in template.subtasks {
            self.add_subtask(id, subtask, now);
        }
        Some(id)
    }

    pub fn toggle_complete(&mut self, id: TaskId, now: DateTime<Utc>) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.toggle_complete(now);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Flip `archived`; completion state is left alone
    pub fn archive(&mut self, id: TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.archived = !task.archived;
                true
            }
            None => false,
        }
    }

    /// Replace the text of a task. Blank replacements are ignored.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> bool {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return false;
        }
        match self.find_mut(id) {
            Some(task) if task.text != new_text => {
                task.text = new_text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Replace due date, priority and category. A blank category keeps the old one.
    pub fn update_details(
        &mut self,
        id: TaskId,
        due_date: Option<NaiveDate>,
        priority: Priority,
        category: &str,
    ) -> bool {
        let Some(task) = self.find_mut(id) else {
            return false;
        };

        let category = category.trim();
        let mut changed = false;
        if task.due_date != due_date {
            task.due_date = due_date;
            changed = true;
        }
        if task.priority != priority {
            task.priority = priority;
            changed = true;
        }
        if !category.is_empty() && task.category != category {
            task.category = category.to_string();
            changed = true;
        }
        changed
    }

    pub fn add_subtask(&mut self, task_id: TaskId, text: &str, now: DateTime<Utc>) -> Option<SubtaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = self.find_mut(task_id)?;
        Some(task.add_subtask(text.to_string(), now))
    }

    pub fn toggle_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> bool {
        match self.find_mut(task_id).and_then(|t| t.subtask_mut(subtask_id)) {
            Some(subtask) => {
                subtask.completed = !subtask.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> bool {
        let Some(task) = self.find_mut(task_id) else {
            return false;
        };
        let before = task.subtasks.len();
        task.subtasks.retain(|st| st.id != subtask_id);
        task.subtasks.len() != before
    }

    /// Add tracked minutes to a task (timer ticks)
    pub fn add_time(&mut self, id: TaskId, minutes: f64) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.time_spent += minutes;
                true
            }
            None => false,
        }
    }

    /// Replace the whole collection (import)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        *self = Self::from_tasks(tasks);
    }
}
