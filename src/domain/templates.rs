use super::enums::Priority;

/// A predefined task shape offered for quick creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub name: &'static str,
    pub text: &'static str,
    pub priority: Priority,
    pub category: &'static str,
    pub subtasks: &'static [&'static str],
}

const TEMPLATES: &[TaskTemplate] = &[
    TaskTemplate {
        name: "Weekly review",
        text: "Weekly review",
        priority: Priority::Medium,
        category: "work",
        subtasks: &["Clear inbox", "Review calendar", "Plan next week"],
    },
    TaskTemplate {
        name: "Grocery run",
        text: "Grocery shopping",
        priority: Priority::Low,
        category: "shopping",
        subtasks: &["Check pantry", "Write list"],
    },
    TaskTemplate {
        name: "Workout",
        text: "Workout session",
        priority: Priority::Medium,
        category: "health",
        subtasks: &["Warm up", "Main set", "Stretch"],
    },
    TaskTemplate {
        name: "Bug fix",
        text: "Fix reported bug",
        priority: Priority::High,
        category: "work",
        subtasks: &["Reproduce", "Write failing test", "Fix", "Ship"],
    },
];

/// All built-in templates, in picker order
pub fn all() -> &'static [TaskTemplate] {
    TEMPLATES
}

/// Template by picker index
pub fn get(index: usize) -> Option<&'static TaskTemplate> {
    TEMPLATES.get(index)
}
