use serde::{Deserialize, Serialize};

/// Task priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank (higher sorts first)
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Cycle low -> medium -> high -> low (used by the input form)
    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Suggested categories offered by the input form. Any string is accepted.
pub const SUGGESTED_CATEGORIES: &[&str] = &["personal", "work", "shopping", "health"];

/// Category a new task gets when none is given
pub const DEFAULT_CATEGORY: &str = "personal";

/// Mutually exclusive status partition of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Archived,
}

impl StatusFilter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::Archived,
            Self::Archived => Self::All,
        }
    }
}

/// Ordering applied to the derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Ascending due date, undated tasks last
    #[default]
    Date,
    /// High before medium before low
    Priority,
    /// Alphabetical by category
    Category,
    /// Newest first
    Created,
}

impl SortKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Priority => "Priority",
            Self::Category => "Category",
            Self::Created => "Created",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Date => Self::Priority,
            Self::Priority => Self::Category,
            Self::Category => Self::Created,
            Self::Created => Self::Date,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    AddingSubtask,
    EditingTask,
    Searching,
    TemplatePicker,
    ImportPath,
    Notice, // Blocking notification until dismissed
}
