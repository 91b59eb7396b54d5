pub mod enums;
pub mod store;
pub mod task;
pub mod templates;
pub mod views;

pub use enums::{Priority, SortKey, StatusFilter, UiMode, DEFAULT_CATEGORY, SUGGESTED_CATEGORIES};
pub use store::TaskStore;
pub use task::{format_clock, format_minutes, Subtask, SubtaskId, Task, TaskId};
pub use templates::TaskTemplate;
pub use views::{compute_stats, derive_view, flatten_tasks, tree_connector, FlatRow, TaskStats, ViewConfig};
