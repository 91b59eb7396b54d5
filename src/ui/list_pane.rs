use crate::app::AppState;
use crate::domain::{format_clock, tree_connector, FlatRow, Subtask, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, overdue_style, priority_style, running_style,
    selected_style, tag_style, title_style, tree_style,
};
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x] "
    } else {
        "[ ] "
    }
}

/// Render the task list pane. The list scrolls to keep the selection visible.
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = app.visible_rows();
    let today = Local::now().date_naive();

    let items: Vec<ListItem> = rows
        .iter()
        .filter_map(|row| {
            let task = app.store.get(row.task_id)?;
            let line = match row.subtask_id {
                Some(st_id) => {
                    let subtask = task.subtasks.iter().find(|s| s.id == st_id)?;
                    create_subtask_line(subtask, row)
                }
                None => {
                    let clock = if app.timer.is_running_for(task.id) {
                        Some(app.timer.elapsed_secs())
                    } else {
                        None
                    };
                    let expanded = app.expanded.contains(&task.id);
                    create_task_line(task, today, expanded, clock)
                }
            };
            Some(ListItem::new(line))
        })
        .collect();

    let tasks_shown = rows.iter().filter(|r| r.subtask_id.is_none()).count();
    let title = format!(
        " Tasks ({}) - {} by {} ",
        tasks_shown,
        app.view.filter.name(),
        app.view.sort.name()
    );

    let list = List::new(items)
        .style(default_style(app.dark_mode))
        .highlight_style(selected_style(app.dark_mode))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.dark_mode))
                .title(Span::styled(title, title_style(app.dark_mode))),
        );

    let selected = if rows.is_empty() {
        None
    } else {
        Some(app.selected_index)
    };
    let mut state = ListState::default().with_selected(selected);

    f.render_stateful_widget(list, area, &mut state);
}

/// Format: ▸ [ ] Buy milk  !low  #shopping  📅 2024-01-01 OVERDUE  ⏱ 00:42  (1/3)
fn create_task_line(
    task: &Task,
    today: NaiveDate,
    expanded: bool,
    clock: Option<u64>,
) -> Line<'static> {
    let mut spans = Vec::new();

    let marker = match (task.subtasks.is_empty(), expanded) {
        (true, _) => "  ",
        (false, true) => "▾ ",
        (false, false) => "▸ ",
    };
    spans.push(Span::raw(marker.to_string()));
    spans.push(Span::raw(checkbox(task.completed).to_string()));

    if task.completed {
        spans.push(Span::styled(task.text.clone(), done_style()));
    } else {
        spans.push(Span::raw(task.text.clone()));
    }

    spans.push(Span::raw("  ".to_string()));
    spans.push(Span::styled(
        format!("!{}", task.priority.to_tag()),
        priority_style(task.priority),
    ));
    spans.push(Span::styled(format!("  #{}", task.category), tag_style()));

    if let Some(due) = task.due_date {
        spans.push(Span::raw(format!("  📅 {}", due)));
        if task.is_overdue(today) {
            spans.push(Span::styled(" OVERDUE".to_string(), overdue_style()));
        }
    }

    if let Some(secs) = clock {
        spans.push(Span::styled(format!("  ⏱ {}", format_clock(secs)), running_style()));
    } else if task.time_spent > 0.0 {
        spans.push(Span::raw(format!("  ⏱ {}", task.time_spent_formatted())));
    }

    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        spans.push(Span::raw(format!("  ({}/{})", done, total)));
    }

    if task.archived {
        spans.push(Span::styled("  [archived]".to_string(), tree_style()));
    }

    Line::from(spans)
}

fn create_subtask_line(subtask: &Subtask, row: &FlatRow) -> Line<'static> {
    let text = if subtask.completed {
        Span::styled(subtask.text.clone(), done_style())
    } else {
        Span::raw(subtask.text.clone())
    };

    Line::from(vec![
        Span::styled("     ".repeat(row.depth), tree_style()),
        Span::styled(tree_connector(row.is_last).to_string(), tree_style()),
        Span::raw(" ".to_string()),
        Span::raw(checkbox(subtask.completed).to_string()),
        text,
    ])
}
