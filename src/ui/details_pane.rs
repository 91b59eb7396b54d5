use crate::app::AppState;
use crate::domain::format_clock;
use crate::ui::styles::{
    border_style, default_style, done_style, overdue_style, running_style, title_style,
};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let dark = app.dark_mode;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(dark))
        .title(Span::styled(" Details ", title_style(dark)));

    let Some(task) = app.selected_task() else {
        let empty = Paragraph::new("No task selected")
            .style(default_style(dark))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Task: ", title_style(dark)),
        Span::raw(task.text.clone()),
    ]));
    lines.push(Line::raw(""));

    let status = if task.archived {
        "archived"
    } else if task.completed {
        "completed"
    } else {
        "active"
    };
    lines.push(Line::from(vec![
        Span::styled("Status:   ", title_style(dark)),
        Span::raw(status),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Priority: ", title_style(dark)),
        Span::raw(task.priority.to_tag()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Category: ", title_style(dark)),
        Span::raw(task.category.clone()),
    ]));

    let due = match task.due_date {
        Some(due) if task.is_overdue(today) => {
            Span::styled(format!("{} (overdue)", due), overdue_style())
        }
        Some(due) => Span::raw(due.to_string()),
        None => Span::raw("-"),
    };
    lines.push(Line::from(vec![Span::styled("Due:      ", title_style(dark)), due]));

    let created = task.created_at.with_timezone(&Local);
    lines.push(Line::from(vec![
        Span::styled("Created:  ", title_style(dark)),
        Span::raw(created.format("%Y-%m-%d %H:%M").to_string()),
    ]));
    if let Some(done_at) = task.completed_at {
        lines.push(Line::from(vec![
            Span::styled("Done:     ", title_style(dark)),
            Span::raw(done_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }

    // Tracked time, plus the live clock when this task is being timed
    let mut time_spans = vec![
        Span::styled("Time:     ", title_style(dark)),
        Span::raw(task.time_spent_formatted()),
    ];
    if app.timer.is_running_for(task.id) {
        time_spans.push(Span::styled(
            format!("  (running {})", format_clock(app.timer.elapsed_secs())),
            running_style(),
        ));
    }
    lines.push(Line::from(time_spans));
    lines.push(Line::raw(""));

    if task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "Subtasks: (none)",
            default_style(dark),
        )));
    } else {
        let (done, total) = task.subtask_progress();
        lines.push(Line::from(Span::styled(
            format!("Subtasks: {}/{}", done, total),
            title_style(dark),
        )));
        for subtask in &task.subtasks {
            let line = if subtask.completed {
                Line::from(Span::styled(format!("  [x] {}", subtask.text), done_style()))
            } else {
                Line::raw(format!("  [ ] {}", subtask.text))
            };
            lines.push(line);
        }
    }

    let paragraph = Paragraph::new(lines)
        .style(default_style(dark))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
