use crate::app::{AppState, FormField, FormTarget, InputFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn form_title(form: &InputFormState) -> &'static str {
    match form.target {
        FormTarget::NewTask => " Add Task ",
        FormTarget::EditTask(_) => " Edit Task ",
        FormTarget::NewSubtask(_) => " Add Subtask ",
    }
}

/// Label line plus "> value█" line for one field
fn field_lines(label: &str, value: &str, active: bool) -> [Line<'static>; 2] {
    let label = if active {
        format!("{} (editing)", label)
    } else {
        label.to_string()
    };
    let cursor = if active {
        Span::styled("█", modal_title_style())
    } else {
        Span::raw("")
    };
    [
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            cursor,
        ]),
    ]
}

/// Render the input form for adding/editing tasks and adding subtasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else { return };

    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.extend(field_lines("Text:", &form.text, form.field == FormField::Text));

    if !form.is_subtask() {
        lines.extend(field_lines(
            "Due date (YYYY-MM-DD, blank for none):",
            &form.due_date,
            form.field == FormField::DueDate,
        ));
        lines.extend(field_lines(
            "Priority (←/→):",
            form.priority.to_tag(),
            form.field == FormField::Priority,
        ));
        lines.extend(field_lines(
            "Category (type or ←/→):",
            &form.category,
            form.field == FormField::Category,
        ));
    }
    lines.push(Line::raw(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), error_style())));
    }

    let hint = if form.is_subtask() {
        "Enter to submit  ·  Esc to cancel"
    } else {
        "Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"
    };
    lines.push(Line::raw(hint));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(form_title(form), modal_title_style()))
                .style(modal_bg_style(app.dark_mode)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
