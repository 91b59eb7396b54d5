use crate::app::AppState;
use crate::domain::templates;
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

fn draw_modal(f: &mut Frame, app: &AppState, area: Rect, title: String, lines: Vec<Line>) {
    let modal_area = create_modal_area(area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style(app.dark_mode)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render a blocking notice (import/export failures)
pub fn render_notice(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(notice) = &app.notice else { return };

    let mut lines = vec![Line::raw("")];
    for text in notice.message.lines() {
        lines.push(Line::from(Span::styled(format!("  {}", text), error_style())));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", modal_title_style()),
        Span::raw(" OK"),
    ]));

    draw_modal(f, app, area, format!(" {} ", notice.title), lines);
}

/// Render the template picker
pub fn render_template_picker(f: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = vec![Line::raw(""), Line::raw("  Create a task from a template:"), Line::raw("")];

    for (idx, template) in templates::all().iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", idx + 1), modal_title_style()),
            Span::raw(format!(
                "{} ({} / {}, {} subtasks)",
                template.name,
                template.priority.to_tag(),
                template.category,
                template.subtasks.len()
            )),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  [Esc]", modal_title_style()),
        Span::raw(" Cancel"),
    ]));

    draw_modal(f, app, area, " Templates ".to_string(), lines);
}

/// Render the import path prompt
pub fn render_import_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("  Path of the JSON document to import."),
        Line::raw("  All current tasks will be replaced."),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  > "),
            Span::styled(app.path_input.clone(), modal_title_style()),
            Span::styled("█", modal_title_style()),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [Enter]", modal_title_style()),
            Span::raw(" Import  "),
            Span::styled("[Esc]", modal_title_style()),
            Span::raw(" Cancel"),
        ]),
    ];

    draw_modal(f, app, area, " Import Tasks ".to_string(), lines);
}
