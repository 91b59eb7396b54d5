use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{error_style, hint_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Hints for the current mode
fn hints_for(mode: UiMode) -> &'static [&'static str] {
    match mode {
        UiMode::Normal => &[
            "↑/↓ select",
            "Space done",
            "Enter timer",
            "^N/a add",
            "s subtask",
            "e edit",
            "d delete",
            "r archive",
            "Tab expand",
            "f filter",
            "o sort",
            "^F search",
            "T template",
            "x export",
            "i import",
            "^D theme",
            "q quit",
        ],
        UiMode::AddingTask | UiMode::EditingTask => &[
            "Tab next field",
            "←/→ cycle choice",
            "Enter save",
            "Esc cancel",
        ],
        UiMode::AddingSubtask => &["Enter save", "Esc cancel"],
        UiMode::Searching => &["type to filter", "Enter keep", "Esc clear"],
        UiMode::TemplatePicker => &["1-9 pick", "Esc cancel"],
        UiMode::ImportPath => &["Enter import", "Esc cancel"],
        UiMode::Notice => &["Enter dismiss"],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = hints_for(app.ui_mode)
        .iter()
        .map(|h| Span::raw(format!(" {}  ", h)))
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(Line::from(hints)).style(hint_style(app.dark_mode));
    f.render_widget(paragraph, area);
}

/// Render the status line: view settings on the left, last message after
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(" Filter: ", title_style(app.dark_mode)),
        Span::raw(app.view.filter.name()),
        Span::styled("  Sort: ", title_style(app.dark_mode)),
        Span::raw(app.view.sort.name()),
    ];

    if !app.view.search.is_empty() || app.ui_mode == UiMode::Searching {
        spans.push(Span::styled("  Search: ", title_style(app.dark_mode)));
        spans.push(Span::raw(app.view.search.clone()));
        if app.ui_mode == UiMode::Searching {
            spans.push(Span::raw("█"));
        }
    }

    if let Some(message) = &app.status_message {
        spans.push(Span::raw("   "));
        let style = if message.starts_with("Failed") {
            error_style()
        } else {
            hint_style(app.dark_mode)
        };
        spans.push(Span::styled(message.clone(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_hints() {
        for mode in [
            UiMode::Normal,
            UiMode::AddingTask,
            UiMode::AddingSubtask,
            UiMode::EditingTask,
            UiMode::Searching,
            UiMode::TemplatePicker,
            UiMode::ImportPath,
            UiMode::Notice,
        ] {
            assert!(!hints_for(mode).is_empty());
        }
    }
}
