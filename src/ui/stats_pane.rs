use crate::app::AppState;
use crate::domain::{format_minutes, TaskStats};
use crate::ui::styles::{border_style, default_style, gauge_style, overdue_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Gauge percent, clamped to what the widget accepts
fn gauge_percent(stats: &TaskStats) -> u16 {
    stats.completion_rate.round().clamp(0.0, 100.0) as u16
}

/// Render the stats pane: completion gauge plus counters
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let dark = app.dark_mode;
    let stats = app.stats();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(dark))
        .title(Span::styled(" Progress ", title_style(dark)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(gauge_style(dark))
        .percent(gauge_percent(&stats))
        .label(format!("{:.0}% complete", stats.completion_rate));
    f.render_widget(gauge, chunks[0]);

    let total_minutes: f64 = app
        .store
        .tasks()
        .iter()
        .filter(|t| !t.archived)
        .map(|t| t.time_spent)
        .sum();

    let overdue = if stats.overdue > 0 {
        Span::styled(stats.overdue.to_string(), overdue_style())
    } else {
        Span::raw("0")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Total: ", title_style(dark)),
            Span::raw(format!("{}   ", stats.total)),
            Span::styled("Completed: ", title_style(dark)),
            Span::raw(format!("{}   ", stats.completed)),
            Span::styled("Active: ", title_style(dark)),
            Span::raw(format!("{}", stats.total - stats.completed)),
        ]),
        Line::from(vec![
            Span::styled("Overdue: ", title_style(dark)),
            overdue,
            Span::raw("   "),
            Span::styled("High priority open: ", title_style(dark)),
            Span::raw(stats.high_priority_open.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Time tracked: ", title_style(dark)),
            Span::raw(format_minutes(total_minutes)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).style(default_style(dark)), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(rate: f64) -> TaskStats {
        TaskStats {
            total: 3,
            completed: 1,
            overdue: 0,
            high_priority_open: 0,
            completion_rate: rate,
        }
    }

    #[test]
    fn test_gauge_percent() {
        assert_eq!(gauge_percent(&stats(33.333)), 33);
        assert_eq!(gauge_percent(&stats(66.7)), 67);
        assert_eq!(gauge_percent(&stats(0.0)), 0);
        assert_eq!(gauge_percent(&stats(100.0)), 100);
    }
}
