use crate::domain::Priority;
use ratatui::style::{Color, Modifier, Style};

/// Whole-screen background and text for the active theme
pub fn background_style(dark: bool) -> Style {
    if dark {
        Style::default().bg(Color::Black).fg(Color::White)
    } else {
        Style::default().bg(Color::White).fg(Color::Black)
    }
}

/// Default text style
pub fn default_style(dark: bool) -> Style {
    if dark {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Black)
    }
}

/// Selected row highlight style
pub fn selected_style(dark: bool) -> Style {
    let bg = if dark { Color::LightCyan } else { Color::Blue };
    let fg = if dark { Color::Black } else { Color::White };
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}

/// Timer clock on the task being timed
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Overdue due-date badge
pub fn overdue_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Tree connector style (for subtasks)
pub fn tree_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Title style for panes
pub fn title_style(dark: bool) -> Style {
    let fg = if dark { Color::Cyan } else { Color::Blue };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style(dark: bool) -> Style {
    if dark {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Modal background style
pub fn modal_bg_style(dark: bool) -> Style {
    if dark {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default().bg(Color::Gray).fg(Color::Black)
    }
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style(dark: bool) -> Style {
    if dark {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Completion gauge style
pub fn gauge_style(dark: bool) -> Style {
    let bg = if dark { Color::DarkGray } else { Color::Gray };
    Style::default().fg(Color::Green).bg(bg)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Category badge style
pub fn tag_style() -> Style {
    Style::default().fg(Color::Blue)
}

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}
