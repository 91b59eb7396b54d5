use crate::app::AppState;
use crate::domain::{templates, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::AddingSubtask | UiMode::EditingTask => {
            handle_input_form_mode(app, key)
        }
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::TemplatePicker => handle_template_picker_mode(app, key),
        UiMode::ImportPath => handle_import_path_mode(app, key),
        UiMode::Notice => handle_notice_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    app.status_message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => app.start_add_task(),
            KeyCode::Char('f') => app.start_search(),
            KeyCode::Char('d') => app.toggle_dark_mode(),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Complete task or subtask
        KeyCode::Char(' ') => app.toggle_selected(),

        // Start/stop timer
        KeyCode::Enter => app.toggle_timer_selected(),

        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('s') => app.start_add_subtask(),
        KeyCode::Char('e') => app.start_edit_task(),
        KeyCode::Char('T') => app.open_template_picker(),

        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('r') => app.archive_selected(),

        // Expand/collapse subtasks
        KeyCode::Tab => app.toggle_expand_selected(),

        // View
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('o') => app.cycle_sort(),
        KeyCode::Char('/') => app.start_search(),

        KeyCode::Char('x') => app.export_now(),
        KeyCode::Char('i') => app.start_import(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys in input form mode (adding/editing task, adding subtask)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab => {
            if let Some(form) = app.input_form.as_mut() {
                form.next_field();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            if let Some(form) = app.input_form.as_mut() {
                form.cycle_choice();
            }
        }
        KeyCode::Backspace => {
            if let Some(buffer) = app.input_form.as_mut().and_then(|f| f.active_buffer()) {
                buffer.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.input_form.as_mut() {
                form.error = None;
                match form.active_buffer() {
                    Some(buffer) => buffer.push(c),
                    // Priority field: space cycles
                    None if c == ' ' => form.cycle_choice(),
                    None => {}
                }
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Live search: every keystroke re-derives the view
fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.ui_mode = UiMode::Normal,
        KeyCode::Esc => {
            app.set_search(String::new());
            app.ui_mode = UiMode::Normal;
        }
        KeyCode::Backspace => {
            let mut term = app.view.search.clone();
            term.pop();
            app.set_search(term);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut term = app.view.search.clone();
            term.push(c);
            app.set_search(term);
        }
        _ => {}
    }
    Ok(false)
}

/// Number keys pick a template
fn handle_template_picker_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let index = c as usize - '1' as usize;
            if index < templates::all().len() {
                app.pick_template(index);
            }
        }
        KeyCode::Esc => app.ui_mode = UiMode::Normal,
        _ => {}
    }
    Ok(false)
}

fn handle_import_path_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_import(),
        KeyCode::Esc => app.ui_mode = UiMode::Normal,
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.path_input.push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_notice_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_notice();
    }
    Ok(false)
}
