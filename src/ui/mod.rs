pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_import_prompt, render_notice, render_template_picker};
use ratatui::{widgets::Block, Frame};
use stats_pane::render_stats_pane;
use styles::background_style;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    f.render_widget(Block::default().style(background_style(app.dark_mode)), size);

    render_keybindings(f, app, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_stats_pane(f, app, layout.stats_area);
    render_status_line(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::AddingTask | UiMode::AddingSubtask | UiMode::EditingTask => {
            render_input_form(f, app, size)
        }
        UiMode::TemplatePicker => render_template_picker(f, app, size),
        UiMode::ImportPath => render_import_prompt(f, app, size),
        UiMode::Notice => render_notice(f, app, size),
        UiMode::Normal | UiMode::Searching => {}
    }
}
