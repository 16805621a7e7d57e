pub mod components;
pub mod login;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::view_state::ViewState;
use crate::app::{AppState, ModalState, Screen, ViewMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    match app.screen {
        Screen::Login => login::render_login(f, area, app),
        Screen::Dashboard => render_dashboard(f, app),
    }
    if app.modal.is_some() {
        render_modal(f, area, app);
    }
}

fn render_dashboard(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    components::render_navbar(f, root[0], app);
    components::render_simulator_bar(f, root[1], app);
    components::render_toolbar(f, root[2], app);

    let body = if app.show_keybinds {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(root[3]);
        components::render_keybinds_panel(f, cols[1], app);
        cols[0]
    } else {
        root[3]
    };
    render_users_panel(f, body, app);

    components::render_status_bar(f, root[4], app);
}

fn render_users_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    let state = app.view_state();
    match &state {
        ViewState::Loading => users::render_loading(f, area, app),
        ViewState::Error => users::render_error(f, area, app),
        ViewState::Empty | ViewState::NoResults => users::render_empty(f, area, app, &state),
        ViewState::Content { summary } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(3)])
                .split(area);
            users::render_summary(f, parts[0], app, summary);
            match app.view_mode {
                ViewMode::Table => users::render_users_table(f, parts[1], app),
                ViewMode::Cards => users::render_user_cards(f, parts[1], app),
            }
        }
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = &app.modal else {
        return;
    };
    match state {
        ModalState::UserDetails { user } => users::render_user_details_modal(f, area, app, user),
        ModalState::SortMenu { selected } => components::render_sort_modal(f, area, app, *selected),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
        ModalState::Info { .. } => components::render_info_modal(f, area, app, state),
    }
}
