use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::view_state::SimulatedState;
use crate::app::{AppState, InputMode, ModalState, Screen};
use crate::search::{SortField, SortKey};
use crate::ui;

/// Draw, read input, advance timers; until the user quits.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key, Instant::now());
                }
                Event::FocusGained => app.on_focus_gained(Instant::now()),
                _ => {}
            }
        }
        app.tick(Instant::now());
    }
    Ok(())
}

/// Route one key press according to screen and input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    match app.screen {
        Screen::Login => handle_login_key(app, key.code, now),
        Screen::Dashboard => match app.input_mode {
            InputMode::Normal => {
                if let Some(action) = app.keymap.resolve(&key) {
                    handle_action(app, action);
                }
            }
            InputMode::Search => handle_search_key(app, key, now),
            InputMode::Modal => handle_modal_key(app, key.code),
        },
    }
}

fn handle_login_key(app: &mut AppState, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_account(-1),
        KeyCode::Down | KeyCode::Char('j') => app.select_account(1),
        KeyCode::Enter => app.begin_login(now),
        _ => {}
    }
}

pub fn handle_action(app: &mut AppState, action: KeyAction) {
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::StartSearch => app.start_search(),
        KeyAction::EnterAction => app.open_details(),
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.page(-1),
        KeyAction::PageDown => app.page(1),
        KeyAction::OpenSortMenu => app.open_sort_menu(),
        KeyAction::ToggleSortOrder => app.toggle_sort_order(),
        KeyAction::SwitchView => app.toggle_view_mode(),
        KeyAction::SimulateLoading => app.set_simulated(SimulatedState::Loading),
        KeyAction::SimulateError => app.set_simulated(SimulatedState::Error),
        KeyAction::SimulateEmpty => app.set_simulated(SimulatedState::Empty),
        KeyAction::SimulateReset => app.set_simulated(SimulatedState::Normal),
        KeyAction::Retry => app.retry(),
        KeyAction::Logout => app.logout(),
        KeyAction::Ignore => {}
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Enter => app.search_submit(),
        KeyCode::Esc => app.search_clear(),
        KeyCode::Backspace => app.search_pop(now),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_push(c, now)
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(modal) = app.modal.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match modal {
        ModalState::SortMenu { selected } => {
            let count = SortField::all().len();
            match code {
                KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    *selected = (*selected + 1).min(count - 1);
                }
                KeyCode::Enter => {
                    let field = SortField::all()[(*selected).min(count - 1)];
                    app.close_modal();
                    app.change_sort_field(field);
                }
                KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
                _ => {}
            }
        }
        ModalState::Help { scroll } => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.close_modal()
            }
            _ => {}
        },
        ModalState::UserDetails { .. } | ModalState::Info { .. } => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.close_modal();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::api::{FetchError, UserSource};
    use crate::model::User;
    use std::sync::Arc;

    struct NoUsers;

    impl UserSource for NoUsers {
        fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard() -> AppState {
        let config = AppConfig {
            skip_login: true,
            ..AppConfig::default()
        };
        AppState::new(config, Arc::new(NoUsers))
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = dashboard();
        app.start_search();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn typing_in_search_does_not_trigger_bindings() {
        let mut app = dashboard();
        let now = Instant::now();
        handle_key(&mut app, press(KeyCode::Char('/')), now);
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "qx".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)), now);
        }
        assert!(!app.should_quit);
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.search_draft, "qx");
    }

    #[test]
    fn sort_menu_selects_field() {
        let mut app = dashboard();
        let now = Instant::now();
        handle_key(&mut app, press(KeyCode::Char('s')), now);
        assert!(matches!(app.modal, Some(ModalState::SortMenu { selected: 0 })));
        handle_key(&mut app, press(KeyCode::Down), now);
        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.listing.sort_config().field, SortField::Email);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn simulator_keys_set_override() {
        let mut app = dashboard();
        handle_key(&mut app, press(KeyCode::Char('2')), Instant::now());
        assert_eq!(app.simulated, SimulatedState::Error);
        handle_key(&mut app, press(KeyCode::Char('0')), Instant::now());
        assert_eq!(app.simulated, SimulatedState::Normal);
    }
}
