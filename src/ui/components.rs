//! Shared UI components (bars, side panel, dialogs).
//!
//! Everything drawn around the users panel lives here; the panel itself is
//! in `users.rs`.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::view_state::SimulatedState;
use crate::app::{AppState, InputMode, ModalState};
use crate::search::{SortField, SortKey};
use std::collections::{BTreeMap, BTreeSet};

fn bordered<'a>(app: &AppState, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Top bar: product name and the logged-in account.
pub fn render_navbar(f: &mut Frame, area: Rect, app: &AppState) {
    let who = match app.session.user() {
        Some(account) => format!("{} <{}> · {}", account.name, account.email, account.role),
        None => "guest".to_string(),
    };
    let logout = app
        .keymap
        .key_for(KeyAction::Logout)
        .map(|k| format!("  [{k}] logout"))
        .unwrap_or_default();
    let line = Line::from(vec![
        Span::styled(
            "User Directory",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::raw(who),
        Span::styled(logout, Style::default().fg(app.theme.muted)),
    ]);
    let p = Paragraph::new(line)
        .block(bordered(app, "userdeck"))
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

/// Debug strip showing which simulated state is forced.
pub fn render_simulator_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let options = [
        (SimulatedState::Loading, KeyAction::SimulateLoading),
        (SimulatedState::Error, KeyAction::SimulateError),
        (SimulatedState::Empty, KeyAction::SimulateEmpty),
        (SimulatedState::Normal, KeyAction::SimulateReset),
    ];
    let mut spans = Vec::new();
    for (state, action) in options {
        let key = app.keymap.key_for(action).unwrap_or_else(|| "-".to_string());
        let style = if app.simulated == state {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(app.theme.text)
        };
        spans.push(Span::styled(format!(" {key}:{} ", state.label()), style));
        spans.push(Span::raw(" "));
    }
    let p = Paragraph::new(Line::from(spans)).block(bordered(app, "Simulate state"));
    f.render_widget(p, area);
}

/// Search prompt, sort and layout indicators.
pub fn render_toolbar(f: &mut Frame, area: Rect, app: &AppState) {
    let cfg = app.listing.sort_config();
    let searching = app.input_mode == InputMode::Search;
    let term = if searching {
        format!("{}▏", app.search_draft)
    } else if app.listing.search_term().is_empty() {
        "(press / to search)".to_string()
    } else {
        app.listing.search_term().to_string()
    };
    let term_style = if searching {
        Style::default().fg(app.theme.highlight_fg)
    } else {
        Style::default().fg(app.theme.muted)
    };
    let line = Line::from(vec![
        Span::raw("Search: "),
        Span::styled(term, term_style),
        Span::raw("   Sort: "),
        Span::styled(
            format!("{} {}", cfg.field.label(), cfg.order.arrow()),
            Style::default().fg(app.theme.accent),
        ),
        Span::raw("   View: "),
        Span::styled(app.view_mode.as_str(), Style::default().fg(app.theme.accent)),
    ]);
    f.render_widget(Paragraph::new(line).block(bordered(app, "Filter")), area);
}

/// Render the bottom status bar with mode and fetch status.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let fetch = if app.cache.is_fetching() {
        "fetching".to_string()
    } else {
        match app.cache.updated_at() {
            Some(at) => format!("updated {}s ago", at.elapsed().as_secs()),
            None => "not loaded".to_string(),
        }
    };
    let pending = if app.debouncer.is_pending() { "  (typing)" } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}/{}  {fetch}{pending}  ?: help  K: keys",
        app.listing.filtered_count(),
        app.listing.total_count(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the right-side keybinds viewer with grouped sections.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = bordered(app, "Keybindings");
    let inner = block.inner(area);

    let mut general: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut simulator: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut general, "Quit"),
            KeyAction::OpenHelp => (&mut general, "Help"),
            KeyAction::ToggleKeybindsPane => (&mut general, "Toggle this pane"),
            KeyAction::StartSearch => (&mut general, "Search"),
            KeyAction::EnterAction => (&mut general, "User details"),
            KeyAction::OpenSortMenu => (&mut general, "Sort by"),
            KeyAction::ToggleSortOrder => (&mut general, "Flip order"),
            KeyAction::SwitchView => (&mut general, "Table / cards"),
            KeyAction::Logout => (&mut general, "Logout"),
            KeyAction::MoveUp => (&mut navigation, "Move up"),
            KeyAction::MoveDown => (&mut navigation, "Move down"),
            KeyAction::PageUp => (&mut navigation, "Page up"),
            KeyAction::PageDown => (&mut navigation, "Page down"),
            KeyAction::SimulateLoading => (&mut simulator, "Loading"),
            KeyAction::SimulateError => (&mut simulator, "Error"),
            KeyAction::SimulateEmpty => (&mut simulator, "Empty"),
            KeyAction::SimulateReset => (&mut simulator, "Normal"),
            KeyAction::Retry => (&mut simulator, "Retry fetch"),
            KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let col1_w = general
        .keys()
        .chain(navigation.keys())
        .chain(simulator.keys())
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .min((inner.width as usize).saturating_sub(11));

    let mut lines: Vec<Line> = Vec::new();
    for (heading, entries) in [
        ("General:", &general),
        ("Navigation:", &navigation),
        ("Simulator:", &simulator),
    ] {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, keys) in entries {
            let lbl: String = label.chars().take(col1_w).collect();
            let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
            lines.push(Line::from(vec![
                Span::raw(format!("  {lbl:>col1_w$} │ ")),
                Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
            ]));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 48u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1)
            + message.lines().count() as u16;
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 3).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(bordered(app, "Info"));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Column picker; the current column shows its direction arrow.
pub fn render_sort_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let fields = SortField::all();
    let rect = centered_rect(34, fields.len() as u16 + 4, area);
    let cfg = app.listing.sort_config();
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in fields.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        let arrow = if *field == cfg.field { cfg.order.arrow() } else { "" };
        let style = if idx == selected {
            Style::default().fg(app.theme.highlight_fg)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {} {arrow}", field.label()),
            style,
        )));
    }
    lines.push(Line::from(Span::styled(
        "Same column again flips order",
        Style::default().fg(app.theme.muted),
    )));
    let p = Paragraph::new(lines).block(bordered(app, "Sort by"));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with usage notes and key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |action: KeyAction| app.keymap.key_for(action).unwrap_or_else(|| "-".into());
    let tip = |label: &'static str, keys: String| {
        Line::from(vec![
            Span::raw(label),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = vec![
        Line::from(Span::styled("Browsing", bold)),
        tip("Move: ", "Up/Down, j/k; PageUp/PageDown, Left/Right".to_string()),
        tip("User details: ", key(KeyAction::EnterAction)),
        tip("Table / cards: ", key(KeyAction::SwitchView)),
        Line::raw(""),
        Line::from(Span::styled("Search", bold)),
        tip("Start: ", key(KeyAction::StartSearch)),
        Line::raw("Matches name, email, username, company and city."),
        Line::raw("Results update shortly after you stop typing."),
        tip("Apply now: ", "Enter".to_string()),
        tip("Clear: ", "Esc".to_string()),
        Line::raw(""),
        Line::from(Span::styled("Sorting", bold)),
        tip("Pick column: ", key(KeyAction::OpenSortMenu)),
        Line::raw("Picking the current column again flips the order."),
        tip("Flip order: ", key(KeyAction::ToggleSortOrder)),
        Line::raw(""),
        Line::from(Span::styled("Simulator", bold)),
        tip("Loading / error / empty: ", format!(
            "{} / {} / {}",
            key(KeyAction::SimulateLoading),
            key(KeyAction::SimulateError),
            key(KeyAction::SimulateEmpty)
        )),
        tip("Back to real data: ", key(KeyAction::SimulateReset)),
        tip("Retry fetch: ", key(KeyAction::Retry)),
        Line::raw(""),
        tip("Keybindings pane: ", key(KeyAction::ToggleKeybindsPane)),
        tip("Logout: ", key(KeyAction::Logout)),
        tip("Quit: ", key(KeyAction::Quit)),
        Line::raw(""),
        tip("Close help: ", "Esc / Enter".to_string()),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(bordered(app, "Help"));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
