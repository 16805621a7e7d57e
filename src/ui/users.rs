use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, ViewMode};
use crate::app::view_state::{EMPTY_MESSAGE, ERROR_MESSAGE, NO_RESULTS_MESSAGE, ViewState};
use crate::model::User;
use crate::search::{SortField, SortKey};

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 7;
const SKELETON_ROWS: usize = 5;

fn panel<'a>(app: &AppState, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Start of the page containing `selected`.
fn page_start(selected: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    (selected / per_page) * per_page
}

pub fn render_summary(f: &mut Frame, area: Rect, app: &AppState, summary: &str) {
    let p = Paragraph::new(summary.to_string()).style(Style::default().fg(app.theme.muted));
    f.render_widget(p, area);
}

fn header_label(app: &AppState, field: SortField) -> String {
    let cfg = app.listing.sort_config();
    if cfg.field == field {
        format!("{} {}", field.label().to_uppercase(), cfg.order.arrow())
    } else {
        field.label().to_uppercase()
    }
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = app.visible_users();
    let start = page_start(app.selected_index, app.rows_per_page);
    let end = (start + app.rows_per_page).min(users.len());
    let slice = &users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.username.clone()),
            Cell::from(u.company.name.clone()),
            Cell::from(u.address.city.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(26),
        Constraint::Percentage(16),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
    ];
    let header = Row::new(
        SortField::all()
            .iter()
            .map(|field| Cell::from(header_label(app, *field)))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = format!("Users ({})", users.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, &title))
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_cards(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = panel(app, "Users");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let per_row = (inner.width / CARD_WIDTH).max(1) as usize;
    let rows_visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    app.rows_per_page = per_row * rows_visible;

    let users = app.visible_users();
    let start = page_start(app.selected_index, app.rows_per_page);
    let end = (start + app.rows_per_page).min(users.len());

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows_visible])
        .split(inner);
    for (n, chunk) in users[start..end].chunks(per_row).enumerate() {
        let Some(row_area) = row_areas.get(n) else {
            break;
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(*row_area);
        for (m, user) in chunk.iter().enumerate() {
            let selected = start + n * per_row + m == app.selected_index;
            render_card(f, cells[m], app, user, selected);
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, app: &AppState, user: &User, selected: bool) {
    let border = if selected {
        Style::default()
            .fg(app.theme.highlight_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.border)
    };
    let muted = Style::default().fg(app.theme.muted);
    let lines = vec![
        Line::from(Span::styled(
            format!("@{}", user.username),
            Style::default().fg(app.theme.accent),
        )),
        Line::from(user.email.clone()),
        Line::from(vec![Span::styled("Company: ", muted), Span::raw(user.company.name.clone())]),
        Line::from(vec![Span::styled("City: ", muted), Span::raw(user.address.city.clone())]),
        Line::from(vec![Span::styled("Phone: ", muted), Span::raw(user.phone.clone())]),
    ];
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(user.name.clone())
                .borders(Borders::ALL)
                .border_style(border),
        );
    f.render_widget(p, area);
}

/// Placeholder shaped like the current layout while the first fetch runs.
pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    match app.view_mode {
        ViewMode::Table => render_table_skeleton(f, area, app),
        ViewMode::Cards => render_cards_skeleton(f, area, app),
    }
}

fn bar(width: usize) -> String {
    "░".repeat(width)
}

fn render_table_skeleton(f: &mut Frame, area: Rect, app: &AppState) {
    let muted = Style::default().fg(app.theme.muted);
    let header = Row::new(
        SortField::all()
            .iter()
            .map(|field| Cell::from(field.label().to_uppercase()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let rows = (0..SKELETON_ROWS).map(|i| {
        Row::new(vec![
            Cell::from(bar(16 - i)),
            Cell::from(bar(20 - i * 2)),
            Cell::from(bar(10)),
            Cell::from(bar(12 - i)),
            Cell::from(bar(8)),
        ])
        .style(muted)
    });
    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(26),
        Constraint::Percentage(16),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, "Loading users..."))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_cards_skeleton(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel(app, "Loading users...");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let per_row = (inner.width / CARD_WIDTH).max(1) as usize;
    let rows_visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows_visible])
        .split(inner);
    let muted = Style::default().fg(app.theme.muted);
    for row_area in row_areas.iter() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(*row_area);
        for cell in cells.iter() {
            let lines: Vec<Line> = [10, 22, 16, 12, 14]
                .into_iter()
                .map(|w| Line::from(Span::styled(bar(w), muted)))
                .collect();
            let p = Paragraph::new(lines).block(
                Block::default()
                    .title(bar(12))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(p, *cell);
        }
    }
}

pub fn render_error(f: &mut Frame, area: Rect, app: &AppState) {
    let detail = app
        .cache
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "Simulated failure".to_string());
    let retry_key = app
        .keymap
        .key_for(crate::app::keymap::KeyAction::Retry)
        .unwrap_or_else(|| "r".to_string());
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            ERROR_MESSAGE,
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(detail, Style::default().fg(app.theme.muted))),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(retry_key, Style::default().add_modifier(Modifier::ITALIC)),
            Span::raw(" to retry"),
        ]),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(app, "Users"));
    f.render_widget(p, area);
}

pub fn render_empty(f: &mut Frame, area: Rect, app: &AppState, state: &ViewState) {
    let message = match state {
        ViewState::NoResults => NO_RESULTS_MESSAGE,
        _ => EMPTY_MESSAGE,
    };
    let p = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::styled(message, Style::default().fg(app.theme.muted))),
    ])
    .alignment(Alignment::Center)
    .block(panel(app, "Users"));
    f.render_widget(p, area);
}

/// Every field of one record in a centered dialog.
pub fn render_user_details_modal(f: &mut Frame, area: Rect, app: &AppState, user: &User) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 18u16.min(area.height.saturating_sub(2)).max(10);
    let rect = crate::ui::components::centered_rect(width, height, area);

    let label = Style::default().fg(app.theme.muted);
    let section = Style::default()
        .fg(app.theme.title)
        .add_modifier(Modifier::BOLD);
    let row = |k: &'static str, v: String| Line::from(vec![Span::styled(format!("{k:>10}: "), label), Span::raw(v)]);
    let addr = &user.address;
    let lines = vec![
        Line::from(Span::styled("Contact", section)),
        row("Username", user.username.clone()),
        row("Email", user.email.clone()),
        row("Phone", user.phone.clone()),
        row("Website", user.website.clone()),
        Line::raw(""),
        Line::from(Span::styled("Company", section)),
        row("Name", user.company.name.clone()),
        row("Slogan", user.company.catch_phrase.clone()),
        row("Business", user.company.bs.clone()),
        Line::raw(""),
        Line::from(Span::styled("Address", section)),
        row("Street", format!("{}, {}", addr.street, addr.suite)),
        row("City", format!("{} {}", addr.city, addr.zipcode)),
        row("Geo", format!("{}, {}", addr.geo.lat, addr.geo.lng)),
    ];
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!("{} (#{})", user.name, user.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, UserSource};
    use crate::app::AppConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    struct Never;

    impl UserSource for Never {
        fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
            Err(FetchError::Transport("offline".into()))
        }
    }

    /// Number of bordered boxes drawn by the loading skeleton.
    fn skeleton_boxes(mode: ViewMode) -> usize {
        let mut app = AppState::new(AppConfig::default(), Arc::new(Never));
        app.view_mode = mode;
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_loading(f, area, &app);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| cell.symbol() == "┌")
            .count()
    }

    #[test]
    fn loading_skeleton_follows_view_mode() {
        assert_eq!(skeleton_boxes(ViewMode::Table), 1);
        assert!(skeleton_boxes(ViewMode::Cards) > 1);
    }

    #[test]
    fn page_start_snaps_to_page() {
        assert_eq!(page_start(0, 10), 0);
        assert_eq!(page_start(9, 10), 0);
        assert_eq!(page_start(10, 10), 10);
        assert_eq!(page_start(5, 0), 5);
    }
}
