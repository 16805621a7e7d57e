use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::ui::components::centered_rect;

/// Account picker. No password: choosing an account logs in as it.
pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let height = app.accounts.len() as u16 * 3 + 7;
    let rect = centered_rect(56u16.min(area.width), height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Choose an account to continue",
            Style::default().fg(app.theme.muted),
        )),
        Line::raw(""),
    ];
    for (idx, account) in app.accounts.iter().enumerate() {
        let selected = idx == app.login.selected;
        let marker = if selected { "▶ " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", account.name), name_style),
            Span::styled(
                format!("  [{}]", account.role),
                Style::default().fg(app.theme.accent),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", account.email),
            Style::default().fg(app.theme.muted),
        )));
        lines.push(Line::raw(""));
    }
    let footer = if app.login.pending_since.is_some() {
        Span::styled("Signing in...", Style::default().fg(app.theme.accent))
    } else {
        Span::styled(
            "Up/Down: choose  Enter: sign in  q: quit",
            Style::default().fg(app.theme.muted),
        )
    };
    lines.push(Line::from(footer));

    let p = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .title(Line::from(" User Directory · Sign in ").alignment(Alignment::Center))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, area);
    f.render_widget(p, rect);
}
