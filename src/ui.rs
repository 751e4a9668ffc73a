//! Rendering for the explorer session.
//!
//! The renderer is a pure consumer of [`AppState`]: it draws the search
//! input, the version list, and the detail pane from the current snapshot
//! and never mutates anything beyond the list widget's scroll state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Position,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::state::{AppState, Focus};
use crate::theme::theme;

/// Hint shown in the empty search field.
const SEARCH_PLACEHOLDER: &str = "Start typing to filter versions";

/// Draw one frame of the explorer.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let th = theme();
    let area = f.area();

    let bg = Block::default().style(Style::default().bg(th.base));
    f.render_widget(bg, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Percentage(40),
        ])
        .split(area);

    draw_search(f, app, chunks[0]);
    draw_versions(f, app, chunks[1]);
    draw_details(f, app, chunks[2]);
}

/// Render the search input, with the terminal cursor placed after the
/// typed text while the field is focused.
fn draw_search(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let th = theme();
    let focused = matches!(app.focus, Focus::Search);

    let prompt = Span::styled(
        "Search: ",
        Style::default().fg(if focused { th.cyan } else { th.overlay }),
    );
    let body = if app.input.is_empty() && !focused {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(th.overlay))
    } else {
        Span::styled(
            app.input.clone(),
            Style::default().fg(if focused { th.text } else { th.subtext }),
        )
    };
    let input = Paragraph::new(Line::from(vec![prompt, body])).block(
        Block::default()
            .title(Span::styled(
                if focused { "Search (focused)" } else { "Search" },
                Style::default().fg(if focused { th.cyan } else { th.overlay }),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused { th.cyan } else { th.surface })),
    );
    f.render_widget(input, area);

    if focused {
        let offset = ("Search: ".width() + app.input.width()).min(u16::MAX as usize) as u16;
        let x = area.x.saturating_add(1).saturating_add(offset);
        let y = area.y.saturating_add(1);
        if x < area.x.saturating_add(area.width.saturating_sub(1)) {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}

/// Render the version list with the committed selection emphasized.
fn draw_versions(f: &mut Frame, app: &mut AppState, area: ratatui::layout::Rect) {
    let th = theme();
    let focused = matches!(app.focus, Focus::Select);

    let items: Vec<ListItem> = app
        .options
        .iter()
        .map(|opt| {
            let committed = app.selection.as_deref() == Some(opt.value.as_str());
            let style = if committed {
                Style::default().fg(th.green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(th.text)
            };
            ListItem::new(Line::from(Span::styled(opt.label.clone(), style)))
        })
        .collect();

    let list = List::new(items)
        .style(Style::default().fg(th.text).bg(th.base))
        .block(
            Block::default()
                .title(Span::styled(
                    format!("Versions ({})", app.options.len()),
                    Style::default().fg(if focused { th.cyan } else { th.overlay }),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if focused { th.cyan } else { th.surface })),
        )
        .highlight_style(Style::default().fg(th.crust).bg(th.lavender))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the detail pane: idle/loading/error messages or the block for
/// the active display mode.
fn draw_details(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let th = theme();
    let title = match app.selection.as_deref() {
        Some(version) => format!("{}@{version}", app.package),
        None => app.package.clone(),
    };
    let body = Paragraph::new(app.text.clone())
        .style(Style::default().fg(th.text).bg(th.base))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(th.overlay)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(th.surface)),
        );
    f.render_widget(body, area);
}
