use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::config::ColorConfig;
use crate::menu::{MenuAction, MenuItem, MenuItemKind};
use crate::tui::app::{InputMode, TuiApp};

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Menu
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0], colors);
    render_menu(frame, app, chunks[1], colors);
    render_status_bar(frame, app, chunks[2], colors);
}

fn render_title(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let title = Paragraph::new(Line::from(Span::styled(
        app.title.clone(),
        Style::default()
            .fg(colors.title)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);
}

fn render_menu(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let rule_width = area.width.saturating_sub(4) as usize;
    let breadcrumb = format!(" {} ", app.breadcrumb());
    let level = app.current_mut();

    let items: Vec<ListItem> = level
        .items
        .iter()
        .map(|item| menu_line(item, rule_width, colors))
        .collect();

    let block = Block::default()
        .title(breadcrumb)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut level.list_state);
}

fn menu_line<'a>(item: &'a MenuItem, rule_width: usize, colors: &ColorConfig) -> ListItem<'a> {
    match item.kind {
        MenuItemKind::Separator => ListItem::new("─".repeat(rule_width))
            .style(Style::default().fg(colors.separator)),
        MenuItemKind::Header => ListItem::new(item.text.as_str()).style(
            Style::default()
                .fg(colors.header)
                .add_modifier(Modifier::ITALIC),
        ),
        MenuItemKind::Normal => {
            let color = match &item.action {
                Some(MenuAction::ShowAccount { .. } | MenuAction::Follow) => colors.account,
                Some(_) => colors.post,
                None => colors.header,
            };
            let mut spans = vec![Span::styled(item.text.as_str(), Style::default().fg(color))];
            if item.has_children {
                spans.push(Span::styled(" ›", Style::default().fg(colors.separator)));
            }
            ListItem::new(Line::from(spans))
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let mut style = Style::default().fg(colors.status_fg).bg(colors.status_bg);

    let status = match &app.mode {
        InputMode::Follow { input } => format!("Follow @{}█  (Enter:Follow  Esc:Cancel)", input),
        InputMode::ConfirmRemove { handle } => format!("Remove @{}? (y/n)", handle),
        InputMode::Normal if app.is_refreshing => "Refreshing...".to_string(),
        InputMode::Normal => match &app.status_message {
            Some(msg) => {
                if msg.starts_with("Error") {
                    style = style.fg(colors.error);
                }
                msg.clone()
            }
            None => "j/k:Nav  Enter:Open  Esc:Back  o:Browser  a:Follow  d:Remove  R:Refresh  q:Quit"
                .to_string(),
        },
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}
