use crate::app::{App, TreePage};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = match &app.page {
        TreePage::Ready(tree) => tree.layout.title.clone(),
        _ => "Family Tree".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(24)])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    let zoom = Paragraph::new(zoom_line(app)).alignment(Alignment::Right);
    f.render_widget(zoom, chunks[1]);
}

fn zoom_line(app: &App) -> Line<'static> {
    let enabled = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let viewport = &app.viewport;
    Line::from(vec![
        Span::styled("[-]", if viewport.can_zoom_out() { enabled } else { disabled }),
        Span::styled(format!(" {:>3}% ", viewport.zoom_percent()), Style::default().fg(Color::White)),
        Span::styled("[+]", if viewport.can_zoom_in() { enabled } else { disabled }),
        Span::styled(" [0]", enabled),
    ])
}

pub fn render_footer(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let shortcuts = Paragraph::new(shortcuts_line(app)).alignment(Alignment::Center);
    f.render_widget(shortcuts, chunks[0]);

    let affordance = app.viewport.affordance();
    let style = if app.viewport.is_dragging() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = Paragraph::new(Span::styled(affordance.label(), style)).alignment(Alignment::Right);
    f.render_widget(cursor, chunks[1]);
}

fn shortcuts_line(app: &App) -> Line<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);

    let mut pairs: Vec<(&str, &str)> = vec![("?", ": Help | "), ("Tab", ": Focus | "), ("/", ": Search | ")];
    if app.detail.is_open() {
        pairs.push(("Esc", ": Close | "));
    }
    if !app.status_message.is_empty() || app.detail.retry_available() {
        pairs.push(("r", ": Retry | "));
    }
    pairs.push(("q", ": Quit"));

    Line::from(
        pairs
            .into_iter()
            .flat_map(|(k, label)| [Span::styled(k.to_string(), key), Span::styled(label.to_string(), text)])
            .collect::<Vec<_>>(),
    )
}
