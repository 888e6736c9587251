use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub fn render_search_popup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(50, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Find a person ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let query = Paragraph::new(Line::from(vec![
        Span::styled("/ ", Style::default().fg(Color::Yellow)),
        Span::raw(app.search.query.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]));
    f.render_widget(query, chunks[0]);

    if app.search.hits.is_empty() {
        let none = Paragraph::new(Span::styled("No matches", Style::default().fg(Color::Gray)));
        f.render_widget(none, chunks[1]);
        return;
    }

    let items: Vec<ListItem<'_>> = app
        .search
        .hits
        .iter()
        .map(|hit| ListItem::new(hit.fullname.as_str()))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.search.selected));
    f.render_stateful_widget(list, chunks[1], &mut state);
}
