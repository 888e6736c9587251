use crate::app::App;
use crate::error::FetchError;
use crate::ui::widgets::popup::centered_box;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

pub fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let throbber = Throbber::default()
        .label("Loading family tree...")
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, centered_box(26, 1, area), &mut state);
}

pub fn render_failed(message: &str, f: &mut Frame<'_>, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            "Could not load the family tree",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        retry_hint(),
    ]);
    render_centered(text, f, area);
}

pub fn render_empty(f: &mut Frame<'_>, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            FetchError::EmptyData.to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        retry_hint(),
    ]);
    render_centered(text, f, area);
}

fn retry_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            "r",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to try again", Style::default().fg(Color::Gray)),
    ])
}

fn render_centered(text: Text<'static>, f: &mut Frame<'_>, area: Rect) {
    #[allow(clippy::cast_possible_truncation)]
    let height = text.lines.len() as u16;
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, centered_box(area.width.saturating_sub(4), height + 2, area));
}
