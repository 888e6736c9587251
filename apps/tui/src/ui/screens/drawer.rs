use crate::app::App;
use crate::detail::DetailState;
use crate::domain::{format_long_date, relationship_label, MemberDetail};
use crate::ui::widgets::card::gender_color;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

const LABEL_WIDTH: usize = 12;

/// Detail drawer on the right; the rest of the canvas is dimmed as a backdrop.
pub fn render_drawer(app: &App, f: &mut Frame<'_>, area: Rect, backdrop: Rect) {
    f.buffer_mut()
        .set_style(backdrop, Style::default().add_modifier(Modifier::DIM));
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Member detail ")
        .title_bottom(Line::from(" Esc: Close ").right_aligned())
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = area.inner(Margin::new(1, 1));
    f.render_widget(block, area);

    match app.detail.state() {
        DetailState::Idle => {}
        DetailState::Loading { .. } => {
            let throbber = Throbber::default()
                .label("Loading details...")
                .style(Style::default().fg(Color::Gray))
                .throbber_set(BRAILLE_SIX)
                .use_type(WhichUse::Spin);
            let mut state = app.throbber.clone();
            let line = Rect { height: 1, ..inner };
            f.render_stateful_widget(throbber, line, &mut state);
        }
        DetailState::Failed { message, .. } => {
            let text = Text::from(vec![
                Line::from(Span::styled(
                    "Failed to load member",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        "r",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(": Try again"),
                ]),
            ]);
            f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
        }
        DetailState::Ready { member_id, detail } => {
            let depth = app
                .loaded()
                .and_then(|tree| tree.member(member_id))
                .map(|member| member.depth);
            let fallback_domicile = app
                .loaded()
                .and_then(|tree| tree.member(member_id))
                .and_then(|member| member.domicile.clone());
            let text = detail_text(detail, depth, fallback_domicile, app.today());
            f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
        }
    }
}

fn detail_text(
    detail: &MemberDetail,
    depth: Option<u32>,
    fallback_domicile: Option<String>,
    today: chrono::NaiveDate,
) -> Text<'static> {
    let accent = gender_color(detail.gender);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", detail.initials()),
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                detail.fullname.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if let Some(nickname) = detail.nickname.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("      \"{nickname}\""),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(depth) = depth {
        lines.push(Line::from(Span::styled(
            format!("      {}", relationship_label(depth)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    lines.push(field("Gender", Some(detail.gender.label().to_string())));
    lines.push(field("Birth date", birth_text(detail, today)));
    if let Some(death) = detail.death() {
        lines.push(field("Death date", Some(format!("{} ✝", format_long_date(death)))));
    }
    let domicile = detail.detail.domicile.clone().or(fallback_domicile);
    lines.push(field("Domicile", domicile));
    lines.push(field("WhatsApp", detail.detail.whatsapp_number.clone()));
    lines.push(field("Profession", detail.detail.profession.clone()));
    lines.push(field("Address", detail.detail.full_address.clone()));

    if let Some(link) = detail.contact_link() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", "Contact"), Style::default().fg(Color::Gray)),
            Span::styled(
                link,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    if let Some(bio) = detail.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(bio.to_string()));
    }

    Text::from(lines)
}

/// `"<d> <Month> <yyyy> (N years old)"`, or `(N years)` once deceased.
fn birth_text(detail: &MemberDetail, today: chrono::NaiveDate) -> Option<String> {
    let birth = detail.birth()?;
    let age = detail.age(today).map(|years| {
        if detail.death_date.is_some() {
            format!(" ({years} years)")
        } else {
            format!(" ({years} years old)")
        }
    });
    Some(format!("{}{}", format_long_date(birth), age.unwrap_or_default()))
}

fn field(label: &str, value: Option<String>) -> Line<'static> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "-".to_string());
    Line::from(vec![
        Span::styled(format!("{label:<LABEL_WIDTH$}"), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}
