use crate::domain::Gender;
use crate::tree::PersonCard;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardEmphasis {
    pub root: bool,
    pub focused: bool,
    pub selected: bool,
}

pub const fn gender_color(gender: Gender) -> Color {
    match gender {
        Gender::Male => Color::Blue,
        Gender::Female => Color::Magenta,
    }
}

/// One person box. Shrinks to a bare name line when zoomed far out.
pub struct PersonCardWidget<'a> {
    person: &'a PersonCard,
    emphasis: CardEmphasis,
}

impl<'a> PersonCardWidget<'a> {
    pub const fn new(person: &'a PersonCard, emphasis: CardEmphasis) -> Self {
        Self { person, emphasis }
    }

    fn border_style(&self) -> Style {
        let color = if self.emphasis.focused || self.emphasis.selected {
            Color::Yellow
        } else {
            gender_color(self.person.gender)
        };
        let style = Style::default().fg(color);
        if self.person.deceased {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }

    fn border_type(&self) -> BorderType {
        if self.emphasis.focused || self.emphasis.selected {
            BorderType::Thick
        } else if self.emphasis.root {
            BorderType::Double
        } else {
            BorderType::Rounded
        }
    }

    fn name_line(&self) -> Line<'a> {
        let person = self.person;
        let mut name_style = Style::default().add_modifier(Modifier::BOLD);
        if self.emphasis.root {
            name_style = name_style.fg(Color::Yellow);
        }
        let mut spans = vec![
            Span::styled(
                format!("{} ", person.initial),
                Style::default()
                    .fg(gender_color(person.gender))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(person.fullname.as_str(), name_style),
        ];
        if person.deceased {
            spans.push(Span::raw(" ✝"));
        }
        Line::from(spans)
    }

    fn detail_lines(&self) -> Vec<Line<'a>> {
        let person = self.person;
        let mut age = person.age.clone();
        if person.deceased {
            age.push_str(" ✝");
        }
        vec![
            self.name_line(),
            Line::from(Span::styled(person.lifespan.as_str(), Style::default().fg(Color::Gray))),
            Line::from(Span::styled(age, Style::default().fg(Color::DarkGray))),
        ]
    }
}

impl Widget for PersonCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let dim = if self.person.deceased {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        if area.height < 3 || area.width < 4 {
            Paragraph::new(self.name_line())
                .style(dim.bg(Color::Black))
                .render(area, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.border_type())
            .border_style(self.border_style());

        let lines = if area.height >= 5 {
            self.detail_lines()
        } else {
            vec![self.name_line()]
        };

        Paragraph::new(lines)
            .block(block)
            .style(dim)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Renders `widget` at its full `size` with its top-left corner at the signed
/// cell `origin`, keeping only the cells that fall inside `clip`.
pub fn render_clipped<W: Widget>(widget: W, origin: (i32, i32), size: (u16, u16), clip: Rect, buf: &mut Buffer) {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return;
    }
    let mut scratch = Buffer::empty(Rect::new(0, 0, width, height));
    widget.render(scratch.area, &mut scratch);

    for dy in 0..height {
        for dx in 0..width {
            let x = origin.0 + i32::from(dx);
            let y = origin.1 + i32::from(dy);
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            if x < clip.x || y < clip.y || x >= clip.right() || y >= clip.bottom() {
                continue;
            }
            if let (Some(source), Some(target)) = (scratch.cell((dx, dy)), buf.cell_mut((x, y))) {
                *target = source.clone();
            }
        }
    }
}
