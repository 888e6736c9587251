use crate::app::App;
use crate::tree::{CoupleCard, PersonCard, TreeLayout};
use crate::ui::widgets::card::{render_clipped, CardEmphasis, PersonCardWidget};
use crate::ui::widgets::connectors::ConnectorGrid;
use crate::viewport::ViewportController;
use kurbo::{Point, Vec2};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Smallest canvas the tree is drawn into.
const MIN_CANVAS: (u16, u16) = (12, 3);

pub fn render_tree(app: &App, layout: &TreeLayout, f: &mut Frame<'_>, area: Rect) {
    if area.width < MIN_CANVAS.0 || area.height < MIN_CANVAS.1 {
        let hint = Paragraph::new(Span::styled(
            "Terminal too small",
            Style::default().fg(Color::Gray),
        ));
        f.render_widget(hint, area);
        return;
    }

    let highlight = Highlight {
        focused: app.focused_person().map(|p| p.member_id.as_str()),
        selected: app.detail.member_id(),
    };
    draw_layout(layout, &app.viewport, highlight, area, f.buffer_mut());
}

#[derive(Debug, Clone, Copy, Default)]
struct Highlight<'a> {
    focused: Option<&'a str>,
    selected: Option<&'a str>,
}

/// Projects the logical layout through the viewport into `area`.
fn draw_layout(layout: &TreeLayout, viewport: &ViewportController, highlight: Highlight<'_>, area: Rect, buf: &mut Buffer) {
    let mut grid = ConnectorGrid::new(area.width, area.height);
    for connector in &layout.connectors {
        grid.add_segment(
            viewport.logical_to_screen(connector.from),
            viewport.logical_to_screen(connector.to),
        );
    }
    grid.render(area, buf, Style::default().fg(Color::DarkGray));

    for card in &layout.cards {
        draw_marriage_marker(card, viewport, area, buf);
        for person in card.persons() {
            let emphasis = CardEmphasis {
                root: card.is_root(),
                focused: highlight.focused == Some(person.member_id.as_str()),
                selected: highlight.selected == Some(person.member_id.as_str()),
            };
            draw_person(person, emphasis, viewport, area, buf);
        }
    }
}

fn draw_person(person: &PersonCard, emphasis: CardEmphasis, viewport: &ViewportController, area: Rect, buf: &mut Buffer) {
    let screen = viewport.logical_rect_to_screen(person.rect);
    let (x0, y0) = cell(Point::new(screen.x0, screen.y0), area);
    let (x1, y1) = cell(Point::new(screen.x1, screen.y1), area);
    let (Ok(width), Ok(height)) = (u16::try_from(x1 - x0), u16::try_from(y1 - y0)) else {
        return;
    };
    // Entirely off canvas.
    if x1 <= i32::from(area.x)
        || y1 <= i32::from(area.y)
        || x0 >= i32::from(area.right())
        || y0 >= i32::from(area.bottom())
    {
        return;
    }
    render_clipped(
        PersonCardWidget::new(person, emphasis),
        (x0, y0),
        (width.max(1), height.max(1)),
        area,
        buf,
    );
}

fn draw_marriage_marker(card: &CoupleCard, viewport: &ViewportController, area: Rect, buf: &mut Buffer) {
    let (Some(marker), Some(spouse)) = (card.marriage_marker(), card.spouse.as_ref()) else {
        return;
    };
    let gap = (spouse.rect.x0 - card.member.rect.x1) * viewport.scale();
    let symbol = if gap >= 3.0 { "─♥─" } else { "♥" };
    #[allow(clippy::cast_precision_loss)]
    let half = (symbol.chars().count() / 2) as f64;
    let start = viewport.logical_to_screen(marker) - Vec2::new(half, 0.0);
    let (x, y) = cell(start, area);

    for (i, ch) in symbol.chars().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let cx = x + i as i32;
        if let (Ok(cx), Ok(cy)) = (u16::try_from(cx), u16::try_from(y)) {
            if area.contains((cx, cy).into()) {
                if let Some(target) = buf.cell_mut((cx, cy)) {
                    target.set_char(ch).set_style(Style::default().fg(Color::Red));
                }
            }
        }
    }
}

/// Canvas-relative screen point to absolute signed cell.
#[allow(clippy::cast_possible_truncation)]
fn cell(point: Point, area: Rect) -> (i32, i32) {
    (
        i32::from(area.x) + point.x.round() as i32,
        i32::from(area.y) + point.y.round() as i32,
    )
}
