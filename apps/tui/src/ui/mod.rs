// UI module for family-tree
// Pure projection of App state onto the frame

pub mod screens;
pub mod widgets;

use crate::app::{App, Overlay, TreePage};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Widest the detail drawer gets.
pub const DRAWER_WIDTH: u16 = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    pub header: Rect,
    pub canvas: Rect,
    pub footer: Rect,
}

/// Splits the terminal into header, canvas and footer. Input handling uses
/// the same split so pointer coordinates line up with what was drawn.
pub fn frame_areas(area: Rect) -> FrameAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and zoom
            Constraint::Min(1),    // Tree canvas
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area);

    FrameAreas {
        header: chunks[0],
        canvas: chunks[1],
        footer: chunks[2],
    }
}

/// Right-hand drawer over the header and canvas.
pub fn drawer_area(area: Rect) -> Rect {
    let canvas = frame_areas(area).canvas;
    let width = DRAWER_WIDTH.min(area.width);
    Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: canvas.bottom().saturating_sub(area.y),
    }
}

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let areas = frame_areas(f.area());

    screens::chrome::render_header(app, f, areas.header);
    match &app.page {
        TreePage::Loading => screens::status::render_loading(app, f, areas.canvas),
        TreePage::Failed { message, .. } => screens::status::render_failed(message, f, areas.canvas),
        TreePage::Empty => screens::status::render_empty(f, areas.canvas),
        TreePage::Ready(tree) => screens::tree::render_tree(app, &tree.layout, f, areas.canvas),
    }
    screens::chrome::render_footer(app, f, areas.footer);

    if app.detail.is_open() {
        screens::drawer::render_drawer(app, f, drawer_area(f.area()), areas.canvas);
    }

    match app.overlay {
        Overlay::None => {}
        Overlay::Help => screens::help::render_help_popup(f, areas.canvas),
        Overlay::Search => screens::search::render_search_popup(app, f, areas.canvas),
    }
}
