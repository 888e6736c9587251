use crate::app::message::{AppEvent, Selection};
use crate::app::state::{App, Overlay};
use crate::ui;
use crate::viewport::ZoomDirection;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use kurbo::Point;
use ratatui::layout::{Position, Rect};

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let position = Position::new(mouse.column, mouse.row);
    let covered = app.overlay != Overlay::None || app.detail.is_open();

    // A drag can outlive the canvas gaining an overlay; its release still ends it.
    if covered && matches!(mouse.kind, MouseEventKind::Up(_)) {
        if app.viewport.release() {
            tracing::debug!("drag released under overlay");
        }
        app.pending_click = None;
        return;
    }

    if app.overlay != Overlay::None {
        return;
    }

    if app.detail.is_open() {
        // Clicks on the backdrop dismiss the drawer; the canvas stays inert underneath.
        let drawer = ui::drawer_area(app.screen);
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) && !drawer.contains(position) {
            app.close_detail();
        }
        return;
    }

    let canvas = ui::frame_areas(app.screen).canvas;
    let inside = canvas.contains(position);
    let pointer = canvas_point(canvas, position);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            app.viewport.press(pointer);
            app.pending_click = app.person_at_screen(pointer).map(|p| p.member_id.clone());
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if !inside {
                app.viewport.leave();
                app.pending_click = None;
            } else if app.viewport.drag_to(pointer) {
                app.pending_click = None;
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.viewport.release();
            let clicked = app.pending_click.take();
            let released_on = if inside {
                app.person_at_screen(pointer).map(|p| p.member_id.clone())
            } else {
                None
            };
            if let Some(member_id) = clicked.filter(|id| released_on.as_ref() == Some(id)) {
                app.dispatch(AppEvent::Selected(Selection { member_id }));
            }
        }
        MouseEventKind::Moved if !inside => {
            app.viewport.leave();
            app.pending_click = None;
        }
        MouseEventKind::ScrollUp if inside => {
            app.viewport.wheel(pointer, ZoomDirection::In);
        }
        MouseEventKind::ScrollDown if inside => {
            app.viewport.wheel(pointer, ZoomDirection::Out);
        }
        _ => {}
    }
}

/// Screen cell to canvas-relative point.
fn canvas_point(canvas: Rect, position: Position) -> Point {
    Point::new(
        f64::from(position.x) - f64::from(canvas.x),
        f64::from(position.y) - f64::from(canvas.y),
    )
}
