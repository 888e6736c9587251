use crate::app::state::{App, Overlay};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kurbo::Vec2;

/// Cells moved per arrow key press.
const PAN_STEP_X: f64 = 4.0;
const PAN_STEP_Y: f64 = 2.0;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    match app.overlay {
        Overlay::Help => handle_help_input(app, key.code),
        Overlay::Search => handle_search_input(app, key.code),
        Overlay::None => handle_canvas_input(app, key.code),
    }
}

fn handle_help_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?' | 'q') => {
            app.overlay = Overlay::None;
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Up => app.search_move(false),
        KeyCode::Down | KeyCode::Tab => app.search_move(true),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_canvas_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Esc => {
            if app.detail.is_open() {
                app.close_detail();
            } else {
                app.focus = None;
            }
        }
        KeyCode::F(1) | KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
        }
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('+' | '=') => {
            app.viewport.zoom_in();
        }
        KeyCode::Char('-' | '_') => {
            app.viewport.zoom_out();
        }
        KeyCode::Char('0') => app.viewport.reset(),
        KeyCode::Char('c') => app.center_view(),
        KeyCode::Left | KeyCode::Char('h') => app.viewport.pan_by(Vec2::new(PAN_STEP_X, 0.0)),
        KeyCode::Right | KeyCode::Char('l') => app.viewport.pan_by(Vec2::new(-PAN_STEP_X, 0.0)),
        KeyCode::Up | KeyCode::Char('k') => app.viewport.pan_by(Vec2::new(0.0, PAN_STEP_Y)),
        KeyCode::Down | KeyCode::Char('j') => app.viewport.pan_by(Vec2::new(0.0, -PAN_STEP_Y)),
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter => app.select_focused(),
        _ => {}
    }
}
