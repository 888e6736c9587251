pub(crate) mod helpers;
mod keys;
mod mouse;

use crate::app::state::App;
use crossterm::event::{Event, KeyEventKind};
use ratatui::layout::Rect;

pub use keys::handle_key;
pub use mouse::handle_mouse;

pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Resize(width, height) => {
            app.screen = Rect::new(0, 0, width, height);
            release_pointer(app);
        }
        Event::FocusLost => release_pointer(app),
        _ => {}
    }
}

/// The pointer can go away without a release event; never leave a drag stuck.
fn release_pointer(app: &mut App) {
    if app.viewport.cancel() {
        tracing::debug!("drag cancelled");
    }
    app.pending_click = None;
}
