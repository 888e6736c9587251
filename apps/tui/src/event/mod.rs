mod headless;
mod loop_handler;

pub use headless::{render_outline, run_headless};
pub use loop_handler::{run, run_commands};
