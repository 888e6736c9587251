// App module for family-tree
// Holds application state and routes input and fetch results into it

pub mod input;
pub mod message;
pub mod state;
#[cfg(test)]
pub(crate) mod test_support;

pub use input::handle_event;
pub use message::{AppEvent, Command, Selection, TreeRequest};
pub use state::{App, LoadedTree, Overlay, SearchHit, SearchState, TreePage};
