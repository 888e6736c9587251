// Export our modules for use in binaries and tests
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod detail;
pub mod domain;
pub mod error;
pub mod event;
pub mod logging;
pub mod request;
pub mod terminal;
pub mod tree;
pub mod ui;
pub mod viewport;

pub use domain::{FamilyTreeData, Gender, Member, MemberDetail};
pub use error::{ConfigError, FetchError};
