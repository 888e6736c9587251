pub mod chrome;
pub mod drawer;
pub mod help;
pub mod search;
pub mod status;
pub mod tree;
