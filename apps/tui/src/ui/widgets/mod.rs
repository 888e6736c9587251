pub mod card;
pub mod connectors;
pub mod popup;
