use crate::detail::{DetailRequest, DetailResponse};
use crate::domain::FamilyTreeData;
use crate::error::FetchError;
use crate::request::Generation;

/// A person picked on the canvas, by click or keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub member_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRequest {
    pub generation: Generation,
    pub tree_id: String,
}

/// Events delivered to `App::dispatch`, from input handling or finished fetches.
#[derive(Debug)]
pub enum AppEvent {
    Selected(Selection),
    TreeLoaded {
        generation: Generation,
        result: Result<FamilyTreeData, FetchError>,
    },
    DetailLoaded(DetailResponse),
}

impl From<DetailResponse> for AppEvent {
    fn from(response: DetailResponse) -> Self {
        Self::DetailLoaded(response)
    }
}

/// Side effects requested by the app, run by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchTree(TreeRequest),
    FetchDetail(DetailRequest),
}
