//! Per-person detail drawer.
//!
//! `Idle -> Loading -> (Ready | Failed)`. Each open or retry issues a new
//! generation; closing invalidates whatever is in flight.

use crate::api::DetailFetcher;
use crate::domain::MemberDetail;
use crate::error::FetchError;
use crate::request::{Generation, RequestTracker};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: Generation,
    pub member_id: String,
}

#[derive(Debug)]
pub struct DetailResponse {
    pub generation: Generation,
    pub member_id: String,
    pub result: Result<MemberDetail, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading {
        member_id: String,
    },
    Ready {
        member_id: String,
        detail: Box<MemberDetail>,
    },
    Failed {
        member_id: String,
        message: String,
        retryable: bool,
    },
}

#[derive(Debug)]
pub struct DetailPanel {
    state: DetailState,
    requests: RequestTracker,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self {
            state: DetailState::Idle,
            requests: RequestTracker::default(),
        }
    }

    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    pub const fn is_open(&self) -> bool {
        !matches!(self.state, DetailState::Idle)
    }

    pub const fn retry_available(&self) -> bool {
        matches!(self.state, DetailState::Failed { .. })
    }

    pub fn member_id(&self) -> Option<&str> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { member_id }
            | DetailState::Ready { member_id, .. }
            | DetailState::Failed { member_id, .. } => Some(member_id),
        }
    }

    /// Opens the drawer on `member_id`, superseding any earlier request.
    ///
    /// Returns `None` when that person is already loading or shown.
    pub fn open(&mut self, member_id: &str) -> Option<DetailRequest> {
        match &self.state {
            DetailState::Loading { member_id: current } | DetailState::Ready { member_id: current, .. }
                if current == member_id =>
            {
                return None;
            }
            _ => {}
        }
        Some(self.issue(member_id.to_string()))
    }

    /// Re-issues the identical request after a failure.
    pub fn retry(&mut self) -> Option<DetailRequest> {
        let DetailState::Failed { member_id, .. } = &self.state else {
            return None;
        };
        let member_id = member_id.clone();
        Some(self.issue(member_id))
    }

    pub fn close(&mut self) {
        self.requests.invalidate();
        self.state = DetailState::Idle;
    }

    /// Applies a response if it belongs to the latest outstanding request.
    pub fn commit(&mut self, response: DetailResponse) -> bool {
        if !self.requests.accept(response.generation) {
            tracing::debug!(
                generation = response.generation.value(),
                member_id = %response.member_id,
                "stale detail response dropped"
            );
            return false;
        }

        self.state = match response.result {
            Ok(detail) => DetailState::Ready {
                member_id: response.member_id,
                detail: Box::new(detail),
            },
            Err(error) => {
                tracing::warn!(member_id = %response.member_id, %error, "member detail fetch failed");
                DetailState::Failed {
                    member_id: response.member_id,
                    message: error.to_string(),
                    retryable: error.is_retryable(),
                }
            }
        };
        true
    }

    fn issue(&mut self, member_id: String) -> DetailRequest {
        let generation = self.requests.issue();
        tracing::debug!(generation = generation.value(), %member_id, "member detail requested");
        self.state = DetailState::Loading {
            member_id: member_id.clone(),
        };
        DetailRequest {
            generation,
            member_id,
        }
    }
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `request` on the runtime and posts the response to `events`.
pub fn spawn_detail_fetch<F, E>(
    fetcher: Arc<F>,
    request: DetailRequest,
    events: UnboundedSender<E>,
) -> JoinHandle<()>
where
    F: DetailFetcher,
    E: From<DetailResponse> + Send + 'static,
{
    tokio::spawn(async move {
        let result = fetcher.fetch_detail(&request.member_id).await;
        let response = DetailResponse {
            generation: request.generation,
            member_id: request.member_id,
            result,
        };
        if events.send(E::from(response)).is_err() {
            tracing::debug!("event channel closed before detail response");
        }
    })
}
