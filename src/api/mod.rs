pub mod handlers;
pub mod params;
pub mod routes;

pub use routes::*;

use crate::search::SearchService;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub started_at: Instant,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(search: Arc<SearchService>) -> Self {
        Self {
            search,
            started_at: Instant::now(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
