//! # flow-client
//!
//! REST client for a remote task backend that acts as the system of record.
//!
//! Reads fetch the task, its assignments and its comments. Writes validate
//! against a fresh snapshot, send one request carrying the actor id, then
//! re-fetch so callers see the backend's state. Once the backend accepts a
//! write, a failed re-fetch is reported next to the change and never as the
//! write's error. A request timeout surfaces as `WorkflowError::Network`;
//! nothing is retried automatically.

pub mod error;
pub mod http;
pub mod mutations;
pub mod snapshot;
pub mod wire;

use std::sync::Arc;
use std::time::Duration;

use flow_config::BackendConfig;
use flow_core::enums::TransitionMode;
use flow_core::events::{NoopSink, NotificationSink, WorkflowEvent};

pub use error::ClientError;
pub use snapshot::TaskSnapshot;

/// HTTP client for the task backend.
///
/// Clone is cheap; the inner `reqwest::Client` and the sink are shared.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    transitions: TransitionMode,
    sink: Arc<dyn NotificationSink>,
}

impl BackendClient {
    /// Create a client from backend settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built (TLS backend
    /// initialization failure). This is not expected in practice.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transitions: TransitionMode::default(),
            sink: Arc::new(NoopSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: TransitionMode) -> Self {
        self.transitions = transitions;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn transitions(&self) -> TransitionMode {
        self.transitions
    }

    pub(crate) fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    pub(crate) fn emit(&self, event: &WorkflowEvent) {
        self.sink.notify(event);
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}
