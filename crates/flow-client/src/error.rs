//! Backend client error types.

use flow_core::errors::WorkflowError;
use thiserror::Error;

/// Errors that can occur when talking to the task backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected by a workflow rule, either locally before sending or by the
    /// backend (400/403/409/422).
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// HTTP transport error: connect failure, timeout, broken body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an unexpected non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Whether the caller may retry the same request. Nothing retries
    /// automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Workflow(err) => err.is_retryable(),
            Self::Parse(_) => false,
        }
    }
}

impl From<ClientError> for WorkflowError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Workflow(inner) => inner,
            ClientError::Http(e) if e.is_timeout() => Self::Network(format!("request timed out: {e}")),
            ClientError::Http(e) => Self::Network(e.to_string()),
            ClientError::Api { status, message } => {
                Self::Network(format!("backend returned {status}: {message}"))
            }
            ClientError::Parse(message) => {
                Self::Other(anyhow::anyhow!("malformed backend response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_become_network_errors() {
        let err = ClientError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(err.is_retryable());
        let workflow = WorkflowError::from(err);
        assert!(workflow.is_retryable());
        assert_eq!(
            workflow.to_string(),
            "Network error: backend returned 502: bad gateway"
        );
    }

    #[test]
    fn rule_violations_pass_through() {
        let err = ClientError::from(WorkflowError::Permission("nope".into()));
        assert!(!err.is_retryable());
        assert!(matches!(
            WorkflowError::from(err),
            WorkflowError::Permission(_)
        ));
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = ClientError::Api {
            status: 404,
            message: String::new(),
        };
        assert!(!err.is_retryable());
        assert!(!ClientError::Parse("eof".into()).is_retryable());
    }
}
