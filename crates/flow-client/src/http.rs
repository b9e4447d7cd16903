//! Shared HTTP response helpers.
//!
//! Maps backend status codes onto the workflow error taxonomy so the request
//! methods only build requests and convert payloads.

use flow_core::errors::WorkflowError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Error body the backend may attach to a rejected request.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default, alias = "userIds")]
    user_ids: Vec<String>,
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. Otherwise:
/// - **400 / 422** → `WorkflowError::Validation`
/// - **403** → `WorkflowError::Permission`
/// - **409** → `WorkflowError::Conflict` with the blocked user ids, if given
/// - anything else → [`ClientError::Api`]
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body.message.unwrap_or(text);

    let err: ClientError = match status.as_u16() {
        400 | 422 => {
            let field = body.field.unwrap_or_else(|| "request".into());
            WorkflowError::validation(field, message).into()
        }
        403 => WorkflowError::Permission(message).into(),
        409 => WorkflowError::Conflict {
            user_ids: body.user_ids,
        }
        .into(),
        code => ClientError::Api {
            status: code,
            message,
        },
    };
    tracing::debug!(status = status.as_u16(), error = %err, "backend rejected request");
    Err(err)
}

/// Read a successful response body as JSON.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn forbidden_is_permission() {
        let err = check_response(mock_response(403, r#"{"message":"not yours"}"#))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Workflow(WorkflowError::Permission(ref m)) if m == "not yours"
        ));
    }

    #[tokio::test]
    async fn conflict_carries_user_ids() {
        let err = check_response(mock_response(409, r#"{"error":"started","userIds":["u2"]}"#))
            .await
            .unwrap_err();
        match err {
            ClientError::Workflow(WorkflowError::Conflict { user_ids }) => {
                assert_eq!(user_ids, vec!["u2"]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unprocessable_is_validation_with_field() {
        let err = check_response(mock_response(422, r#"{"message":"too long","field":"remarks"}"#))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Workflow(WorkflowError::Validation { ref field, .. }) if field == "remarks"
        ));
    }

    #[tokio::test]
    async fn plain_text_server_error_is_api() {
        let err = check_response(mock_response(503, "maintenance")).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 503, ref message } if message == "maintenance"
        ));
    }

    #[tokio::test]
    async fn read_json_reports_parse_errors() {
        let err = read_json::<Vec<String>>(mock_response(200, "{")).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
