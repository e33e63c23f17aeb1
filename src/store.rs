//! Store transport: atomic multi-item writes over the wire.
//!
//! The store speaks the DynamoDB JSON protocol: one POST per transaction
//! with an `x-amz-target` header naming the operation. Any endpoint that
//! accepts that shape works (local emulators, compatible gateways).

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::template::TransactionRequest;

const TRANSACT_WRITE_TARGET: &str = "DynamoDB_20120810.TransactWriteItems";
const AMZ_JSON: &str = "application/x-amz-json-1.0";
const ERROR_BODY_LIMIT: usize = 200;

/// A sink that can apply one transaction atomically.
///
/// `transact_write` returns the number of actions applied; atomicity is the
/// implementor's contract, so a failed call means none of them were.
pub trait TransactStore {
    fn transact_write(&self, request: &TransactionRequest) -> Result<usize, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The endpoint answered with a non-success status. `detail` carries the
    /// error kind and message when the body had the standard shape, an
    /// excerpt of the raw body otherwise.
    #[error("{detail} (HTTP {status})")]
    Rejected { status: u16, detail: String },

    /// The request never completed: connection refused, DNS failure,
    /// timeout, bad URL.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Blocking HTTP client for a single store endpoint.
pub struct HttpStore {
    http: reqwest::blocking::Client,
    url: String,
}

impl HttpStore {
    pub fn new(url: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl TransactStore for HttpStore {
    fn transact_write(&self, request: &TransactionRequest) -> Result<usize, StoreError> {
        let response = self
            .http
            .post(&self.url)
            .header("content-type", AMZ_JSON)
            .header("x-amz-target", TRANSACT_WRITE_TARGET)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(rejection(status.as_u16(), &body));
        }
        debug!(actions = request.items.len(), "transaction accepted");
        Ok(request.items.len())
    }
}

/// Error body shape used by the protocol: a namespaced `__type` plus a
/// message under either casing.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(rename = "message", alias = "Message")]
    message: Option<String>,
}

fn rejection(status: u16, body: &str) -> StoreError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let detail = match parsed {
        Some(ErrorBody {
            kind: Some(kind),
            message,
        }) => {
            // "com.amazonaws.dynamodb.v20120810#TransactionCanceledException"
            // -> "TransactionCanceledException"
            let kind = kind.rsplit('#').next().unwrap_or(&kind).to_string();
            match message {
                Some(message) => format!("{kind}: {message}"),
                None => kind,
            }
        }
        Some(ErrorBody {
            kind: None,
            message: Some(message),
        }) => message,
        _ => excerpt(body),
    };
    StoreError::Rejected { status, detail }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail".to_string()
    } else {
        trimmed.chars().take(ERROR_BODY_LIMIT).collect()
    }
}

/// Builds the conventional regional endpoint URL.
pub fn regional_url(region: &str) -> String {
    format!("https://dynamodb.{region}.amazonaws.com")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        AMZ_JSON, HttpStore, StoreError, TRANSACT_WRITE_TARGET, TransactStore, regional_url,
    };
    use crate::template::TransactionRequest;

    fn request() -> TransactionRequest {
        serde_json::from_value(json!({
            "TransactItems": [
                {"Put": {"TableName": "users", "Item": {"pk": {"S": "u-1"}}}},
                {"Delete": {"TableName": "users", "Key": {"pk": {"S": "u-2"}}}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn posts_protocol_headers_and_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", AMZ_JSON)
            .match_header("x-amz-target", TRANSACT_WRITE_TARGET)
            .match_body(mockito::Matcher::PartialJson(json!({
                "TransactItems": [
                    {"Put": {"TableName": "users"}},
                    {"Delete": {"TableName": "users"}}
                ]
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        let store = HttpStore::new(server.url()).unwrap();
        let applied = store.transact_write(&request()).unwrap();

        assert_eq!(applied, 2);
        mock.assert();
    }

    #[test]
    fn structured_error_body_becomes_kind_and_message() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(
                r#"{"__type":"com.amazonaws.dynamodb.v20120810#TransactionCanceledException",
                    "Message":"Transaction cancelled"}"#,
            )
            .create();

        let store = HttpStore::new(server.url()).unwrap();
        let err = store.transact_write(&request()).unwrap_err();

        match err {
            StoreError::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "TransactionCanceledException: Transaction cancelled");
            }
            other => panic!("expected rejection, got {other}"),
        }
    }

    #[test]
    fn lowercase_message_field_is_accepted() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(r#"{"__type":"ValidationException","message":"bad request"}"#)
            .create();

        let store = HttpStore::new(server.url()).unwrap();
        let err = store.transact_write(&request()).unwrap_err();
        assert_eq!(err.to_string(), "ValidationException: bad request (HTTP 400)");
    }

    #[test]
    fn unstructured_error_body_is_excerpted() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create();

        let store = HttpStore::new(server.url()).unwrap();
        let err = store.transact_write(&request()).unwrap_err();
        assert_eq!(err.to_string(), "<html>bad gateway</html> (HTTP 502)");
    }

    #[test]
    fn long_error_body_is_truncated() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("x".repeat(1000))
            .create();

        let store = HttpStore::new(server.url()).unwrap();
        let err = store.transact_write(&request()).unwrap_err();
        match err {
            StoreError::Rejected { detail, .. } => assert_eq!(detail.len(), 200),
            other => panic!("expected rejection, got {other}"),
        }
    }

    #[test]
    fn empty_error_body_gets_a_placeholder() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/").with_status(503).create();

        let store = HttpStore::new(server.url()).unwrap();
        let err = store.transact_write(&request()).unwrap_err();
        assert_eq!(err.to_string(), "no error detail (HTTP 503)");
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let store = HttpStore::new("http://127.0.0.1:0").unwrap();
        let err = store.transact_write(&request()).unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn regional_url_follows_convention() {
        assert_eq!(
            regional_url("eu-west-2"),
            "https://dynamodb.eu-west-2.amazonaws.com"
        );
    }
}
