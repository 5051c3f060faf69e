use dinawin_shared::{QueryError, ValidationError};
use serde::Deserialize;

// =========================================================
// Transport errors
// =========================================================

/// Failure below HTTP semantics: the request never produced a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The platform refused to build the request.
    #[error("request build failed: {0}")]
    Build(String),
    /// Network unreachable, CORS refusal, aborted fetch.
    #[error("network error: {0}")]
    Network(String),
    /// The response arrived but its body could not be read.
    #[error("response body unreadable: {0}")]
    Body(String),
}

// =========================================================
// API errors
// =========================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("request body could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// 401 from the server. `body` is whatever the server sent back.
    #[error("authentication required")]
    Unauthorized { body: String },
    /// Any other non-2xx status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("response could not be decoded: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
    /// Well-formed JSON that still breaks the contract.
    #[error("invalid response: {0}")]
    InvalidResponse(&'static str),
}

/// Error body shape the API uses for 4xx/5xx replies. Bodies often carry
/// more than one of these keys; `message` wins, then `title`, then `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    title: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.title).or(self.error)
    }
}

impl ApiError {
    /// HTTP status when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Raw server body of an error reply.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => Some(body),
            ApiError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Human readable message from the server, if the body carries one.
    ///
    /// Falls back to the raw body when it is short plain text.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => body.trim(),
            _ => return None,
        };
        if body.is_empty() {
            return None;
        }
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.into_message(),
            Err(_) if !body.starts_with('{') && body.len() <= 200 => Some(body.to_string()),
            Err(_) => None,
        }
    }

    /// Text for the notice area of the UI.
    pub fn user_message(&self) -> String {
        match self.server_message() {
            Some(message) => format!("{} ({})", message, self),
            None => self.to_string(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_http_failures_only() {
        let err = ApiError::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_unauthorized());

        let err = ApiError::Unauthorized {
            body: String::new(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());

        let err = ApiError::from(TransportError::Network("offline".to_string()));
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "network error: offline");
    }

    #[test]
    fn server_message_reads_json_and_plain_bodies() {
        let json = ApiError::Status {
            status: 400,
            body: r#"{"message":"plate number already admitted"}"#.to_string(),
        };
        assert_eq!(
            json.server_message().as_deref(),
            Some("plate number already admitted")
        );

        let problem = ApiError::Status {
            status: 422,
            body: r#"{"title":"One or more validation errors occurred."}"#.to_string(),
        };
        assert_eq!(
            problem.server_message().as_deref(),
            Some("One or more validation errors occurred.")
        );

        let mixed = ApiError::Status {
            status: 400,
            body: r#"{"error":"Bad Request","message":"plate already admitted"}"#.to_string(),
        };
        assert_eq!(mixed.server_message().as_deref(), Some("plate already admitted"));

        let error_only = ApiError::Unauthorized {
            body: r#"{"error":"invalid_token","status":401}"#.to_string(),
        };
        assert_eq!(error_only.server_message().as_deref(), Some("invalid_token"));

        let plain = ApiError::Status {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(
            plain.user_message(),
            "Internal Server Error (request failed with status 500)"
        );

        let opaque = ApiError::Status {
            status: 500,
            body: r#"{"trace":"..."}"#.to_string(),
        };
        assert_eq!(opaque.server_message(), None);
    }
}
