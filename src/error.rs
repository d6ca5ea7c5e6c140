//! Error types for the connector client and the HTTP façade.
//!
//! [`ConnectorError`] is the typed failure returned by every client call.
//! [`AppError`] is what façade handlers return; it is the only place where an
//! upstream failure may be reinterpreted before it reaches an external caller.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Upstream error codes that mean the connector has no usable OAuth grant.
const AUTH_MISSING_CODES: &[&str] = &[
    "unauthenticated",
    "not_authenticated",
    "oauth_required",
    "oauth_token_revoked",
    "invalid_grant",
];

/// Message fragments the connector uses when it has no usable grant. It
/// reports these as `500 internal_error`, so they are matched at any status.
const AUTH_MISSING_MARKERS: &[&str] = &["oauth", "authenticate", "re-authentication"];

/// Failure of a single connector call.
///
/// Every call ends in exactly one of these kinds; nothing is retried and
/// nothing is recovered silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectorError {
    /// No response was obtained (DNS, connect, timeout).
    #[error("connector unreachable: {0}")]
    Connectivity(String),

    /// A response arrived but its body was not the expected structure.
    #[error("unexpected response from connector (status {status}): {body}")]
    Protocol { status: u16, body: String },

    /// The connector answered with a structured `{error, message}` body.
    #[error("{message} ({code}, status {status})")]
    Domain {
        code: String,
        message: String,
        status: u16,
    },

    /// Input rejected before anything was sent.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl ConnectorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => "connectivity",
            Self::Protocol { .. } => "protocol",
            Self::Domain { .. } => "domain",
            Self::Validation(_) => "validation",
        }
    }

    /// HTTP status reported by the connector, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } | Self::Domain { status, .. } => Some(*status),
            Self::Connectivity(_) | Self::Validation(_) => None,
        }
    }

    /// Returns true when the connector reports a missing or expired OAuth grant.
    pub fn is_authentication_missing(&self) -> bool {
        match self {
            Self::Domain { code, message, .. } => {
                let message = message.to_ascii_lowercase();
                AUTH_MISSING_CODES.contains(&code.as_str())
                    || AUTH_MISSING_MARKERS
                        .iter()
                        .any(|marker| message.contains(marker))
            }
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload shared by all façade error responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation {
        message: String,
        details: Value,
    },
    NotFound {
        message: String,
        details: Value,
    },
    AuthenticationRequired {
        auth_url: String,
    },
    /// Upstream failure passed through with its original status and message.
    Upstream {
        status: u16,
        code: String,
        message: String,
    },
    BadGateway {
        code: &'static str,
        message: String,
    },
    Internal {
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Converts a connector failure into a caller-facing error.
    ///
    /// Missing authentication becomes [`AppError::AuthenticationRequired`]
    /// pointing at `auth_url`; everything else keeps the upstream intent.
    pub fn from_connector(err: ConnectorError, auth_url: &str) -> Self {
        if err.is_authentication_missing() {
            return Self::AuthenticationRequired {
                auth_url: auth_url.to_string(),
            };
        }

        match err {
            ConnectorError::Domain {
                code,
                message,
                status,
            } => Self::Upstream {
                status,
                code,
                message,
            },
            ConnectorError::Validation(message) => Self::bad_request(message, json!({})),
            ConnectorError::Connectivity(message) => Self::BadGateway {
                code: "upstream_unreachable",
                message,
            },
            ConnectorError::Protocol { status, body } => Self::BadGateway {
                code: "upstream_protocol_error",
                message: format!("Connector answered {status} with an unreadable body: {body}"),
            },
        }
    }

    fn parts(self) -> (StatusCode, ErrorInfo) {
        match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                ErrorInfo {
                    code: "validation_error".to_string(),
                    message,
                    details,
                },
            ),
            AppError::NotFound { message, details } => (
                StatusCode::NOT_FOUND,
                ErrorInfo {
                    code: "not_found".to_string(),
                    message,
                    details,
                },
            ),
            AppError::AuthenticationRequired { auth_url } => (
                StatusCode::UNAUTHORIZED,
                ErrorInfo {
                    code: "authentication_required".to_string(),
                    message: format!(
                        "Search Console is not authenticated. Visit {auth_url} to authenticate"
                    ),
                    details: json!({ "auth_url": auth_url }),
                },
            ),
            AppError::Upstream {
                status,
                code,
                message,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorInfo {
                    code,
                    message,
                    details: json!({ "upstream_status": status }),
                },
            ),
            AppError::BadGateway { code, message } => (
                StatusCode::BAD_GATEWAY,
                ErrorInfo {
                    code: code.to_string(),
                    message,
                    details: json!({}),
                },
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorInfo {
                    code: "internal_error".to_string(),
                    message,
                    details,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();

        if status.is_server_error() {
            tracing::warn!(code = %error.code, message = %error.message, "Request failed");
        }

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_else(|_| json!({})),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(
            "Invalid path parameter",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
