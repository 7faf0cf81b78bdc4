// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;
use thiserror::Error;

/// Error taxonomy for calls against the log ingestion service.
///
/// The split between [`ServiceError::Transient`] and [`ServiceError::Permanent`]
/// drives every retry decision made by callers: only transient failures may
/// consume a retry budget.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Client-side configuration (credentials, region, endpoint) is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The requested log group or stream does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The log group or stream is already present.
    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Credentials were rejected by the backend.
    #[error("request was not authorized ({kind}): {message}")]
    Unauthorized { kind: String, message: String },

    /// Throttling, temporary outages and 5xx responses.
    #[error("transient service error ({kind}, status {status}): {message}")]
    Transient {
        kind: String,
        status: u16,
        message: String,
    },

    /// Quota, validation and other failures that will not resolve by retrying.
    #[error("service rejected request ({kind}, status {status}): {message}")]
    Permanent {
        kind: String,
        status: u16,
        message: String,
    },

    /// Transport-level issue (DNS, TLS, socket, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response payload could not be decoded.
    #[error("failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    /// Returns true when the same request may succeed if sent again later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// Maps a service error type name (`__type`) and HTTP status to the taxonomy.
    ///
    /// The type may be namespaced (`com.amazonaws.logs#ThrottlingException`);
    /// only the part after the last `#` is considered.
    pub fn from_response(kind: &str, status: StatusCode, message: String) -> Self {
        let kind = kind.rsplit('#').next().unwrap_or(kind).trim();
        let status_code = status.as_u16();
        match kind {
            "ResourceNotFoundException" => Self::NotFound(message),
            "ResourceAlreadyExistsException" => Self::AlreadyExists(message),
            "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "AccessDeniedException"
            | "ExpiredTokenException"
            | "IncompleteSignatureException"
            | "MissingAuthenticationToken" => Self::Unauthorized {
                kind: kind.to_string(),
                message,
            },
            "ThrottlingException"
            | "ServiceUnavailableException"
            | "OperationAbortedException"
            | "InternalFailure"
            | "RequestTimeout" => Self::Transient {
                kind: kind.to_string(),
                status: status_code,
                message,
            },
            _ if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
                Self::Transient {
                    kind: kind_or_status(kind, status),
                    status: status_code,
                    message,
                }
            }
            _ => Self::Permanent {
                kind: kind_or_status(kind, status),
                status: status_code,
                message,
            },
        }
    }
}

fn kind_or_status(kind: &str, status: StatusCode) -> String {
    if kind.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_error_types() {
        let not_found = ServiceError::from_response(
            "ResourceNotFoundException",
            StatusCode::BAD_REQUEST,
            "The specified log group does not exist.".to_string(),
        );
        assert!(not_found.is_not_found());
        assert!(!not_found.is_transient());

        let exists = ServiceError::from_response(
            "com.amazonaws.logs#ResourceAlreadyExistsException",
            StatusCode::BAD_REQUEST,
            String::new(),
        );
        assert!(exists.is_already_exists());

        let throttled = ServiceError::from_response(
            "ThrottlingException",
            StatusCode::BAD_REQUEST,
            "Rate exceeded".to_string(),
        );
        assert!(throttled.is_transient());

        let denied = ServiceError::from_response(
            "UnrecognizedClientException",
            StatusCode::BAD_REQUEST,
            "The security token included in the request is invalid.".to_string(),
        );
        assert!(matches!(denied, ServiceError::Unauthorized { .. }));
        assert!(!denied.is_transient());
    }

    #[test]
    fn unknown_types_fall_back_to_status() {
        let quota = ServiceError::from_response(
            "LimitExceededException",
            StatusCode::BAD_REQUEST,
            "Resource limit exceeded.".to_string(),
        );
        assert!(matches!(quota, ServiceError::Permanent { status: 400, .. }));

        let outage = ServiceError::from_response("", StatusCode::BAD_GATEWAY, String::new());
        assert!(outage.is_transient());
        assert_eq!(
            outage.to_string(),
            "transient service error (HTTP 502, status 502): "
        );

        let too_many =
            ServiceError::from_response("", StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(too_many.is_transient());
    }

    #[test]
    fn configuration_errors_are_not_transient() {
        let error = ServiceError::InvalidConfig("missing region".to_string());
        assert!(!error.is_transient());
        assert_eq!(
            error.to_string(),
            "invalid client configuration: missing region"
        );
    }
}
