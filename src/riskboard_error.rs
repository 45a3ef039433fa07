//! Unified error type for riskboard operations.
//!
//! Every failure the dashboard can surface to a user flows through
//! [`RiskboardError`]. The taxonomy mirrors how errors behave at the UI:
//!
//! - `Validation` - client-side form rejection, blocks submission entirely
//! - `Remote` - the backend rejected the call; the server's message is kept
//!   verbatim and shown as-is
//! - `Transport` - the call never produced a server response (connection
//!   refused, timeout); shown with a generic fallback message
//! - `Decode` - the backend answered with a payload we could not interpret
//! - `Config` - bad or unreadable configuration at startup
//!
//! # Error Codes
//!
//! Error codes are assigned by category:
//! - E010-E019: Decode errors
//! - E020-E029: Configuration errors
//! - E030-E039: Remote rejections
//! - E040-E049: Transport failures
//! - E050-E059: Validation errors

use serde::Serialize;
use std::fmt;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Decode error - malformed response body
    pub const DECODE_BODY: ErrorCode = ErrorCode("E010");
    /// Decode error - generic
    pub const DECODE_GENERIC: ErrorCode = ErrorCode("E019");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - unreadable file
    pub const CONFIG_UNREADABLE: ErrorCode = ErrorCode("E022");
    /// Config error - generic
    pub const CONFIG_GENERIC: ErrorCode = ErrorCode("E029");

    /// Remote rejection - entity not found
    pub const REMOTE_NOT_FOUND: ErrorCode = ErrorCode("E031");
    /// Remote rejection - request rejected (4xx)
    pub const REMOTE_REJECTED: ErrorCode = ErrorCode("E032");
    /// Remote rejection - server fault (5xx)
    pub const REMOTE_SERVER: ErrorCode = ErrorCode("E033");

    /// Transport failure - generic
    pub const TRANSPORT_GENERIC: ErrorCode = ErrorCode("E049");

    /// Validation error - one or more fields rejected
    pub const VALIDATION_FIELDS: ErrorCode = ErrorCode("E050");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Logical field name (e.g. `"email"`, `"password"`)
    pub field: &'static str,
    /// Human-readable reason, shown inline next to the field
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Fallback copy when a transport failure carries no server message.
pub const TRANSPORT_FALLBACK: &str = "Could not reach the server. Check your connection and try again.";

/// Unified error type for all riskboard operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RiskboardError {
    /// Client-side validation rejected the form before any network call.
    #[error("validation failed: {}", format_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    /// The backend answered with a non-success status. `message` is the
    /// server-provided text, verbatim.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The request never produced a server response.
    #[error("{message}")]
    Transport { message: String },

    /// The backend answered with a payload we could not decode.
    #[error("unexpected response from server: {detail}")]
    Decode { detail: String },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {message}")]
    Config { message: String },
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RiskboardError {
    /// Validation error from collected field violations.
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Remote rejection carrying the server's message verbatim.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Transport failure with the generic fallback copy.
    pub fn transport_fallback() -> Self {
        Self::Transport {
            message: TRANSPORT_FALLBACK.to_string(),
        }
    }

    /// Transport failure with a specific message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Structured code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::VALIDATION_FIELDS,
            Self::Remote { status, .. } => match status {
                404 => ErrorCode::REMOTE_NOT_FOUND,
                400..=499 => ErrorCode::REMOTE_REJECTED,
                _ => ErrorCode::REMOTE_SERVER,
            },
            Self::Transport { .. } => ErrorCode::TRANSPORT_GENERIC,
            Self::Decode { .. } => ErrorCode::DECODE_GENERIC,
            Self::Config { .. } => ErrorCode::CONFIG_GENERIC,
        }
    }

    /// Whether correcting user input can resolve this error.
    ///
    /// Validation errors and 4xx rejections are actionable by the user;
    /// transport and decode failures are not.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Remote { status, .. } => (400..500).contains(status),
            Self::Transport { .. } | Self::Decode { .. } | Self::Config { .. } => false,
        }
    }

    /// Whether simply re-issuing the same request might succeed.
    ///
    /// Nothing is retried automatically; this only informs banner copy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Remote { status, .. } => *status >= 500,
            Self::Validation { .. } | Self::Decode { .. } | Self::Config { .. } => false,
        }
    }

    /// Field violations, when this is a validation error.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}
