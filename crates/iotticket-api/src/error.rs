use thiserror::Error;

use crate::model::{ErrorCode, ErrorInfo};

/// Top-level error type for the `iotticket-api` crate.
///
/// Local precondition failures are raised before any request leaves the
/// process. Everything else is the outcome of a single HTTP exchange; the
/// client stays usable after any of them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Local preconditions ─────────────────────────────────────────
    /// A caller-supplied argument violated a precondition (blank id,
    /// empty collection, inverted date range, ...).
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// A value or type tag outside the supported scalar set.
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    ///
    /// `error_info` is present only when the body parsed as the server's
    /// structured error payload.
    #[error("Server communication error (HTTP {status}): {message}")]
    ServerCommunication {
        status: u16,
        message: String,
        body: String,
        error_info: Option<ErrorInfo>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// The request never completed (DNS, connection refused, reset, timeout).
    #[error("Couldn't communicate with server: {0}")]
    Transport(#[source] reqwest::Error),

    /// The caller cancelled the operation before a response arrived.
    #[error("Operation cancelled")]
    Cancelled,

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// An outgoing payload could not be encoded.
    #[error("Couldn't serialize the provided data: {message}")]
    Serialization { message: String },

    /// A successful response body did not match the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the caller cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for local precondition failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::UnsupportedDataType(_)
        )
    }

    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerCommunication { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured error payload, if the server sent one.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::ServerCommunication { error_info, .. } => error_info.as_ref(),
            _ => None,
        }
    }

    /// The server's error code, if the server sent a structured payload.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_info().map(ErrorInfo::error_code)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
