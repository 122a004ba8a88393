// ── Server error payload ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// Closed set of error kinds the server reports in `ErrorInfo.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Zero or any code this client does not recognise.
    Unknown,
    InternalServerError,
    PermissionNotSufficient,
    QuotaViolation,
    BadInputParameter,
    WriteFailed,
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        match code {
            8000 => Self::InternalServerError,
            8001 => Self::PermissionNotSufficient,
            8002 => Self::QuotaViolation,
            8003 => Self::BadInputParameter,
            8004 => Self::WriteFailed,
            _ => Self::Unknown,
        }
    }
}

/// Structured error body sent with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(default)]
    pub description: String,
    pub code: i32,
    #[serde(rename = "moreInfo", default)]
    pub more_info_url: Option<String>,
    #[serde(rename = "apiver", default)]
    pub api_version: i32,
}

impl ErrorInfo {
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self.code)
    }
}
