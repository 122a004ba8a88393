//! CLI error types with miette diagnostics.
//!
//! Maps `iotticket_api::Error` and `ConfigError` into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use iotticket_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    /// 128 + SIGINT, as a shell reports an interrupted command.
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(iotticket::connection_failed),
        help(
            "Check the API URL and your network connection.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(iotticket::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) against test servers.")
    )]
    TlsError { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(iotticket::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: iotticket config set-password --profile <name>"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(iotticket::no_credentials),
        help(
            "Pass --username and set IOTTICKET_PASSWORD,\n\
             or add a profile to the config file (see: iotticket config path)."
        )
    )]
    NoCredentials { profile: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(code(iotticket::permission_denied))]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(
        code(iotticket::not_found),
        help("Run: iotticket devices list to see available devices")
    )]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(iotticket::api_error), help("{hint}"))]
    ApiError {
        status: u16,
        message: String,
        hint: String,
    },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(code(iotticket::unexpected_response))]
    UnexpectedResponse { message: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(iotticket::cancelled))]
    Cancelled,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(iotticket::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(iotticket::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(iotticket::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(iotticket::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Cancelled => exit_code::CANCELLED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<iotticket_api::Error> for CliError {
    fn from(err: iotticket_api::Error) -> Self {
        use iotticket_api::Error as LibError;

        match err {
            LibError::Cancelled => CliError::Cancelled,

            LibError::Transport(source) => CliError::ConnectionFailed {
                url: source.url().map(ToString::to_string).unwrap_or_default(),
                source: Box::new(source),
            },

            LibError::Tls(reason) => CliError::TlsError { reason },

            LibError::InvalidArgument { argument, reason } => CliError::Validation {
                field: argument.into(),
                reason,
            },

            LibError::UnsupportedDataType(kind) => CliError::Validation {
                field: "value".into(),
                reason: format!("unsupported data type: {kind}"),
            },

            LibError::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            LibError::ServerCommunication {
                status,
                message,
                error_info,
                ..
            } => match status {
                401 => CliError::AuthFailed { message },
                403 => CliError::PermissionDenied { message },
                404 => CliError::NotFound { message },
                _ => CliError::ApiError {
                    status,
                    message,
                    hint: error_info
                        .map(|info| {
                            let mut hint = format!("Server error code: {}", info.error_code());
                            if let Some(more) = info.more_info_url {
                                hint.push_str(&format!("\nMore info: {more}"));
                            }
                            hint
                        })
                        .unwrap_or_default(),
                },
            },

            LibError::Serialization { message } => CliError::Validation {
                field: "value".into(),
                reason: message,
            },

            LibError::Deserialization { message, .. } => {
                CliError::UnexpectedResponse { message }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(status: u16) -> iotticket_api::Error {
        iotticket_api::Error::ServerCommunication {
            status,
            message: "nope".into(),
            body: String::new(),
            error_info: None,
        }
    }

    #[test]
    fn server_statuses_map_to_exit_codes() {
        assert_eq!(CliError::from(server_error(401)).exit_code(), exit_code::AUTH);
        assert_eq!(CliError::from(server_error(403)).exit_code(), exit_code::PERMISSION);
        assert_eq!(CliError::from(server_error(404)).exit_code(), exit_code::NOT_FOUND);
        assert_eq!(CliError::from(server_error(500)).exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn cancellation_exits_like_sigint() {
        let err = CliError::from(iotticket_api::Error::Cancelled);
        assert_eq!(err.exit_code(), exit_code::CANCELLED);
    }

    #[test]
    fn missing_credentials_is_an_auth_failure() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
