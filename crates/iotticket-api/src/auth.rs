// HTTP Basic credentials
//
// The password is held as a `SecretString` and only exposed while the
// `Authorization` header value is being built; the resulting header is
// marked sensitive so it never shows up in `Debug` output.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::query::ensure_not_blank;

/// Username and password for HTTP Basic authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Fails with [`Error::InvalidArgument`] for a blank username.
    pub fn new(username: impl Into<String>, password: SecretString) -> Result<Self, Error> {
        let username = username.into();
        ensure_not_blank("username", &username)?;
        if username.contains(':') {
            return Err(Error::invalid_argument(
                "username",
                "must not contain ':' (reserved by Basic authentication)",
            ));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic base64(username:password)`, flagged sensitive.
    pub(crate) fn basic_header(&self) -> Result<HeaderValue, Error> {
        let token = BASE64.encode(format!(
            "{}:{}",
            self.username,
            self.password.expose_secret()
        ));
        let mut value = HeaderValue::from_str(&format!("Basic {token}")).map_err(|e| {
            Error::invalid_argument("credentials", format!("invalid header value: {e}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}
