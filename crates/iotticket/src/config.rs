//! CLI configuration: thin wrapper around `iotticket_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --username, --password, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use iotticket_api::{ClientConfig, Credentials, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use iotticket_config::{
    Config, Profile, config_path, load_config_or_default, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the client configuration from the config file, the active
/// profile and CLI overrides.
///
/// Without a matching profile the flags and `IOTTICKET_*` env vars alone
/// must supply the credentials; the URL falls back to the public API.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profile(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    resolve_profile(&profile, &profile_name, &cfg, global)
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. Base URL (flag > env > profile)
    let url_str = global.url.as_deref().unwrap_or(&profile.url);
    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials (flag > profile chain)
    let username = match global.username {
        Some(ref user) => user.clone(),
        None => iotticket_config::resolve_username(profile, profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => iotticket_config::resolve_password(profile, profile_name)?,
    };
    let credentials = Credentials::new(username, password)?;

    // 3. TLS verification
    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        iotticket_config::tls_mode(profile, &cfg.defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(ClientConfig {
        base_url,
        credentials,
        transport: TransportConfig::default()
            .with_tls(tls)
            .with_timeout(Duration::from_secs(timeout)),
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
