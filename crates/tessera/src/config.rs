//! Resolution glue between `GlobalOpts`, the config file, and
//! `ConsoleConfig`.

use std::time::Duration;

use tessera_config::Config;
use tessera_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The resolved connection settings plus profile metadata the commands
/// need (default login email).
pub struct Resolved {
    pub console: ConsoleConfig,
    pub profile_email: Option<String>,
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI
/// overrides. A `--server` flag works without any config file.
pub fn resolve(cfg: &Config, profile_name: &str, global: &GlobalOpts) -> Result<Resolved, CliError> {
    // A configured profile wins; flags override its details.
    if let Some(profile) = cfg.profiles.get(profile_name) {
        let console =
            tessera_config::resolve_profile(profile, &cfg.defaults, global.insecure, global.timeout)?;
        return Ok(Resolved {
            console,
            profile_email: profile.email.clone(),
        });
    }

    // The user named a profile that doesn't exist.
    if global.profile.is_some() && global.server.is_none() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name.to_owned(),
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile -- build from --server / env alone.
    let server = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: tessera_config::config_path().display().to_string(),
    })?;

    let url: url::Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(Resolved {
        console: ConsoleConfig {
            url,
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        },
        profile_email: None,
    })
}
