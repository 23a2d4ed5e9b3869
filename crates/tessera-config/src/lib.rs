//! Shared configuration for the tessera CLI.
//!
//! TOML profiles layered with `TESSERA_*` environment variables via
//! figment, translation to `tessera_core::ConsoleConfig`, and a per-profile
//! session-token cache under the platform data directory. Tokens are
//! short-lived session state, not long-lived secrets — they live in a
//! mode-0600 file rather than the system keyring.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tessera_core::{ConsoleConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' is configured")]
    ProfileNotFound { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "https://cards.example.com").
    pub server: String,

    /// Default login email for this profile.
    pub email: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed TLS certificates.
    pub insecure: Option<bool>,

    /// Request timeout override in seconds.
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tessera")
}

/// Canonical config file path (`~/.config/tessera/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("tessera-config.toml"))
}

/// Session-token cache path (`~/.local/share/tessera/tokens.toml` on Linux).
pub fn tokens_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("tokens.toml"))
        .unwrap_or_else(|| PathBuf::from("tessera-tokens.toml"))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config file layered with `TESSERA_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (used by tests and `--config` overrides).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TESSERA_"))
        .extract()?;
    Ok(config)
}

/// Load the config, falling back to defaults when none exists or it fails
/// to parse.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// The profile name to use: CLI flag wins, then the file's
/// `default_profile`, then `"default"`.
pub fn active_profile_name(cli_profile: Option<&str>, cfg: &Config) -> String {
    cli_profile
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a profile (plus override flags) into a `ConsoleConfig`.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    insecure_flag: bool,
    timeout_flag: Option<u64>,
) -> Result<ConsoleConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let insecure = insecure_flag || profile.insecure.unwrap_or(defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca) = profile.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = timeout_flag
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    Ok(ConsoleConfig {
        url,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

/// Serialize the config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Session-token cache ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
struct TokenFile {
    #[serde(default)]
    profiles: HashMap<String, CachedTokens>,
}

/// A persisted token pair for one profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CachedTokens {
    pub access: String,
    pub refresh: String,
}

/// Load the cached token pair for a profile, if any.
pub fn load_tokens(profile: &str) -> Option<CachedTokens> {
    load_tokens_from(&tokens_path(), profile)
}

pub fn load_tokens_from(path: &std::path::Path, profile: &str) -> Option<CachedTokens> {
    let raw = std::fs::read_to_string(path).ok()?;
    let file: TokenFile = toml::from_str(&raw).ok()?;
    file.profiles.get(profile).cloned()
}

/// Persist a token pair for a profile (file mode 0600 on unix).
pub fn save_tokens(profile: &str, tokens: &CachedTokens) -> Result<(), ConfigError> {
    save_tokens_to(&tokens_path(), profile, tokens)
}

pub fn save_tokens_to(
    path: &std::path::Path,
    profile: &str,
    tokens: &CachedTokens,
) -> Result<(), ConfigError> {
    let mut file: TokenFile = std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| toml::from_str(&raw).ok())
        .unwrap_or_default();
    file.profiles.insert(profile.to_owned(), tokens.clone());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(&file)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Drop the cached token pair for a profile. Missing file or profile is
/// not an error.
pub fn clear_tokens(profile: &str) -> Result<(), ConfigError> {
    clear_tokens_from(&tokens_path(), profile)
}

pub fn clear_tokens_from(path: &std::path::Path, profile: &str) -> Result<(), ConfigError> {
    let Some(raw) = std::fs::read_to_string(path).ok() else {
        return Ok(());
    };
    let mut file: TokenFile = toml::from_str(&raw).unwrap_or_default();
    if file.profiles.remove(profile).is_some() {
        std::fs::write(path, toml::to_string_pretty(&file)?)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            email: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    #[test]
    fn resolve_profile_parses_the_server_url() {
        let cfg = resolve_profile(
            &profile("https://cards.example.com"),
            &Defaults::default(),
            false,
            None,
        )
        .unwrap();
        assert_eq!(cfg.url.as_str(), "https://cards.example.com/");
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn resolve_profile_rejects_invalid_urls() {
        let result = resolve_profile(
            &profile("not a url"),
            &Defaults::default(),
            false,
            None,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn insecure_flag_overrides_tls() {
        let cfg = resolve_profile(
            &profile("https://cards.example.com"),
            &Defaults::default(),
            true,
            None,
        )
        .unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn timeout_precedence_is_flag_then_profile_then_defaults() {
        let mut p = profile("https://cards.example.com");
        p.timeout = Some(60);

        let cfg = resolve_profile(&p, &Defaults::default(), false, Some(5)).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(5));

        let cfg = resolve_profile(&p, &Defaults::default(), false, None).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(60));
    }

    #[test]
    fn active_profile_prefers_the_cli_flag() {
        let mut cfg = Config::default();
        cfg.default_profile = Some("staging".into());
        assert_eq!(active_profile_name(Some("prod"), &cfg), "prod");
        assert_eq!(active_profile_name(None, &cfg), "staging");
        cfg.default_profile = None;
        assert_eq!(active_profile_name(None, &cfg), "default");
    }

    #[test]
    fn token_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.toml");

        assert!(load_tokens_from(&path, "default").is_none());

        save_tokens_to(
            &path,
            "default",
            &CachedTokens {
                access: "acc".into(),
                refresh: "ref".into(),
            },
        )
        .unwrap();

        let cached = load_tokens_from(&path, "default").unwrap();
        assert_eq!(cached.access, "acc");
        assert_eq!(cached.refresh, "ref");

        clear_tokens_from(&path, "default").unwrap();
        assert!(load_tokens_from(&path, "default").is_none());

        // Clearing again (or a missing profile) is a no-op.
        clear_tokens_from(&path, "default").unwrap();
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("prod".into(), profile("https://cards.example.com"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.profiles.contains_key("prod"));
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
    }
}
