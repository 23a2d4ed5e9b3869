//! Config subcommand handlers.
//!
//! These run before any backend connection exists, so they take only the
//! parsed args and global flags.

use dialoguer::Input;

use tessera_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = tessera_config::config_path();
            eprintln!("tessera — configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(util::prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Backend URL")
                .default("https://cards.example.com".into())
                .interact_text()
                .map_err(util::prompt_err)?;

            // Validate early so a typo doesn't land in the file.
            server.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {server}"),
            })?;

            let email: String = Input::new()
                .with_prompt("Login email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;

            let mut cfg = tessera_config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    email: if email.is_empty() { None } else { Some(email) },
                    ca_cert: None,
                    insecure: None,
                    timeout: None,
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            tessera_config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("\nProfile '{profile_name}' saved. Sign in with: tessera login");
            }
            Ok(())
        }

        // ── Show / Path / Profiles ──────────────────────────────────
        ConfigCommand::Show => {
            let cfg = tessera_config::load_config_or_default();
            println!("{}", toml_string(&cfg)?);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", tessera_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = tessera_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");

            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort_unstable();

            if names.is_empty() {
                eprintln!("No profiles configured. Create one with: tessera config init");
                return Ok(());
            }
            for name in names {
                let marker = if name == default { "*" } else { " " };
                let server = cfg
                    .profiles
                    .get(name)
                    .map(|p| p.server.as_str())
                    .unwrap_or_default();
                println!("{marker} {name}\t{server}");
            }
            Ok(())
        }
    }
}

fn toml_string(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    })
}
