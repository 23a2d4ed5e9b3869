mod cli;
mod commands;
mod config;
mod error;
mod output;
mod toast;

use clap::Parser;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use tessera_api::{SessionState, TokenPair};
use tessera_core::Console;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global).await,

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "tessera", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the backend
        cmd => {
            let cfg = tessera_config::load_config_or_default();
            let profile_name =
                tessera_config::active_profile_name(cli.global.profile.as_deref(), &cfg);
            let resolved = config::resolve(&cfg, &profile_name, &cli.global)?;
            let console = Console::new(&resolved.console)?;

            // Restore the cached session for this profile, if any.
            let cached_access = tessera_config::load_tokens(&profile_name).map(|cached| {
                let access = cached.access.clone();
                console.restore_session(TokenPair {
                    access: cached.access.into(),
                    refresh: cached.refresh.into(),
                });
                access
            });

            let ctx = commands::SessionCtx {
                profile: profile_name.clone(),
                profile_email: resolved.profile_email,
            };

            tracing::debug!(command = ?cmd, profile = %profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &console, &cli.global, &ctx).await;

            match console.session().state() {
                // Forced sign-out after a failed refresh: drop the stale
                // cache so the next invocation starts clean.
                SessionState::Expired => {
                    let _ = tessera_config::clear_tokens(&profile_name);
                }
                // Tokens may be new (login) or rotated (mid-command
                // refresh) — persist them for the next invocation.
                SessionState::SignedIn => {
                    let access = console.session().access_token();
                    let changed = match (&cached_access, &access) {
                        (Some(old), Some(new)) => old.as_str() != new.expose_secret(),
                        (None, Some(_)) => true,
                        _ => false,
                    };
                    if changed {
                        let _ = commands::auth::persist_session(&console, &profile_name);
                    }
                }
                SessionState::SignedOut => {}
            }

            toast::flush(
                console.notifications(),
                output::should_color(&cli.global.color),
                cli.global.quiet,
            );

            result
        }
    }
}
