//! Command dispatch: bridges CLI args -> API calls -> output + toasts.

pub mod account;
pub mod auth;
pub mod banners;
pub mod cards;
pub mod config_cmd;
pub mod users;
pub mod util;

use tessera_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Per-invocation session context resolved from the active profile.
pub struct SessionCtx {
    pub profile: String,
    pub profile_email: Option<String>,
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    global: &GlobalOpts,
    ctx: &SessionCtx,
) -> Result<(), CliError> {
    // Everything except `login` needs a session (cached or fresh).
    if !matches!(cmd, Command::Login(_)) && !console.session().is_authenticated() {
        return Err(CliError::NotSignedIn);
    }

    match cmd {
        Command::Login(args) => auth::login(console, args, ctx).await,
        Command::Logout => auth::logout(console, ctx).await,
        Command::Whoami => auth::whoami(console, global).await,
        Command::Cards(args) => cards::handle(console, args, global).await,
        Command::Banners(args) => banners::handle(console, args, global).await,
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Account(args) => account::handle(console, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
