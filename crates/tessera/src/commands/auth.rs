//! Login / logout / whoami handlers.

use secrecy::{ExposeSecret, SecretString};

use tessera_config::CachedTokens;
use tessera_core::{Console, CoreError};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::{users, util};

pub async fn login(console: &Console, args: LoginArgs, ctx: &super::SessionCtx) -> Result<(), CliError> {
    let email: String = match args.email.or_else(|| ctx.profile_email.clone()) {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    let password: SecretString = match args.password {
        Some(password) => password.into(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(util::prompt_err)?
            .into(),
    };

    match console.login(&email, &password).await {
        Ok(user) => {
            console.notifications().success(
                "Signed in",
                Some(format!("Signed in as {} ({})", user.name, user.role)),
            );
            Ok(())
        }
        Err(err) => {
            let message = match &err {
                CoreError::AuthenticationFailed { message } => message.clone(),
                other => other.to_string(),
            };
            console
                .notifications()
                .error("Sign-in failed", Some(message), false);
            Err(err.into())
        }
    }
}

pub async fn logout(console: &Console, ctx: &super::SessionCtx) -> Result<(), CliError> {
    console.logout().await;
    tessera_config::clear_tokens(&ctx.profile)?;
    console
        .notifications()
        .success("Signed out", Some("The cached session was removed.".into()));
    Ok(())
}

pub async fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let user = console
        .api()
        .me()
        .await
        .map_err(|e| util::api_failure(console, e, "fetching the signed-in user"))?;

    let out = output::render_single(&global.output, &user, users::user_detail, |u| {
        u.id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Persist the session's current token pair for this profile.
pub fn persist_session(console: &Console, profile: &str) -> Result<(), CliError> {
    if let (Some(access), Some(refresh)) = (
        console.session().access_token(),
        console.session().refresh_token(),
    ) {
        tessera_config::save_tokens(
            profile,
            &CachedTokens {
                access: access.expose_secret().to_owned(),
                refresh: refresh.expose_secret().to_owned(),
            },
        )?;
    }
    Ok(())
}
