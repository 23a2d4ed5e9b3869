//! Account-settings command handlers for the signed-in user.

use secrecy::SecretString;

use tessera_core::Console;

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{users, util};

pub async fn handle(
    console: &Console,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Show => {
            let user = console
                .api()
                .account()
                .await
                .map_err(|e| util::api_failure(console, e, "fetching your account"))?;

            let out = output::render_single(&global.output, &user, users::user_detail, |u| {
                u.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountCommand::Update { name, email } => {
            if name.is_none() && email.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to update -- pass --name and/or --email".into(),
                });
            }

            let user = console
                .api()
                .update_account(name.as_deref(), email.as_deref())
                .await
                .map_err(|e| util::api_failure(console, e, "updating your account"))?;

            console.notifications().success(
                "Account updated",
                Some(format!("Your profile is now {} <{}>.", user.name, user.email)),
            );
            Ok(())
        }

        AccountCommand::ChangePassword => {
            let current: SecretString = dialoguer::Password::new()
                .with_prompt("Current password")
                .interact()
                .map_err(util::prompt_err)?
                .into();

            let new: SecretString = dialoguer::Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm new password", "Passwords do not match")
                .interact()
                .map_err(util::prompt_err)?
                .into();

            let message = console
                .api()
                .change_password(&current, &new)
                .await
                .map_err(|e| util::api_failure(console, e, "changing your password"))?;

            console.notifications().success("Password changed", Some(message));
            Ok(())
        }
    }
}
