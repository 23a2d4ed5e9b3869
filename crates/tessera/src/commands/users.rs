//! User administration command handlers.

use tabled::Tabled;

use tessera_api::types::{ListQuery, RegisterUser, User, UserUpdate};
use tessera_core::Console;

use crate::cli::{GlobalOpts, OutputFormat, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "ACTIVE")]
    active: &'static str,
}

fn user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        active: util::yes_no(user.is_active),
    }
}

pub(crate) fn user_detail(user: &User) -> String {
    [
        format!("User #{}", user.id),
        format!("  name:    {}", user.name),
        format!("  email:   {}", user.email),
        format!("  role:    {}", user.role),
        format!("  active:  {}", util::yes_no(user.is_active)),
        format!("  created: {}", util::fmt_time(&user.created_at)),
    ]
    .join("\n")
}

pub async fn handle(
    console: &Console,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => {
            let query = ListQuery {
                page: list.page,
                search: list.search,
                per_page: list.per_page,
            };
            let page = console
                .api()
                .list_users(&query)
                .await
                .map_err(|e| util::api_failure(console, e, "listing users"))?;

            let out = output::render_list(&global.output, &page.data, user_row, |u| {
                u.id.to_string()
            });
            output::print_output(&out, global.quiet);
            if !global.quiet && matches!(global.output, OutputFormat::Table) {
                eprintln!(
                    "page {}/{} ({} total)",
                    page.meta.current_page, page.meta.last_page, page.meta.total
                );
            }
            Ok(())
        }

        UsersCommand::Show { id } => {
            let user = console
                .api()
                .get_user(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the user"))?;

            let out = output::render_single(&global.output, &user, user_detail, |u| {
                u.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Register {
            name,
            email,
            role,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => dialoguer::Password::new()
                    .with_prompt("Initial password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(util::prompt_err)?,
            };

            let user = console
                .api()
                .register_user(&RegisterUser {
                    name,
                    email,
                    password,
                    role: role.into(),
                })
                .await
                .map_err(|e| util::api_failure(console, e, "registering the user"))?;

            console.notifications().success(
                "User registered",
                Some(format!("{} ({}) can now sign in.", user.name, user.email)),
            );
            let out = output::render_single(&global.output, &user, user_detail, |u| {
                u.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            name,
            email,
            role,
            active,
        } => {
            if name.is_none() && email.is_none() && role.is_none() && active.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to update -- pass at least one field flag".into(),
                });
            }

            let user = console
                .api()
                .update_user(
                    id,
                    &UserUpdate {
                        name,
                        email,
                        role: role.map(Into::into),
                        is_active: active,
                    },
                )
                .await
                .map_err(|e| util::api_failure(console, e, "updating the user"))?;

            console.notifications().success(
                "User updated",
                Some(format!("Changes to {} were saved.", user.name)),
            );
            Ok(())
        }

        UsersCommand::Delete { id } => {
            let user = console
                .api()
                .get_user(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the user"))?;

            if !util::confirm(
                &format!(
                    "Delete user \"{}\" <{}>? This cannot be undone.",
                    user.name, user.email
                ),
                global.yes,
            )? {
                return Ok(());
            }

            console
                .api()
                .delete_user(id)
                .await
                .map_err(|e| util::api_failure(console, e, "deleting the user"))?;

            console.notifications().success(
                "User deleted",
                Some(format!("{} was permanently deleted.", user.name)),
            );
            Ok(())
        }
    }
}
