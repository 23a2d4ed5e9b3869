//! Digital-card command handlers.

use tabled::Tabled;

use tessera_api::types::{
    CardPayload, DigitalCard, ListQuery, PersonalInfoPayload, StatusToggle,
};
use tessera_core::Console;

use crate::cli::{CardCreateArgs, CardUpdateArgs, CardsArgs, CardsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "SLUG")]
    slug: String,
    #[tabled(rename = "ACTIVE")]
    active: &'static str,
    #[tabled(rename = "PUBLIC")]
    public: &'static str,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

fn card_row(card: &DigitalCard) -> CardRow {
    CardRow {
        id: card.id,
        name: card.display_name().to_owned(),
        slug: card.slug.clone(),
        active: util::yes_no(card.is_active),
        public: util::yes_no(card.is_public),
        updated: util::fmt_time(&card.updated_at),
    }
}

fn card_detail(card: &DigitalCard) -> String {
    let mut lines = vec![
        format!("Card #{} ({})", card.id, card.slug),
        format!("  name:     {}", card.display_name()),
        format!("  active:   {}", util::yes_no(card.is_active)),
        format!("  public:   {}", util::yes_no(card.is_public)),
    ];
    if let Some(ref info) = card.personal_info {
        if let Some(ref title) = info.title {
            lines.push(format!("  title:    {title}"));
        }
        if let Some(ref location) = info.location {
            lines.push(format!("  location: {location}"));
        }
        if let Some(ref photo) = info.photo {
            lines.push(format!("  photo:    {photo}"));
        }
    }
    if let Some(ref contact) = card.contact_info {
        if let Some(ref email) = contact.email {
            lines.push(format!("  email:    {email}"));
        }
        if let Some(ref phone) = contact.phone {
            lines.push(format!("  phone:    {phone}"));
        }
        if let Some(ref website) = contact.website {
            lines.push(format!("  website:  {website}"));
        }
    }
    if let Some(ref about) = card.about_info {
        if let Some(ref description) = about.description {
            lines.push(format!("  about:    {description}"));
        }
        if let Some(ref skills) = about.skills {
            lines.push(format!("  skills:   {}", skills.join(", ")));
        }
    }
    lines.push(format!("  updated:  {}", util::fmt_time(&card.updated_at)));
    lines.join("\n")
}

pub async fn handle(
    console: &Console,
    args: CardsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CardsCommand::List(list) => {
            let query = ListQuery {
                page: list.page,
                search: list.search,
                per_page: list.per_page,
            };
            let page = console
                .api()
                .list_cards(&query)
                .await
                .map_err(|e| util::api_failure(console, e, "listing cards"))?;

            let out = output::render_list(&global.output, &page.data, card_row, |c| {
                c.id.to_string()
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

        CardsCommand::Show { id } => {
            let card = console
                .api()
                .get_card(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the card"))?;

            let out = output::render_single(&global.output, &card, card_detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CardsCommand::Create(create) => {
            let payload = create_payload(&create)?;
            let card = console
                .api()
                .create_card(&payload)
                .await
                .map_err(|e| util::api_failure(console, e, "creating the card"))?;

            console.notifications().card_created(card.display_name());
            let out = output::render_single(&global.output, &card, card_detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CardsCommand::Update(update) => {
            let payload = update_payload(&update)?;
            let card = console
                .api()
                .update_card(update.id, &payload)
                .await
                .map_err(|e| util::api_failure(console, e, "updating the card"))?;

            console.notifications().card_updated(card.display_name());
            let out = output::render_single(&global.output, &card, card_detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CardsCommand::Delete { id } => {
            let card = console
                .api()
                .get_card(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the card"))?;
            let name = card.display_name().to_owned();

            if !util::confirm(
                &format!("Delete card \"{name}\" (id {id})? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }

            match console.api().delete_card(id).await {
                Ok(_) => {
                    console.notifications().card_deleted(&name);
                    Ok(())
                }
                Err(err) => {
                    console.notifications().card_delete_error(&name);
                    Err(CliError::Operation {
                        context: "deleting the card".into(),
                        source: err.into(),
                    })
                }
            }
        }

        CardsCommand::Toggle { id, active, public } => {
            if active.is_none() && public.is_none() {
                return Err(CliError::Validation {
                    field: "toggle".into(),
                    reason: "pass --active and/or --public".into(),
                });
            }

            let card = console
                .api()
                .toggle_card_status(
                    id,
                    StatusToggle {
                        is_active: active,
                        is_public: public,
                    },
                )
                .await
                .map_err(|e| util::api_failure(console, e, "updating the card status"))?;

            console.notifications().success(
                "Card status updated",
                Some(format!(
                    "\"{}\" is now {} and {}.",
                    card.display_name(),
                    if card.is_active { "active" } else { "inactive" },
                    if card.is_public { "public" } else { "private" },
                )),
            );
            Ok(())
        }

        CardsCommand::UploadImage { id, path } => {
            let bytes = std::fs::read(&path)?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_owned();

            match console.api().upload_card_image(id, &filename, bytes).await {
                Ok(upload) => {
                    console.notifications().image_uploaded();
                    if !global.quiet {
                        eprintln!("{}", upload.full_url);
                    }
                    Ok(())
                }
                Err(err) => {
                    let detail = err.message().map(str::to_owned);
                    console.notifications().image_upload_error(detail);
                    Err(CliError::Operation {
                        context: "uploading the image".into(),
                        source: err.into(),
                    })
                }
            }
        }

        CardsCommand::DeleteImage { id } => {
            let message = console
                .api()
                .delete_card_image(id)
                .await
                .map_err(|e| util::api_failure(console, e, "removing the image"))?;

            console.notifications().success("Image removed", Some(message));
            Ok(())
        }
    }
}

fn create_payload(args: &CardCreateArgs) -> Result<CardPayload, CliError> {
    if let Some(ref path) = args.from_file {
        return util::read_json_payload(path);
    }

    let name = args.name.clone().ok_or_else(|| CliError::Validation {
        field: "name".into(),
        reason: "pass --name or --from-file".into(),
    })?;

    Ok(CardPayload {
        personal_info: Some(PersonalInfoPayload {
            name: Some(name),
            title: args.title.clone(),
            location: args.location.clone(),
            photo: None,
        }),
        is_active: args.active.then_some(true),
        is_public: args.public.then_some(true),
        ..CardPayload::default()
    })
}

fn update_payload(args: &CardUpdateArgs) -> Result<CardPayload, CliError> {
    if let Some(ref path) = args.from_file {
        return util::read_json_payload(path);
    }

    if args.name.is_none() && args.title.is_none() && args.location.is_none() {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "nothing to update -- pass at least one field flag or --from-file".into(),
        });
    }

    Ok(CardPayload {
        personal_info: Some(PersonalInfoPayload {
            name: args.name.clone(),
            title: args.title.clone(),
            location: args.location.clone(),
            photo: None,
        }),
        ..CardPayload::default()
    })
}
