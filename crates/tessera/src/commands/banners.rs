//! Banner command handlers.

use tabled::Tabled;

use tessera_api::types::{Banner, BannerPayload, ListQuery};
use tessera_core::Console;

use crate::cli::{
    BannerCreateArgs, BannerUpdateArgs, BannersArgs, BannersCommand, GlobalOpts, OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct BannerRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "POSITION")]
    position: u32,
    #[tabled(rename = "ACTIVE")]
    active: &'static str,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

fn banner_row(banner: &Banner) -> BannerRow {
    BannerRow {
        id: banner.id,
        title: banner.title.clone(),
        position: banner.position,
        active: util::yes_no(banner.is_active),
        updated: util::fmt_time(&banner.updated_at),
    }
}

fn banner_detail(banner: &Banner) -> String {
    let mut lines = vec![
        format!("Banner #{}", banner.id),
        format!("  title:    {}", banner.title),
        format!("  position: {}", banner.position),
        format!("  active:   {}", util::yes_no(banner.is_active)),
    ];
    if let Some(ref image) = banner.image_url {
        lines.push(format!("  image:    {image}"));
    }
    if let Some(ref link) = banner.link_url {
        lines.push(format!("  link:     {link}"));
    }
    if let Some(ref starts) = banner.starts_at {
        lines.push(format!("  starts:   {}", util::fmt_time(starts)));
    }
    if let Some(ref ends) = banner.ends_at {
        lines.push(format!("  ends:     {}", util::fmt_time(ends)));
    }
    lines.join("\n")
}

pub async fn handle(
    console: &Console,
    args: BannersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BannersCommand::List(list) => {
            let query = ListQuery {
                page: list.page,
                search: list.search,
                per_page: list.per_page,
            };
            let page = console
                .api()
                .list_banners(&query)
                .await
                .map_err(|e| util::api_failure(console, e, "listing banners"))?;

            let out = output::render_list(&global.output, &page.data, banner_row, |b| {
                b.id.to_string()
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

        BannersCommand::Show { id } => {
            let banner = console
                .api()
                .get_banner(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the banner"))?;

            let out = output::render_single(&global.output, &banner, banner_detail, |b| {
                b.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BannersCommand::Create(create) => {
            let payload = create_payload(&create)?;
            let banner = console
                .api()
                .create_banner(&payload)
                .await
                .map_err(|e| util::api_failure(console, e, "creating the banner"))?;

            console.notifications().success(
                "Banner created",
                Some(format!("\"{}\" was created.", banner.title)),
            );
            let out = output::render_single(&global.output, &banner, banner_detail, |b| {
                b.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BannersCommand::Update(update) => {
            let payload = update_payload(&update)?;
            let banner = console
                .api()
                .update_banner(update.id, &payload)
                .await
                .map_err(|e| util::api_failure(console, e, "updating the banner"))?;

            console.notifications().success(
                "Banner updated",
                Some(format!("Changes to \"{}\" were saved.", banner.title)),
            );
            Ok(())
        }

        BannersCommand::Delete { id } => {
            let banner = console
                .api()
                .get_banner(id)
                .await
                .map_err(|e| util::api_failure(console, e, "fetching the banner"))?;

            if !util::confirm(
                &format!(
                    "Delete banner \"{}\" (id {id})? This cannot be undone.",
                    banner.title
                ),
                global.yes,
            )? {
                return Ok(());
            }

            console
                .api()
                .delete_banner(id)
                .await
                .map_err(|e| util::api_failure(console, e, "deleting the banner"))?;

            console.notifications().success(
                "Banner deleted",
                Some(format!("\"{}\" was permanently deleted.", banner.title)),
            );
            Ok(())
        }

        BannersCommand::Toggle { id, active } => {
            let banner = console
                .api()
                .toggle_banner(id, active)
                .await
                .map_err(|e| util::api_failure(console, e, "updating the banner status"))?;

            console.notifications().success(
                "Banner status updated",
                Some(format!(
                    "\"{}\" is now {}.",
                    banner.title,
                    if banner.is_active { "active" } else { "inactive" }
                )),
            );
            Ok(())
        }
    }
}

fn create_payload(args: &BannerCreateArgs) -> Result<BannerPayload, CliError> {
    if let Some(ref path) = args.from_file {
        return util::read_json_payload(path);
    }

    let title = args.title.clone().ok_or_else(|| CliError::Validation {
        field: "title".into(),
        reason: "pass --title or --from-file".into(),
    })?;

    Ok(BannerPayload {
        title: Some(title),
        image_url: args.image_url.clone(),
        link_url: args.link_url.clone(),
        position: args.position,
        ..BannerPayload::default()
    })
}

fn update_payload(args: &BannerUpdateArgs) -> Result<BannerPayload, CliError> {
    if let Some(ref path) = args.from_file {
        return util::read_json_payload(path);
    }

    if args.title.is_none()
        && args.image_url.is_none()
        && args.link_url.is_none()
        && args.position.is_none()
    {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "nothing to update -- pass at least one field flag or --from-file".into(),
        });
    }

    Ok(BannerPayload {
        title: args.title.clone(),
        image_url: args.image_url.clone(),
        link_url: args.link_url.clone(),
        position: args.position,
        ..BannerPayload::default()
    })
}
