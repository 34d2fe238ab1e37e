//! Show command handlers

use super::fail;
use crate::cli::CreateArgs;
use crate::domain::{ShowId, ShowRef};
use crate::error::CatalogError;
use crate::models::show::format_announcement_date;
use crate::models::{Show, ShowDraft, TeamMemberInput};
use crate::services::CatalogService;

/// Parses `"Name: Role, Role"`. Without a colon the whole text is the name.
fn parse_member(spec: &str) -> TeamMemberInput {
    match spec.split_once(':') {
        Some((name, roles)) => TeamMemberInput {
            name: name.trim().to_string(),
            roles: vec![roles.to_string()],
            ..TeamMemberInput::default()
        },
        None => TeamMemberInput::new(spec.trim()),
    }
}

pub async fn cmd_create_show(service: &dyn CatalogService, args: CreateArgs) -> anyhow::Result<()> {
    let title = args.title.clone();
    let draft = ShowDraft {
        title: args.title,
        network: args.network,
        studios: args.studios,
        genre: args.genre,
        subgenre: args.subgenre,
        episode_count: args.episodes,
        source_type: args.source_type,
        status: args.status,
        order_type: args.order_type,
        announcement_date: args.announced,
        notes: args.notes,
        team: args.members.iter().map(String::as_str).map(parse_member).collect(),
    };

    match service.create_show(draft).await {
        Ok(id) => {
            println!("✓ Created: {title}");
            println!("  ID: {id}");
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_show_info(service: &dyn CatalogService, show: &str) -> anyhow::Result<()> {
    let Some(id) = resolve_id(service, show).await? else {
        return fail(CatalogError::show_not_found(show.trim()));
    };

    let show = match service.get_show(id).await {
        Ok(show) => show,
        Err(err) => return fail(err),
    };
    let team = match service.list_team(&ShowRef::Id(id)).await {
        Ok(team) => team,
        Err(err) => return fail(err),
    };

    println!("{}", show.title);
    println!("{:-<70}", "");
    println!("ID:            {}", show.id);
    println!("Network:       {}", show.network);
    println!("Studios:       {}", show.studios.join(", "));
    print_optional("Genre", show.genre.as_deref());
    print_optional("Subgenre", show.subgenre.as_deref());
    if let Some(count) = show.episode_count {
        println!("Episodes:      {count}");
    }
    print_optional("Source", show.source_type.as_deref());
    print_optional("Status", show.status.as_deref());
    print_optional("Order", show.order_type.as_deref());
    if let Some(date) = show.announcement_date {
        println!("Announced:     {}", format_announcement_date(date));
    }
    print_optional("Notes", show.notes.as_deref());
    println!("Key creatives: {}", show.key_creatives);

    if !team.is_empty() {
        println!();
        println!("Team ({} members)", team.len());
        for member in team {
            println!("  {:>3}. {}", member.order, member.render());
        }
    }

    Ok(())
}

async fn find_by_title(service: &dyn CatalogService, title: &str) -> anyhow::Result<Option<Show>> {
    let wanted = title.trim().to_lowercase();
    Ok(service
        .list_shows()
        .await?
        .into_iter()
        .find(|s| s.title.to_lowercase() == wanted))
}

fn print_optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{:<15}{value}", format!("{label}:"));
    }
}

fn print_show_line(show: &Show) {
    let status = show.status.as_deref().unwrap_or("-");
    println!("• {} [{}]", show.title, status);
    println!(
        "  ID: {} | Network: {} | Studios: {}",
        show.id,
        show.network,
        show.studios.join(", ")
    );
}

pub async fn cmd_list_shows(service: &dyn CatalogService) -> anyhow::Result<()> {
    let shows = match service.list_shows().await {
        Ok(shows) => shows,
        Err(err) => return fail(err),
    };

    if shows.is_empty() {
        println!("No shows in the catalog.");
        println!();
        println!("Add one with:");
        println!("  showtrack create \"Title\" --network NBC --studio \"Universal Television\"");
        return Ok(());
    }

    println!("Shows ({} total)", shows.len());
    println!("{:-<70}", "");
    for show in &shows {
        print_show_line(show);
    }

    Ok(())
}

pub async fn cmd_search_shows(service: &dyn CatalogService, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let results = match service.search_shows(query).await {
        Ok(results) => results,
        Err(err) => return fail(err),
    };

    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    println!("{} match(es)", results.len());
    println!("{:-<70}", "");
    for show in &results {
        print_show_line(show);
    }

    Ok(())
}

pub async fn cmd_rename_show(
    service: &dyn CatalogService,
    show: &str,
    new_title: &str,
) -> anyhow::Result<()> {
    let Some(id) = resolve_id(service, show).await? else {
        return fail(CatalogError::show_not_found(show.trim()));
    };

    match service.rename_show(id, new_title).await {
        Ok(show) => {
            println!("✓ Renamed to: {}", show.title);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_delete_show(
    service: &dyn CatalogService,
    show: &str,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let Some(id) = resolve_id(service, show).await? else {
        return fail(CatalogError::show_not_found(show.trim()));
    };
    let show = match service.get_show(id).await {
        Ok(show) => show,
        Err(err) => return fail(err),
    };

    if !skip_confirm {
        println!("Delete '{}' (ID: {}) and its team?", show.title, show.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match service.delete_show(id).await {
        Ok(()) => {
            println!("✓ Deleted: {}", show.title);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

async fn resolve_id(
    service: &dyn CatalogService,
    show: &str,
) -> anyhow::Result<Option<ShowId>> {
    match ShowRef::parse(show) {
        ShowRef::Id(id) => Ok(Some(id)),
        ShowRef::Title(title) => Ok(find_by_title(service, &title).await?.map(|s| s.id)),
    }
}
