//! Team command handlers

use super::fail;
use crate::domain::ShowRef;
use crate::models::{TeamMember, TeamMemberInput};
use crate::services::CatalogService;

fn print_team(team: &[TeamMember]) {
    if team.is_empty() {
        println!("No team members.");
        return;
    }
    for member in team {
        println!("  {:>3}. {}", member.order, member.render());
        if let Some(notes) = &member.notes {
            println!("       {notes}");
        }
    }
}

pub async fn cmd_team_list(service: &dyn CatalogService, show: &str) -> anyhow::Result<()> {
    match service.list_team(&ShowRef::parse(show)).await {
        Ok(team) => {
            println!("Team ({} members)", team.len());
            println!("{:-<70}", "");
            print_team(&team);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_team_add(
    service: &dyn CatalogService,
    show: &str,
    member: TeamMemberInput,
) -> anyhow::Result<()> {
    let name = member.name.clone();
    match service.add_team_member(&ShowRef::parse(show), member).await {
        Ok(team) => {
            println!("✓ Added: {name}");
            print_team(&team);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_team_remove(
    service: &dyn CatalogService,
    show: &str,
    name: &str,
) -> anyhow::Result<()> {
    match service.remove_team_member(&ShowRef::parse(show), name).await {
        Ok(team) => {
            println!("✓ Removed: {name}");
            print_team(&team);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_team_add_role(
    service: &dyn CatalogService,
    show: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<()> {
    match service.add_role(&ShowRef::parse(show), name, role).await {
        Ok(team) => {
            println!("✓ Updated roles for {name}");
            print_team(&team);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub async fn cmd_team_remove_role(
    service: &dyn CatalogService,
    show: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<()> {
    match service.remove_role(&ShowRef::parse(show), name, role).await {
        Ok(team) => {
            if team.iter().any(|m| m.has_name(name)) {
                println!("✓ Removed role '{role}' from {name}");
            } else {
                println!("✓ Removed {name} (no roles left)");
            }
            print_team(&team);
            Ok(())
        }
        Err(err) => fail(err),
    }
}
