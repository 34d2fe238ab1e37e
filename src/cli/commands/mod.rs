mod maintenance;
mod resolve;
mod show;
mod team;

pub use maintenance::{cmd_audit, cmd_init, cmd_resync};
pub use resolve::{cmd_resolve_roles, cmd_resolve_studios};
pub use show::{
    cmd_create_show, cmd_delete_show, cmd_list_shows, cmd_rename_show, cmd_search_shows,
    cmd_show_info,
};
pub use team::{
    cmd_team_add, cmd_team_add_role, cmd_team_list, cmd_team_remove, cmd_team_remove_role,
};

use crate::error::CatalogError;

/// Prints an expected failure and carries on; incidents abort the command.
fn fail(err: CatalogError) -> anyhow::Result<()> {
    println!("✗ {}", err.user_message());
    if let Some(step) = err.step() {
        println!("  (during {step})");
    }

    if err.is_incident() {
        Err(err.into())
    } else {
        Ok(())
    }
}
