//! Audit, resync, and init handlers

use super::fail;
use crate::config::Config;
use crate::services::CatalogService;
use std::path::Path;

pub async fn cmd_audit(service: &dyn CatalogService) -> anyhow::Result<()> {
    let divergences = match service.audit().await {
        Ok(divergences) => divergences,
        Err(err) => return fail(err),
    };

    if divergences.is_empty() {
        println!("✓ All shows are in sync.");
        return Ok(());
    }

    println!("{} show(s) out of sync", divergences.len());
    println!("{:-<70}", "");
    for err in &divergences {
        println!("✗ {err}");
    }
    println!();
    println!("Run 'showtrack resync' to rewrite them.");

    Ok(())
}

pub async fn cmd_resync(service: &dyn CatalogService) -> anyhow::Result<()> {
    match service.resync_all().await {
        Ok(0) => {
            println!("✓ Nothing to rewrite.");
            Ok(())
        }
        Ok(count) => {
            println!("✓ Rewrote key creatives for {count} show(s)");
            Ok(())
        }
        Err(err) => fail(err),
    }
}

pub fn cmd_init() -> anyhow::Result<()> {
    let path = Path::new("config.toml");
    if path.exists() {
        println!("config.toml already exists.");
        return Ok(());
    }

    Config::default().save_to_path(path)?;
    println!("✓ Created config.toml with defaults");
    Ok(())
}
