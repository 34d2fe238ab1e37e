pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod dictionary;
pub mod domain;
pub mod entities;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ResolveCommands, TeamCommands};
pub use config::Config;
use db::SqlRowStore;
use db::repositories::DictionaryRepository;
use dictionary::{DictionaryDomain, NameResolver, builtin};
use models::TeamMemberInput;
use services::{CatalogService, RowStoreCatalogService};
use store::RowStore;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("showtrack - TV development catalog");
        println!("Run 'showtrack --help' for commands.");
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        return cli::cmd_init();
    }

    let service = open_catalog(&config).await?;
    dispatch(service.as_ref(), command).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Connects the SQLite store and builds the catalog service on it.
pub async fn open_catalog(config: &Config) -> anyhow::Result<Arc<dyn CatalogService>> {
    let store = SqlRowStore::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open catalog database")?;

    build_catalog(Arc::new(store), config).await
}

/// Loads the dictionaries from `store` (seeding empty tables when enabled)
/// and wires the service.
pub async fn build_catalog(
    store: Arc<dyn RowStore>,
    config: &Config,
) -> anyhow::Result<Arc<dyn CatalogService>> {
    let resolver = load_resolver(store.clone(), config).await?;
    Ok(Arc::new(RowStoreCatalogService::new(
        store,
        Arc::new(resolver),
        config,
    )))
}

pub async fn load_resolver(
    store: Arc<dyn RowStore>,
    config: &Config,
) -> anyhow::Result<NameResolver> {
    let dictionaries = DictionaryRepository::new(store);

    if config.dictionaries.seed_builtin {
        for (domain, entries) in [
            (DictionaryDomain::Studios, builtin::studio_entries()),
            (DictionaryDomain::Roles, builtin::role_entries()),
        ] {
            dictionaries.seed_if_empty(domain, &entries).await?;
        }
    }

    let studios = dictionaries
        .load(DictionaryDomain::Studios)
        .await
        .context("Failed to load studio dictionary")?;
    let roles = dictionaries
        .load(DictionaryDomain::Roles)
        .await
        .context("Failed to load role dictionary")?;

    Ok(NameResolver::new(studios, roles))
}

async fn dispatch(service: &dyn CatalogService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Create(args) => cli::cmd_create_show(service, args).await,
        Commands::Show { show } => cli::cmd_show_info(service, &show).await,
        Commands::List => cli::cmd_list_shows(service).await,
        Commands::Search { query } => cli::cmd_search_shows(service, &query.join(" ")).await,
        Commands::Rename { show, title } => cli::cmd_rename_show(service, &show, &title).await,
        Commands::Delete { show, yes } => cli::cmd_delete_show(service, &show, yes).await,
        Commands::Team { command } => match command {
            TeamCommands::List { show } => cli::cmd_team_list(service, &show).await,
            TeamCommands::Add {
                show,
                name,
                roles,
                order,
                notes,
            } => {
                let member = TeamMemberInput {
                    name,
                    roles,
                    order,
                    notes,
                };
                cli::cmd_team_add(service, &show, member).await
            }
            TeamCommands::Remove { show, name } => {
                cli::cmd_team_remove(service, &show, &name).await
            }
            TeamCommands::AddRole { show, name, role } => {
                cli::cmd_team_add_role(service, &show, &name, &role).await
            }
            TeamCommands::RemoveRole { show, name, role } => {
                cli::cmd_team_remove_role(service, &show, &name, &role).await
            }
        },
        Commands::Resolve { command } => {
            match command {
                ResolveCommands::Studio { input } => {
                    cli::cmd_resolve_studios(service, &input.join(" "));
                }
                ResolveCommands::Role { input } => {
                    cli::cmd_resolve_roles(service, &input.join(" "));
                }
            }
            Ok(())
        }
        Commands::Audit => cli::cmd_audit(service).await,
        Commands::Resync => cli::cmd_resync(service).await,
        Commands::Init => cli::cmd_init(),
    }
}
