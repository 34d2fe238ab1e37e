//! CLI module - Command-line interface for showtrack
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};

/// showtrack - TV development catalog
/// Tracks shows in development, their studios, and creative teams
#[derive(Parser)]
#[command(name = "showtrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a show to the catalog
    #[command(alias = "add")]
    Create(CreateArgs),

    /// Show details and team of one show
    #[command(alias = "i", alias = "info")]
    Show {
        /// Show id or title
        show: String,
    },

    /// List all shows
    #[command(alias = "ls", alias = "l")]
    List,

    /// Search title, network, studios, genre, and status
    #[command(alias = "s")]
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Change a show's title
    Rename {
        /// Show id or title
        show: String,
        /// New title
        title: String,
    },

    /// Delete a show and its team
    #[command(alias = "rm")]
    Delete {
        /// Show id or title
        show: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Manage a show's creative team
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Preview how names resolve against the dictionaries
    Resolve {
        #[command(subcommand)]
        command: ResolveCommands,
    },

    /// Check every show's key creatives against its team
    Audit,

    /// Recompute key creatives for every show
    Resync,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Show title
    pub title: String,

    #[arg(long)]
    pub network: String,

    /// Studio name; repeat or comma-separate for several
    #[arg(long = "studio", required = true)]
    pub studios: Vec<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub subgenre: Option<String>,

    #[arg(long)]
    pub episodes: Option<u32>,

    #[arg(long)]
    pub source_type: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub order_type: Option<String>,

    /// Announcement date, YYYY/MM/DD or YYYY-MM-DD
    #[arg(long)]
    pub announced: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Team member as "Name: Role, Role"; repeat for several
    #[arg(long = "member")]
    pub members: Vec<String>,
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// List a show's team in order
    #[command(alias = "ls")]
    List {
        /// Show id or title
        show: String,
    },
    /// Add a team member
    Add {
        /// Show id or title
        show: String,
        /// Member name
        name: String,
        /// Role; repeat or comma-separate for several
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
        /// Listing position (defaults to last)
        #[arg(long)]
        order: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a team member
    #[command(alias = "rm")]
    Remove {
        /// Show id or title
        show: String,
        /// Member name
        name: String,
    },
    /// Give a member another role
    AddRole {
        show: String,
        name: String,
        role: String,
    },
    /// Take a role away; the member is removed with their last role
    RemoveRole {
        show: String,
        name: String,
        role: String,
    },
}

#[derive(Subcommand)]
pub enum ResolveCommands {
    /// Resolve a comma-separated studio list
    Studio {
        #[arg(required = true)]
        input: Vec<String>,
    },
    /// Resolve a comma-separated role list
    Role {
        #[arg(required = true)]
        input: Vec<String>,
    },
}

pub use commands::*;
