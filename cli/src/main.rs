mod commands;
mod config;
mod menu_client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    ProfileEdit, cmd_categories, cmd_logout, cmd_menu, cmd_onboard, cmd_profile_edit,
    cmd_profile_show, cmd_refresh, cmd_status,
};
use crate::config::Config;
use crate::menu_client::MenuClient;
use lemon_core::service::MenuService;

#[derive(Parser)]
#[command(
    name = "lemon",
    version,
    about = "Browse the Little Lemon menu from a local cache",
    long_about = "\n\n  Little Lemon
  Chicago · Mediterranean

Browse the Little Lemon menu. The menu is downloaded once and served from a
local database afterwards; run `lemon refresh` to replace it with the latest."
)]
struct Cli {
    /// Path to the menu database (default: the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// Menu feed URL
    #[arg(long, global = true, value_name = "URL")]
    menu_url: Option<String>,
    /// Log sync activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu, optionally filtered by name and category
    Menu {
        /// Only items whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Only items in this category (repeatable)
        #[arg(short, long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List menu categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the menu again and replace the local copy
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show cache and sign-in status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign in by telling us who you are
    Onboard {
        /// First name
        #[arg(long)]
        first_name: String,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Email address
        #[arg(long)]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Sign out and clear your profile
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields and notification preferences
    Edit(ProfileEdit),
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "lemon=info,lemon_core=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db, cli.menu_url)?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        db = %config.db_path.display(),
        url = %config.menu_url,
        "loaded config"
    );
    let svc = MenuService::new(&config.db_path)?;
    let client = MenuClient::new(&config.menu_url)?;

    match cli.command {
        Commands::Menu {
            search,
            categories,
            json,
        } => cmd_menu(&svc, &client, search.as_deref(), &categories, json).await,
        Commands::Categories { json } => cmd_categories(&svc, &client, json).await,
        Commands::Refresh { json } => cmd_refresh(&svc, &client, json).await,
        Commands::Status { json } => cmd_status(&svc, json),
        Commands::Onboard {
            first_name,
            last_name,
            email,
            json,
        } => cmd_onboard(&svc, &first_name, last_name, &email, json),
        Commands::Profile { command } => match command {
            ProfileCommands::Show { json } => cmd_profile_show(&svc, json),
            ProfileCommands::Edit(edit) => cmd_profile_edit(&svc, &edit),
        },
        Commands::Logout { json } => cmd_logout(&svc, json),
    }
}
