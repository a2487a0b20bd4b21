//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use continuum_api::ApiClient;
use continuum_core::{BoardStore, ClientConfig};

pub mod board;
pub mod card;
pub mod clear;

/// Continuum - a kanban board in your terminal
#[derive(Parser)]
#[command(name = "continuum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the board API [env: CONTINUUM_API_URL]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Local cache: `memory`, a `redis://` URL, or a directory [env: CONTINUUM_STORAGE]
    #[arg(long, global = true)]
    pub storage: Option<String>,

    /// Category selected when the cache has none [env: CONTINUUM_CATEGORY]
    #[arg(long, global = true)]
    pub default_category: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the board of the active category
    Board,

    /// List cards
    Cards(card::ListArgs),

    /// List categories
    Categories,

    /// Create a new card
    New(card::NewCardArgs),

    /// Change fields of a card
    Edit(card::EditCardArgs),

    /// Move a card to another column
    Move(card::MoveCardArgs),

    /// Delete a card
    Delete(card::DeleteCardArgs),

    /// Switch the active category
    Use(board::UseArgs),

    /// Remove all locally cached cards
    Clear(clear::ClearArgs),

    /// Check that the API is reachable
    Health,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.config()?;

        if let Commands::Health = self.command {
            return board::health(&ApiClient::new(&config.api_url)).await;
        }

        let store = BoardStore::open(&config)
            .await
            .with_context(|| format!("Failed to open storage {}", config.storage))?;
        let result = match self.command {
            Commands::Board => board::show(&store),
            Commands::Cards(args) => card::list(&store, args),
            Commands::Categories => board::categories(&store),
            Commands::New(args) => card::create(&store, args).await,
            Commands::Edit(args) => card::edit(&store, args).await,
            Commands::Move(args) => card::move_card(&store, args).await,
            Commands::Delete(args) => card::delete(&store, args).await,
            Commands::Use(args) => board::use_category(&store, args).await,
            Commands::Clear(args) => clear::execute(&store, args).await,
            // handled before connecting
            Commands::Health => Ok(()),
        };

        report_store_error(&store);
        result
    }

    /// Environment first, then flags on top.
    fn config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::from_env()?.apply(|key| match key {
            "CONTINUUM_API_URL" => self.api_url.clone(),
            "CONTINUUM_STORAGE" => self.storage.clone(),
            "CONTINUUM_CATEGORY" => self.default_category.clone(),
            _ => None,
        })?;
        tracing::debug!(
            api_url = %config.api_url,
            storage = %config.storage,
            default_category = %config.default_category,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Warn about the last failed API call. The command itself has already
/// fallen back to local data.
fn report_store_error(store: &BoardStore) {
    if let Some(message) = store.error() {
        eprintln!(
            "{} {} {}",
            "⚠".yellow().bold(),
            message.yellow(),
            "(working from the local cache)".dimmed()
        );
    }
}
