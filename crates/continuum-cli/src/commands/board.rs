//! Board, category and health commands.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use continuum_api::ApiClient;
use continuum_core::{BoardStore, CategoryId};

use crate::output;

#[derive(Args)]
pub struct UseArgs {
    /// Category to select (business, coding, health, communications)
    pub category: String,
}

pub fn show(store: &BoardStore) -> Result<()> {
    let active = store.active_category();
    let title = store
        .categories()
        .into_iter()
        .find(|c| c.id == active)
        .map(|c| c.name)
        .unwrap_or_else(|| active.to_string());

    output::print_board(&title, &store.columns());
    Ok(())
}

pub fn categories(store: &BoardStore) -> Result<()> {
    output::print_categories(&store.categories(), store.active_category());
    Ok(())
}

pub async fn use_category(store: &BoardStore, args: UseArgs) -> Result<()> {
    let category: CategoryId = args.category.parse()?;
    store.set_active_category(category).await;

    println!(
        "{} Active category: {}",
        "✓".green().bold(),
        category.as_str().cyan()
    );
    Ok(())
}

pub async fn health(api: &ApiClient) -> Result<()> {
    let status = api
        .health_check()
        .await
        .with_context(|| format!("API at {} is unreachable", api.base_url()))?;

    if status.is_healthy() {
        println!("{} {} is healthy", "✓".green().bold(), api.base_url());
    } else {
        println!(
            "{} {} reports '{}'",
            "⚠".yellow().bold(),
            api.base_url(),
            status.status.yellow()
        );
    }
    if let Some(service) = &status.service {
        let version = status.version.as_deref().unwrap_or("unknown");
        println!("  {} {} {}", "Service:".bold(), service, version.dimmed());
    }
    if let Some(message) = &status.message {
        println!("  {}", message.dimmed());
    }
    Ok(())
}
