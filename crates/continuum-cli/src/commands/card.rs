//! Card commands.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use continuum_core::{BoardStore, CardUpdate, CategoryId, ColumnId, NewCard, Priority};

use crate::output;

#[derive(Args)]
pub struct ListArgs {
    /// Include cards of every category
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct NewCardArgs {
    /// Card title
    pub title: String,

    /// Card description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Category (defaults to the active one)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Column (todo, inProgress, done)
    #[arg(long, default_value = "todo")]
    pub column: String,

    /// Priority (low, medium, high)
    #[arg(long, default_value = "medium")]
    pub priority: String,

    /// Tag; repeat for several
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct EditCardArgs {
    /// Card ID (a unique prefix is enough)
    pub card_id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// New column
    #[arg(long)]
    pub column: Option<String>,

    /// New priority
    #[arg(long)]
    pub priority: Option<String>,

    /// Replace the tags; repeat for several
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct MoveCardArgs {
    /// Card ID (a unique prefix is enough)
    pub card_id: String,

    /// Target column (todo, inProgress, done)
    pub column: String,
}

#[derive(Args)]
pub struct DeleteCardArgs {
    /// Card ID (a unique prefix is enough)
    pub card_id: String,
}

pub fn list(store: &BoardStore, args: ListArgs) -> Result<()> {
    let cards = if args.all {
        store.cards()
    } else {
        store.active_category_cards()
    };
    output::print_cards_table(&cards);
    Ok(())
}

pub async fn create(store: &BoardStore, args: NewCardArgs) -> Result<()> {
    let category = match args.category {
        Some(c) => c.parse::<CategoryId>()?,
        None => store.active_category(),
    };

    let mut new_card = NewCard::new(args.title, category)
        .column(args.column.parse::<ColumnId>()?)
        .priority(Some(args.priority.parse::<Priority>()?))
        .tags(args.tags);
    if let Some(description) = args.description {
        new_card = new_card.description(description);
    }

    let card = store.create_card(new_card).await?;
    println!(
        "{} Created card: {} ({})",
        "✓".green().bold(),
        card.title.cyan(),
        output::short_id(&card.id).dimmed()
    );
    Ok(())
}

pub async fn edit(store: &BoardStore, args: EditCardArgs) -> Result<()> {
    let id = resolve_card_id(store, &args.card_id)?;

    let updates = CardUpdate {
        title: args.title,
        description: args.description,
        category_id: args.category.map(|c| c.parse()).transpose()?,
        column_id: args.column.map(|c| c.parse()).transpose()?,
        priority: args.priority.map(|p| p.parse()).transpose()?,
        tags: (!args.tags.is_empty()).then_some(args.tags),
    };
    if updates.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --description, --category, --column, --priority, --tag.");
    }

    match store.update_card(&id, updates).await? {
        Some(card) => {
            println!(
                "{} Updated card: {} ({})",
                "✓".green().bold(),
                card.title.cyan(),
                output::short_id(&card.id).dimmed()
            );
            Ok(())
        }
        None => bail!("Card {} not found", id),
    }
}

pub async fn move_card(store: &BoardStore, args: MoveCardArgs) -> Result<()> {
    let id = resolve_card_id(store, &args.card_id)?;
    let column: ColumnId = args.column.parse()?;

    match store.move_card(&id, column).await {
        Some(card) => {
            println!(
                "{} Moved card {} to {}",
                "✓".green().bold(),
                output::short_id(&card.id).dimmed(),
                column.display_name().cyan()
            );
            Ok(())
        }
        None => bail!("Card {} not found", id),
    }
}

pub async fn delete(store: &BoardStore, args: DeleteCardArgs) -> Result<()> {
    let id = resolve_card_id(store, &args.card_id)?;

    if store.delete_card(&id).await {
        println!(
            "{} Deleted card {}",
            "✓".green().bold(),
            output::short_id(&id).dimmed()
        );
    } else {
        println!(
            "{} Card {} was not deleted",
            "✗".red().bold(),
            output::short_id(&id).dimmed()
        );
    }
    Ok(())
}

/// Expand a card id prefix to the full id of a known card.
fn resolve_card_id(store: &BoardStore, prefix: &str) -> Result<String> {
    if let Some(card) = store.card(prefix) {
        return Ok(card.id);
    }

    let matches: Vec<String> = store
        .cards()
        .into_iter()
        .filter(|c| c.id.starts_with(prefix))
        .map(|c| c.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("No card matches '{}'", prefix),
        _ => bail!(
            "'{}' matches {} cards; use a longer id",
            prefix,
            matches.len()
        ),
    }
}
