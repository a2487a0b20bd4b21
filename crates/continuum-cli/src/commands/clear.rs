//! Clear command - drop the local board cache.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use continuum_core::BoardStore;

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm destructive operation
    #[arg(long)]
    pub confirm: bool,
}

pub async fn execute(store: &BoardStore, args: ClearArgs) -> Result<()> {
    if !args.confirm {
        println!("{}", "This will permanently delete:".red().bold());
        println!(
            "  {} {} cached card(s)",
            "•".red(),
            store.cards().len()
        );
        println!("  {} the local board cache", "•".red());
        println!();
        println!("Cards on the server are not touched.");
        println!("Run with {} to confirm.", "--confirm".bold());
        return Ok(());
    }

    store.clear_all_data().await;
    println!("  {} Local board data cleared", "✓".green());
    Ok(())
}
