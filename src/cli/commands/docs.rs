//! Docs command implementation: the aggregated document listing.

use anyhow::Result;

use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;
use crate::services::{DocumentCatalog, VectorStoreClient};

pub async fn handle_docs(format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let store = VectorStoreClient::connect(&config.vector_store).await?;
    let catalog = DocumentCatalog::load(&store).await?;

    if catalog.is_empty() {
        println!("{}", formatter.format_message("The knowledge base is empty."));
        return Ok(());
    }

    if verbose {
        println!(
            "Scanned collection '{}': {} distinct document(s)",
            store.collection(),
            catalog.len()
        );
    }

    print!("{}", formatter.format_documents(&catalog.sorted_entries()));
    Ok(())
}
