use anyhow::Result;

use crate::cli::output::{OutputFormat, StatusInfo, get_formatter};
use crate::models::Config;
use crate::services::VectorStoreClient;

pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (connected, collection_exists, point_count) =
        match VectorStoreClient::connect(&config.vector_store).await {
            Ok(store) => match store.stats().await {
                Ok(Some(stats)) => (true, true, stats.point_count),
                Ok(None) => (true, false, 0),
                Err(_) => (true, false, 0),
            },
            Err(_) => (false, false, 0),
        };

    let status = StatusInfo {
        store_url: config.vector_store.url.clone(),
        collection: config.vector_store.collection.clone(),
        connected,
        collection_exists,
        point_count,
        embedding_model: config.embedding.model.clone(),
    };

    print!("{}", formatter.format_status(&status));

    if !connected {
        eprintln!();
        eprintln!(
            "Warning: Qdrant is not reachable at {}.",
            config.vector_store.url
        );
        eprintln!("         Check QDRANT_URL / QDRANT_API_KEY or the [vector_store] config section.");
    }

    Ok(())
}
