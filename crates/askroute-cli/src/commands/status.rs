//! Status command

use anyhow::Result;
use askroute_core::{Config, Store};

pub async fn run(store: &Store, config: &Config) -> Result<()> {
    println!("Store: {}", config.store.resolved_path().display());
    println!("Active collection: {}", config.store.collection);

    let db = store.lock();
    let collections = db.list_collections()?;

    if collections.is_empty() {
        println!("No collections yet. Ingest a PDF to create one.");
    } else {
        for info in collections {
            let count = db.count_chunks(&info.name)?;
            println!(
                "  {} - {} chunks, {} dims, {} metric",
                info.name,
                count,
                info.dimensions,
                info.metric.as_str()
            );
        }
    }

    println!(
        "Weather API key: {}",
        if config.weather.api_key.is_some() {
            "set"
        } else {
            "missing"
        }
    );
    println!(
        "LLM API key: {}",
        if config.llm.api_key.is_some() {
            "set"
        } else {
            "not required / missing"
        }
    );

    Ok(())
}
