use std::env;

use ingest::{load_documents, IngestConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = env::args().nth(1).unwrap_or_else(|| "data".into());
    let docs = load_documents(&IngestConfig::with_data_dir(&data_dir))?;

    println!("Loaded {} documents from {data_dir}", docs.len());
    for doc in &docs {
        let preview: String = doc.content.chars().take(60).collect();
        println!("  {:<20} {preview}", doc.source);
    }
    Ok(())
}
