use std::{env, error::Error};

use semantic::{from_config, SemanticConfig};

/// Embeds a piece of text through a remote inference endpoint, or offline
/// with the hashing embedder when no endpoint is configured.
///
/// ```bash
/// EVIDENCE_QA_EMBED_URL=https://router.huggingface.co/hf-inference/models/BAAI/bge-small-en-v1.5/pipeline/feature-extraction \
/// EVIDENCE_QA_EMBED_TOKEN=hf_xxx \
/// cargo run -p evidence-semantic --example api_embed -- "Some text"
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let text = env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let text = if text.is_empty() {
        "The car was red.".to_string()
    } else {
        text
    };

    let cfg = match env::var("EVIDENCE_QA_EMBED_URL") {
        Ok(url) => SemanticConfig {
            mode: "api".into(),
            api_url: Some(url),
            api_provider: Some("hf".into()),
            api_auth_header: env::var("EVIDENCE_QA_EMBED_TOKEN")
                .ok()
                .map(|token| format!("Bearer {token}")),
            ..Default::default()
        },
        Err(_) => SemanticConfig::default(),
    };

    let embedder = from_config(&cfg)?;
    let vector = embedder.embed(&text).await?;
    println!("model: {}", embedder.model_name());
    println!("dimension: {}", vector.len());
    println!("first values: {:?}", &vector[..vector.len().min(8)]);
    Ok(())
}
