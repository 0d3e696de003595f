//! Document QA server binary
//!
//! Run with: cargo run -p docqa --bin docqa-server

use docqa::{config::DocQaConfig, server::DocQaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = DocQaConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chunking: {:?}, {} chars", config.chunking.granularity, config.chunking.chunk_size);
    tracing::info!("  - Top-k: {}, min relevance: {}", config.scoring.top_k, config.scoring.min_relevance);
    tracing::info!("  - Answers: {:?}", config.answer.backend);

    let server = DocQaServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/documents - Upload a document");
    println!("  POST /api/chat      - Ask a question");
    println!("  GET  /api/history   - Conversation history");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
