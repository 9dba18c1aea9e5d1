//! Quotation agent server binary
//!
//! Run with: cargo run -p arabiers-agent --bin arabiers-agent-server

use arabiers_agent::{config::AgentConfig, server::AgentServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arabiers_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Arabiers AI Agent                      ║
║        Sri Lanka Hotel & Tourism Quotation Assistant      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = AgentConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Agent: {} ({} mode)", config.agent.name, config.agent.mode);
    tracing::info!("  - Search index: {}/{}", config.search.service_name, config.search.index_name);
    tracing::info!("  - LLM deployment: {}", config.llm.deployment);
    tracing::info!("  - Top K: {}", config.search.top_k);
    if config.agent.mode == arabiers_agent::AgentMode::Agent {
        tracing::info!(
            "  - Agent limits: {} iterations / {}s",
            config.agent.max_iterations,
            config.agent.max_execution_secs
        );
    }

    // Create and start server
    let server = AgentServer::new(config).await?;

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
