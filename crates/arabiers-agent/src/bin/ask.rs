//! One-shot question from the terminal
//!
//! Run with: cargo run -p arabiers-agent --features cli --bin arabiers-ask -- "Who are you?"

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arabiers_agent::{config::AgentConfig, export::generate_pdf, AgentMode, QuotationService};

#[derive(Parser)]
#[command(name = "arabiers-ask")]
#[command(about = "Ask the Arabiers AI Agent a question", long_about = None)]
#[command(version)]
struct Cli {
    /// Question to ask
    #[arg(default_value = "Who are you?")]
    question: String,

    /// Answering mode: direct or agent
    #[arg(short, long)]
    mode: Option<AgentMode>,

    /// Also write the answer to this PDF file
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Config file (defaults to arabiers.toml or ARABIERS_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arabiers_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AgentConfig::load_from(path)?,
        None => AgentConfig::load()?,
    };
    if let Some(mode) = cli.mode {
        config.agent.mode = mode;
    }

    let service = QuotationService::from_config(&config)?;
    let answer = service.generate_quotation(&cli.question).await;

    println!("{}", answer);

    if let Some(path) = &cli.pdf {
        generate_pdf(&answer, path, config.export.max_chars)?;
        eprintln!("PDF written to {}", path.display());
    }

    Ok(())
}
