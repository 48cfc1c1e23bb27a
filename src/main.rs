use alignment_facilitator::{create_router, AppState, Config, Facilitator};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "alignment-facilitator", version, about = "AI-driven alignment interviews and reports")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/alignment-facilitator")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API and web form (default)
    Serve,
    /// Generate an alignment report from stored transcripts
    Report {
        /// Only include interviews whose topic contains this text
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Compare stored interviews across topics
    Compare {
        /// Topic filter, repeat for each topic
        #[arg(short, long = "topic", required = true)]
        topics: Vec<String>,
    },
    /// Print statistics about stored transcripts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let facilitator = Arc::new(Facilitator::from_config(&cfg)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cfg, facilitator).await,
        Command::Report { topic } => {
            let report = facilitator.generate_report(topic.as_deref()).await?;
            println!("{}", report.to_markdown());
            Ok(())
        }
        Command::Compare { topics } => {
            let report = facilitator.generate_comparative_report(&topics).await?;
            println!("{}", report.to_markdown());
            Ok(())
        }
        Command::Stats => {
            let stats = facilitator.statistics().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

async fn serve(cfg: &Config, facilitator: Arc<Facilitator>) -> Result<()> {
    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Transcripts stored in {:?}", cfg.storage.transcripts_path);
    info!(
        "Interviews run {} turns; language model {}",
        facilitator.max_turns(),
        if facilitator.gateway_online() { "online" } else { "offline" }
    );

    let app = create_router(
        AppState::new(facilitator),
        Some(cfg.service.static_dir.as_path()),
    );

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
