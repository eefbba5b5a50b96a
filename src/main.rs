use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibe_analyzer::app::App;
use vibe_analyzer::models::Config;

#[derive(Debug, Parser)]
#[command(name = "vibe-analyzer")]
#[command(about = "Serve photo vibe analysis over HTTP")]
struct CliArgs {
    /// Address to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT).
    #[arg(long, short)]
    port: Option<u16>,
}

fn listen_addr(config: &Config, args: &CliArgs) -> String {
    let host = args.host.as_deref().unwrap_or(&config.host);
    let port = args.port.unwrap_or(config.port);
    format!("{}:{}", host, port)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibe_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    info!("Starting vibe-analyzer");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    app.run(&listen_addr(&config, &args)).await?;

    info!("Server stopped");
    Ok(())
}
