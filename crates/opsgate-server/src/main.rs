use clap::Parser;
use opsgate_core::OpsgateConfig;
use opsgate_server::{AppState, create_router};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "opsgate", about = "Stateless authentication gateway")]
struct Args {
    /// Path to opsgate.yaml (defaults apply when absent).
    #[arg(short, long, env = "OPSGATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => OpsgateConfig::from_file(path)?,
        None => OpsgateConfig::default(),
    };

    let addr = config.gateway.bind_addr();
    let state = AppState::new(config);
    let app = create_router(state);

    tracing::info!("opsgate listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
