// src/main.rs - Lab server entry point
use authlab::config;
use authlab::web::api::{AppStateInner, create_router};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "authlab-server", about = "JWT authentication security lab backend")]
struct Args {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    tracing::info!("Hybrid Authentication Security Lab - educational purpose only");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::resolve(args.config.as_deref()).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    // Leaking the secret prefix is part of the exercise.
    let prefix: String = config.auth.secret_key.chars().take(10).collect();
    tracing::warn!("Starting server with SECRET_KEY: {}...", prefix);
    tracing::info!("Token lifetime: {} hours", config.auth.token_lifetime_hours);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /health       - Health check");
    tracing::info!("  POST /login        - Authentication");
    tracing::info!("  GET  /protected    - Protected resource (requires token)");
    tracing::info!("  POST /verify       - Token verification");

    let state = AppStateInner::from_config(&config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Web API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
